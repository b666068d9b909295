//! Frag formatting module - emoji frag feed used by the pretty output mode

use crate::datetime::format_frag_timestamp;
use crate::types::Frag;

pub const KILLER_ICON: &str = "😛";
pub const VICTIM_ICON: &str = "😦";
pub const SUICIDE_ICON: &str = "☠";

/// Icon for a weapon code, `None` for codes outside the known arsenal
pub fn weapon_icon(weapon: &str) -> Option<&'static str> {
    let icon = match weapon {
        "Vehicle" => "🚙",
        "Falcon" | "Shotgun" | "P90" | "MP5" | "M4" | "AG36" | "OICW" | "SniperRifle" | "M249"
        | "VehicleMountedAutoMG" | "VehicleMountedMG" | "MG" => "🔫",
        "HandGrenade" | "AG36Grenade" | "OICWGrenade" | "StickyExplosive" => "💣",
        "Rocket" | "VehicleMountedRocketMG" | "VehicleRocket" => "🚀",
        "Machete" => "🔪",
        "Boat" => "🚤",
        _ => return None,
    };
    Some(icon)
}

/// Format a single frag as a feed line
///
/// `[2019-03-01 16:22:54-05:00] 😛 cyap 🔫 😦 cynthia` for kills and
/// `[2019-03-01 16:27:18-05:00] 😦 cyap ☠` for suicides. Unknown weapon codes
/// are printed as-is in place of the icon.
pub fn format_frag(frag: &Frag) -> String {
    let timestamp = format_frag_timestamp(&frag.timestamp);
    match frag.victim.as_deref() {
        Some(victim) => {
            let weapon = frag.weapon.as_deref().unwrap_or_default();
            let icon = weapon_icon(weapon).unwrap_or(weapon);
            format!(
                "[{}] {} {} {} {} {}",
                timestamp, KILLER_ICON, frag.killer, icon, VICTIM_ICON, victim
            )
        }
        None => format!("[{}] {} {} {}", timestamp, VICTIM_ICON, frag.killer, SUICIDE_ICON),
    }
}

/// Format a collection of frags
pub fn format_frags(frags: &[Frag]) -> Vec<String> {
    frags.iter().map(format_frag).collect()
}
