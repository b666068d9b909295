//! Kill and death streak analysis over a reconstructed frag timeline.
//!
//! A kill streak is a run of frags by one player that is not interrupted by
//! that player being fragged; a death streak is the mirror image. The
//! analysis is a single fold over the frags in order.

use crate::types::{Frag, StreakEntry, StreakRecord};
use std::collections::{BTreeMap, HashMap};

/// Open runs per player plus the longest run closed so far
#[derive(Debug, Default)]
struct RunBook {
    open: HashMap<String, Vec<StreakEntry>>,
    best: BTreeMap<String, Vec<StreakEntry>>,
}

impl RunBook {
    fn extend(mut self, player: &str, entry: StreakEntry) -> Self {
        self.open.entry(player.to_string()).or_default().push(entry);
        self
    }

    fn close(mut self, player: &str) -> Self {
        if let Some(run) = self.open.remove(player) {
            self.keep_if_longer(player.to_string(), run);
        }
        self
    }

    /// Ties keep the run that was closed first
    fn keep_if_longer(&mut self, player: String, run: Vec<StreakEntry>) {
        let longer = self.best.get(&player).map_or(true, |best| run.len() > best.len());
        if longer && !run.is_empty() {
            self.best.insert(player, run);
        }
    }

    fn finish(mut self) -> BTreeMap<String, Vec<StreakEntry>> {
        // Open runs are the most recent ones, so they only win when strictly longer
        let open = std::mem::take(&mut self.open);
        for (player, run) in open {
            self.keep_if_longer(player, run);
        }
        self.best
    }
}

#[derive(Debug, Default)]
struct StreakFold {
    kills: RunBook,
    deaths: RunBook,
}

impl StreakFold {
    fn apply(self, frag: &Frag) -> Self {
        let killer = frag.killer.as_str();
        match frag.victim.as_deref() {
            Some(victim) if victim != killer => {
                let kills = self
                    .kills
                    .close(victim)
                    .extend(killer, Self::entry(frag, victim));
                let deaths = self
                    .deaths
                    .close(killer)
                    .extend(victim, Self::entry(frag, killer));
                Self { kills, deaths }
            }
            // Suicide: only the actor's own runs are reset, nothing is recorded
            _ => Self {
                kills: self.kills.close(killer),
                deaths: self.deaths.close(killer),
            },
        }
    }

    fn entry(frag: &Frag, opponent: &str) -> StreakEntry {
        StreakEntry {
            timestamp: frag.timestamp,
            opponent: opponent.to_string(),
            weapon: frag.weapon.clone(),
        }
    }

    fn finish(self) -> StreakRecord {
        StreakRecord {
            killers: self.kills.finish(),
            victims: self.deaths.finish(),
        }
    }
}

/// Longest kill and death streak per player over frags in chronological order
pub fn analyze(frags: &[Frag]) -> StreakRecord {
    let record = frags
        .iter()
        .fold(StreakFold::default(), StreakFold::apply)
        .finish();
    log::debug!(
        "streaks: {} killers, {} victims",
        record.killers.len(),
        record.victims.len()
    );
    record
}
