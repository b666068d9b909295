//! Rollover-aware frag timeline reconstruction.
//!
//! Frag markers carry only `MM:SS`. Minutes rise monotonically within an hour
//! and wrap at the top of it, so a decrease between two consecutive frags is
//! the signal that an hour boundary was crossed. The log anchor supplies the
//! date, starting hour and UTC offset.

use crate::datetime::with_minute_second;
use crate::error::Result;
use crate::types::{Frag, LogAnchor, PartialEvent};
use chrono::Duration;

/// Turn partial frag records into absolute, offset-aware frags.
///
/// One output per input, same order. The running hour is carried forward
/// from frag to frag; it is advanced by exactly one hour each time the
/// minute goes down and is never recomputed from the anchor.
///
/// `last_minute` starts at 0, so a first frag logged right after an
/// unobserved rollover is indistinguishable from one in the anchor's hour and
/// is placed in the anchor's hour.
pub fn reconstruct(events: &[PartialEvent], anchor: &LogAnchor) -> Result<Vec<Frag>> {
    let mut running = anchor.start_time()?;
    let mut last_minute = 0;
    let mut frags = Vec::with_capacity(events.len());

    for event in events {
        if event.minute < last_minute {
            running = running + Duration::hours(1);
            log::debug!(
                "hour rollover at line {} ({:02} < {:02}), now {}",
                event.line,
                event.minute,
                last_minute,
                running
            );
        }
        last_minute = event.minute;

        frags.push(Frag {
            timestamp: with_minute_second(&running, event.minute, event.second)?,
            killer: event.killer.clone(),
            victim: event.victim.clone(),
            weapon: event.weapon.clone(),
            line: event.line,
        });
    }

    Ok(frags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn anchor(hour: u32, minute: u32) -> LogAnchor {
        LogAnchor {
            local_start: NaiveDate::from_ymd_opt(2018, 11, 9)
                .unwrap()
                .and_hms_opt(hour, minute, 7)
                .unwrap(),
            utc_offset_hours: -5,
        }
    }

    fn kill(minute: u32, second: u32, line: usize) -> PartialEvent {
        PartialEvent {
            minute,
            second,
            killer: "cyap".to_string(),
            victim: Some("lamonthe".to_string()),
            weapon: Some("AG36".to_string()),
            line,
        }
    }

    fn suicide(minute: u32, second: u32, line: usize) -> PartialEvent {
        PartialEvent {
            minute,
            second,
            killer: "theprophete".to_string(),
            victim: None,
            weapon: None,
            line,
        }
    }

    fn hours(frags: &[Frag]) -> Vec<u32> {
        frags.iter().map(|f| f.timestamp.hour()).collect()
    }

    #[test]
    fn test_one_output_per_input_in_order() {
        let events = vec![kill(30, 1, 10), suicide(31, 2, 11), kill(31, 40, 12)];
        let frags = reconstruct(&events, &anchor(12, 22)).unwrap();
        assert_eq!(frags.len(), events.len());
        for (frag, event) in frags.iter().zip(&events) {
            assert_eq!(frag.killer, event.killer);
            assert_eq!(frag.victim, event.victim);
            assert_eq!(frag.weapon, event.weapon);
            assert_eq!(frag.line, event.line);
            assert_eq!(frag.timestamp.minute(), event.minute);
            assert_eq!(frag.timestamp.second(), event.second);
        }
    }

    #[test]
    fn test_rollover_advances_one_hour() {
        let events = vec![kill(5, 0, 0), kill(10, 0, 1), kill(2, 0, 2), kill(8, 0, 3)];
        let frags = reconstruct(&events, &anchor(12, 0)).unwrap();
        assert_eq!(hours(&frags), vec![12, 12, 13, 13]);
    }

    #[test]
    fn test_adjusted_hour_is_carried_forward() {
        // Two rollovers stack instead of both resolving to anchor + 1h
        let events = vec![kill(50, 0, 0), kill(10, 0, 1), kill(55, 0, 2), kill(3, 0, 3)];
        let frags = reconstruct(&events, &anchor(12, 40)).unwrap();
        assert_eq!(hours(&frags), vec![12, 13, 13, 14]);
    }

    #[test]
    fn test_equal_minutes_do_not_roll_over() {
        let events = vec![kill(20, 50, 0), kill(20, 10, 1), kill(20, 59, 2)];
        let frags = reconstruct(&events, &anchor(12, 15)).unwrap();
        assert_eq!(hours(&frags), vec![12, 12, 12]);
    }

    #[test]
    fn test_first_event_in_minute_zero_is_no_rollover() {
        let events = vec![kill(0, 30, 0), kill(1, 0, 1)];
        let frags = reconstruct(&events, &anchor(12, 55)).unwrap();
        assert_eq!(hours(&frags), vec![12, 12]);
    }

    #[test]
    fn test_rollover_crosses_midnight() {
        let events = vec![kill(58, 0, 0), kill(1, 15, 1)];
        let frags = reconstruct(&events, &anchor(23, 50)).unwrap();
        assert_eq!(
            frags[1].timestamp.to_rfc3339(),
            "2018-11-10T00:01:15-05:00"
        );
    }

    #[test]
    fn test_offset_is_preserved() {
        let frags = reconstruct(&[kill(30, 0, 0)], &anchor(12, 22)).unwrap();
        assert_eq!(frags[0].timestamp.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(frags[0].timestamp.to_rfc3339(), "2018-11-09T12:30:00-05:00");
    }

    #[test]
    fn test_suicide_fields_stay_empty() {
        let frags = reconstruct(&[suicide(30, 0, 0)], &anchor(12, 22)).unwrap();
        assert!(frags[0].is_suicide());
        assert_eq!(frags[0].weapon, None);
    }

    #[test]
    fn test_reconstruction_is_idempotent() {
        let events = vec![kill(40, 0, 0), kill(5, 0, 1), suicide(7, 30, 2), kill(1, 0, 3)];
        let first = reconstruct(&events, &anchor(9, 30)).unwrap();
        let second = reconstruct(&events, &anchor(9, 30)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(reconstruct(&[], &anchor(12, 0)).unwrap().is_empty());
    }
}
