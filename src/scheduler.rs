//! Review scheduling.
//!
//! A simplified spaced repetition rule driven by two ratings:
//!
//! - `Again`: the next gap resets to one day and the ease drops by 0.2.
//! - `Good`: the gap grows by the ease factor (a card never reviewed before
//!   gets one day) and the ease rises by 0.1.
//!
//! Ease is clamped to `[MIN_EASE, MAX_EASE]` on every update.

use chrono::{Days, Local, NaiveDate};
use thiserror::Error;

use crate::models::{Card, Rating};

pub const DEFAULT_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;
pub const MAX_EASE: f64 = 2.8;

const AGAIN_EASE_PENALTY: f64 = 0.2;
const GOOD_EASE_BONUS: f64 = 0.1;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("invalid rating: {0:?} (expected \"again\" or \"good\")")]
    InvalidRating(String),
    #[error("invalid scheduling state: {0}")]
    InvalidState(String),
}

/// Scheduling fields produced by a review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub interval: u32,
    pub ease: f64,
    pub due_date: NaiveDate,
}

/// The reviewer's local calendar day.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A card is due once its due date is today or earlier.
pub fn is_due(due_date: NaiveDate, today: NaiveDate) -> bool {
    due_date <= today
}

/// Compute the schedule that follows rating a card with the given state.
pub fn next_schedule(
    interval: u32,
    ease: f64,
    rating: Rating,
    today: NaiveDate,
) -> Result<Schedule, ScheduleError> {
    if !ease.is_finite() || !(MIN_EASE..=MAX_EASE).contains(&ease) {
        return Err(ScheduleError::InvalidState(format!(
            "ease {ease} outside [{MIN_EASE}, {MAX_EASE}]"
        )));
    }

    let (interval, ease) = match rating {
        Rating::Again => (1, (ease - AGAIN_EASE_PENALTY).max(MIN_EASE)),
        Rating::Good => {
            let grown = if interval == 0 {
                1
            } else {
                grow_interval(interval, ease)?
            };
            (grown, (ease + GOOD_EASE_BONUS).min(MAX_EASE))
        }
    };

    let due_date = today
        .checked_add_days(Days::new(u64::from(interval)))
        .ok_or_else(|| {
            ScheduleError::InvalidState(format!("due date {interval} days from {today} is out of range"))
        })?;

    Ok(Schedule {
        interval,
        ease,
        due_date,
    })
}

fn grow_interval(interval: u32, ease: f64) -> Result<u32, ScheduleError> {
    let grown = (f64::from(interval) * ease).round();
    if grown > f64::from(u32::MAX) {
        return Err(ScheduleError::InvalidState(format!(
            "interval {interval} x {ease} overflows"
        )));
    }
    Ok(grown as u32)
}

/// Apply a review to a card in place.
pub fn review_card(card: &mut Card, rating: Rating, today: NaiveDate) -> Result<Schedule, ScheduleError> {
    let schedule = next_schedule(card.interval, card.ease, rating, today)?;
    card.interval = schedule.interval;
    card.ease = schedule.ease;
    card.due_date = schedule.due_date;
    Ok(schedule)
}

/// Interval label each rating would give, for the rating buttons.
pub fn preview_intervals(card: &Card, today: NaiveDate) -> [(Rating, String); 2] {
    Rating::ALL.map(|rating| {
        let label = next_schedule(card.interval, card.ease, rating, today)
            .map(|s| format_interval(s.interval))
            .unwrap_or_else(|_| "-".to_string());
        (rating, label)
    })
}

/// Format an interval in days to a short human-readable string.
pub fn format_interval(days: u32) -> String {
    match days {
        0 => "now".to_string(),
        1..=29 => format!("{}d", days),
        30..=364 => format!("{}mo", days / 30),
        _ => format!("{}y", days / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plus(date: NaiveDate, days: u64) -> NaiveDate {
        date.checked_add_days(Days::new(days)).unwrap()
    }

    #[test]
    fn test_first_good_review() {
        let today = day(2024, 5, 1);
        let s = next_schedule(0, 2.5, Rating::Good, today).unwrap();

        assert_eq!(s.interval, 1);
        assert!((s.ease - 2.6).abs() < EPS);
        assert_eq!(s.due_date, day(2024, 5, 2));
    }

    #[test]
    fn test_first_good_review_ignores_ease() {
        let today = day(2024, 5, 1);
        for ease in [MIN_EASE, 1.9, MAX_EASE] {
            let s = next_schedule(0, ease, Rating::Good, today).unwrap();
            assert_eq!(s.interval, 1);
        }
    }

    #[test]
    fn test_good_review_rounds_interval() {
        let today = day(2024, 5, 1);
        // 5 * 2.5 = 12.5 rounds up, not down
        let s = next_schedule(5, 2.5, Rating::Good, today).unwrap();

        assert_eq!(s.interval, 13);
        assert!((s.ease - 2.6).abs() < EPS);
        assert_eq!(s.due_date, plus(today, 13));
    }

    #[test]
    fn test_again_clamps_ease_floor() {
        let today = day(2024, 5, 1);
        let s = next_schedule(5, 1.4, Rating::Again, today).unwrap();

        assert_eq!(s.interval, 1);
        assert_eq!(s.ease, MIN_EASE);
        assert_eq!(s.due_date, day(2024, 5, 2));
    }

    #[test]
    fn test_good_clamps_ease_ceiling() {
        let today = day(2024, 5, 1);
        let s = next_schedule(10, 2.75, Rating::Good, today).unwrap();

        assert_eq!(s.ease, MAX_EASE);
        // Growth uses the ease before the update: 10 * 2.75 = 27.5
        assert_eq!(s.interval, 28);
    }

    #[test]
    fn test_again_rule_over_ease_range() {
        let today = day(2024, 5, 1);
        let mut ease = MIN_EASE;
        while ease <= MAX_EASE {
            let s = next_schedule(7, ease, Rating::Again, today).unwrap();
            assert_eq!(s.interval, 1);
            assert!((s.ease - (ease - 0.2).max(MIN_EASE)).abs() < EPS);
            ease += 0.05;
        }
    }

    #[test]
    fn test_good_rule_over_ease_range() {
        let today = day(2024, 5, 1);
        let mut ease = MIN_EASE;
        while ease <= MAX_EASE {
            for interval in [1u32, 3, 8, 40] {
                let s = next_schedule(interval, ease, Rating::Good, today).unwrap();
                assert_eq!(s.interval, (f64::from(interval) * ease).round() as u32);
                assert!((s.ease - (ease + 0.1).min(MAX_EASE)).abs() < EPS);
                assert_eq!(s.due_date, plus(today, u64::from(s.interval)));
            }
            ease += 0.05;
        }
    }

    #[test]
    fn test_ease_stays_bounded_over_sequences() {
        const DEPTH: u32 = 12;
        let today = day(2024, 5, 1);

        // Every Again/Good sequence of length DEPTH, bit i choosing the i-th rating
        for start_ease in [MIN_EASE, DEFAULT_EASE, MAX_EASE] {
            for path in 0..(1u32 << DEPTH) {
                let mut interval = 0;
                let mut ease = start_ease;
                for step in 0..DEPTH {
                    let rating = if path & (1 << step) == 0 { Rating::Again } else { Rating::Good };

                    let s = next_schedule(interval, ease, rating, today).unwrap();
                    assert!(
                        (MIN_EASE..=MAX_EASE).contains(&s.ease),
                        "ease {} escaped from {} on path {:#b}",
                        s.ease,
                        start_ease,
                        path
                    );
                    assert!(s.interval >= 1);
                    assert_eq!(s.due_date, plus(today, u64::from(s.interval)));
                    interval = s.interval;
                    ease = s.ease;
                }
            }
        }
    }

    #[test]
    fn test_invalid_ease_rejected() {
        let today = day(2024, 5, 1);
        for ease in [f64::NAN, f64::INFINITY, 0.0, 1.29, 2.81, -2.5] {
            assert!(matches!(
                next_schedule(3, ease, Rating::Good, today),
                Err(ScheduleError::InvalidState(_))
            ));
        }
    }

    #[test]
    fn test_due_date_overflow_rejected() {
        let result = next_schedule(u32::MAX / 2, 2.5, Rating::Good, day(2024, 5, 1));
        assert!(matches!(result, Err(ScheduleError::InvalidState(_))));
    }

    #[test]
    fn test_is_due_date_only() {
        let today = day(2024, 5, 1);
        assert!(is_due(today, today));
        assert!(is_due(day(2024, 4, 20), today));
        assert!(!is_due(day(2024, 5, 2), today));
    }

    #[test]
    fn test_review_card_updates_in_place() {
        let today = day(2024, 5, 1);
        let mut card = Card::new("Q".into(), "A".into(), None, today);
        card.interval = 5;

        let s = review_card(&mut card, Rating::Good, today).unwrap();

        assert_eq!(card.interval, 13);
        assert_eq!(card.due_date, s.due_date);
        assert!((card.ease - 2.6).abs() < EPS);
    }

    #[test]
    fn test_review_card_leaves_invalid_card_untouched() {
        let today = day(2024, 5, 1);
        let mut card = Card::new("Q".into(), "A".into(), None, today);
        card.ease = 9.0;
        let before = card.clone();

        assert!(review_card(&mut card, Rating::Again, today).is_err());
        assert_eq!(card, before);
    }

    #[test]
    fn test_preview_intervals() {
        let today = day(2024, 5, 1);
        let mut card = Card::new("Q".into(), "A".into(), None, today);
        card.interval = 10;

        let preview = preview_intervals(&card, today);
        assert_eq!(preview[0], (Rating::Again, "1d".to_string()));
        assert_eq!(preview[1], (Rating::Good, "25d".to_string()));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(29), "29d");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(800), "2y");
    }
}
