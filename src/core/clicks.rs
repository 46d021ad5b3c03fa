//! Click normalization - converts raw adjuster click counts to percentages.
//!
//! Adjusters on different hardware have different ranges, so raw clicks are not
//! comparable between a fork and a shock. These functions map a click count to
//! a percentage of the adjuster's maximum and back. They are pure and never
//! touch storage.
//!
//! An uncalibrated adjuster (`max_clicks <= 0`) normalizes to 0 rather than
//! failing, which keeps display code simple. Use [`checked_percentage`] where
//! "uncalibrated" must be told apart from "fully closed".

use serde::{Deserialize, Serialize};

/// Rounds half-up to the nearest integer (`2.5 -> 3`, `-2.5 -> -2`).
#[allow(clippy::cast_possible_truncation)]
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Converts a click count to a percentage of `max_clicks`.
///
/// Returns 0 when `max_clicks <= 0`. The result is not clamped; callers supply
/// `0 <= clicks <= max_clicks` for a value in `[0, 100]`.
#[must_use]
pub fn clicks_to_percentage(clicks: i32, max_clicks: i32) -> i32 {
    if max_clicks <= 0 {
        return 0;
    }
    round_half_up(f64::from(clicks) / f64::from(max_clicks) * 100.0)
}

/// Converts a percentage back to a click count for an adjuster with `max_clicks`.
///
/// Returns 0 when `max_clicks <= 0`.
#[must_use]
pub fn percentage_to_clicks(percentage: i32, max_clicks: i32) -> i32 {
    if max_clicks <= 0 {
        return 0;
    }
    round_half_up(f64::from(percentage) / 100.0 * f64::from(max_clicks))
}

/// Like [`clicks_to_percentage`] but returns `None` for an uncalibrated adjuster
/// (missing or non-positive maximum) or a missing click value.
#[must_use]
pub fn checked_percentage(clicks: Option<i32>, max_clicks: Option<i32>) -> Option<i32> {
    match (clicks, max_clicks) {
        (Some(clicks), Some(max)) if max > 0 => Some(clicks_to_percentage(clicks, max)),
        _ => None,
    }
}

/// Which way to turn an adjuster screw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Increase clicks counted from fully closed
    Open,
    /// Decrease clicks, or stay put
    Close,
}

impl Direction {
    /// Wire/display name of the direction
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
        }
    }
}

/// A single adjuster change from one click position to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Number of clicks to turn
    pub clicks: i32,
    /// Which way to turn
    pub direction: Direction,
    /// Position before the change, in percent
    pub from_percentage: i32,
    /// Position after the change, in percent
    pub to_percentage: i32,
}

/// Describes the change needed to move an adjuster from `current_clicks` to
/// `target_clicks`.
///
/// The direction is `Open` only when the target is above the current position;
/// an unchanged position reports `Close` with zero clicks.
#[must_use]
pub fn calculate_adjustment(current_clicks: i32, target_clicks: i32, max_clicks: i32) -> Adjustment {
    Adjustment {
        clicks: (target_clicks - current_clicks).abs(),
        direction: if target_clicks > current_clicks {
            Direction::Open
        } else {
            Direction::Close
        },
        from_percentage: clicks_to_percentage(current_clicks, max_clicks),
        to_percentage: clicks_to_percentage(target_clicks, max_clicks),
    }
}
