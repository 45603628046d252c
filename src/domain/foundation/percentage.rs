//! Percentage value object (0-100 scale).
//!
//! Used for numeric assessment confidence. The inference service reports
//! scores as JSON numbers that may be fractional or out of range; they are
//! normalised here once, at construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole-number value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage from a raw service score.
    ///
    /// Rounds to the nearest whole percent and clamps into 0-100.
    /// Non-finite input yields `None`.
    pub fn from_score(score: f64) -> Option<Self> {
        if !score.is_finite() {
            return None;
        }
        Some(Self(score.round().clamp(0.0, 100.0) as u8))
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Rounded arithmetic mean; zero for an empty input.
    pub fn rounded_mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Percentage>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), p| (sum + u64::from(p.0), count + 1));
        if count == 0 {
            return Self::ZERO;
        }
        Self::from_score(sum as f64 / count as f64).unwrap_or(Self::ZERO)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_new_clamps_to_100() {
        assert_eq!(Percentage::new(101).value(), 100);
        assert_eq!(Percentage::new(255).value(), 100);
    }

    #[test]
    fn from_score_rounds_and_clamps() {
        assert_eq!(Percentage::from_score(72.4), Some(Percentage::new(72)));
        assert_eq!(Percentage::from_score(72.5), Some(Percentage::new(73)));
        assert_eq!(Percentage::from_score(-3.0), Some(Percentage::ZERO));
        assert_eq!(Percentage::from_score(180.0), Some(Percentage::new(100)));
    }

    #[test]
    fn from_score_rejects_non_finite() {
        assert_eq!(Percentage::from_score(f64::NAN), None);
        assert_eq!(Percentage::from_score(f64::INFINITY), None);
    }

    #[test]
    fn rounded_mean_of_empty_is_zero() {
        assert_eq!(Percentage::rounded_mean(Vec::new()), Percentage::ZERO);
    }

    #[test]
    fn rounded_mean_rounds_half_up() {
        let values = [Percentage::new(80), Percentage::new(55), Percentage::new(92)];
        // 227 / 3 = 75.67
        assert_eq!(Percentage::rounded_mean(values), Percentage::new(76));
    }

    #[test]
    fn percentage_displays_correctly() {
        assert_eq!(format!("{}", Percentage::new(75)), "75%");
    }

    #[test]
    fn percentage_serializes_to_json() {
        let json = serde_json::to_string(&Percentage::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn percentage_ordering_works() {
        assert!(Percentage::new(25) < Percentage::new(75));
    }
}
