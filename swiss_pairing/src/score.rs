//! Exact half-point scores.
//!
//! Every score in a Swiss tournament is a multiple of half a point, so scores are
//! stored as a count of half points. Floating point only appears at the wire
//! boundary, where [`Score::from_points`] and [`Score::to_points`] convert.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

/// Tolerance used when checking that a wire value is a half-point multiple.
const HALF_POINT_EPSILON: f64 = 1e-9;

/// A non-negative score counted in half points (`Score::from_half_points(3)` is 1.5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const HALF: Score = Score(1);
    pub const ONE: Score = Score(2);

    #[must_use]
    pub const fn from_half_points(half_points: u32) -> Self {
        Self(half_points)
    }

    #[must_use]
    pub const fn half_points(self) -> u32 {
        self.0
    }

    /// Convert a wire value, rejecting negatives, non-finite values and anything
    /// that is not a multiple of one half.
    #[must_use]
    pub fn from_points(points: f64) -> Option<Self> {
        if !points.is_finite() || points < 0.0 {
            return None;
        }
        let doubled = points * 2.0;
        let rounded = doubled.round();
        if (doubled - rounded).abs() > HALF_POINT_EPSILON || rounded > f64::from(u32::MAX) {
            return None;
        }
        Some(Self(rounded as u32))
    }

    /// Convert a single game result, which must be a loss, a draw or a win.
    #[must_use]
    pub fn from_game_points(points: f64) -> Option<Self> {
        Self::from_points(points).filter(|score| *score <= Self::ONE)
    }

    #[must_use]
    pub fn to_points(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
        iter.fold(Score::ZERO, Add::add)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_points())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = f64::deserialize(deserializer)?;
        Score::from_points(points).ok_or_else(|| {
            de::Error::custom(format!("{points} is not a non-negative multiple of 0.5"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_accepts_half_multiples() {
        assert_eq!(Score::from_points(0.0), Some(Score::ZERO));
        assert_eq!(Score::from_points(0.5), Some(Score::HALF));
        assert_eq!(Score::from_points(1.0), Some(Score::ONE));
        assert_eq!(Score::from_points(3.5), Some(Score::from_half_points(7)));
    }

    #[test]
    fn test_from_points_rejects_invalid_values() {
        assert_eq!(Score::from_points(0.3), None);
        assert_eq!(Score::from_points(-0.5), None);
        assert_eq!(Score::from_points(f64::NAN), None);
        assert_eq!(Score::from_points(f64::INFINITY), None);
    }

    #[test]
    fn test_game_points_are_capped_at_one() {
        assert_eq!(Score::from_game_points(1.0), Some(Score::ONE));
        assert_eq!(Score::from_game_points(1.5), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::ZERO.to_string(), "0");
        assert_eq!(Score::HALF.to_string(), "0.5");
        assert_eq!(Score::from_half_points(5).to_string(), "2.5");
    }

    #[test]
    fn test_sum_and_ordering() {
        let total: Score = [Score::ONE, Score::HALF, Score::HALF].into_iter().sum();
        assert_eq!(total, Score::from_half_points(4));
        assert!(Score::HALF < Score::ONE);
    }

    #[test]
    fn test_serde_uses_decimal_points() {
        let json = serde_json::to_string(&Score::from_half_points(3)).unwrap();
        assert_eq!(json, "1.5");
        let parsed: Score = serde_json::from_str("2.5").unwrap();
        assert_eq!(parsed, Score::from_half_points(5));
        assert!(serde_json::from_str::<Score>("0.25").is_err());
    }
}
