//! Exact half-point arithmetic for match and table points.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

/// Points stored as a count of half points.
///
/// Skins splits award 0.5, so points are kept in halves to stay exact and
/// totally ordered. Serialized as a plain number (`1.5`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Points(u32);

impl Points {
    pub const ZERO: Points = Points(0);
    pub const HALF: Points = Points(1);

    /// Whole points
    pub const fn whole(points: u32) -> Self {
        Self(points * 2)
    }

    pub const fn from_halves(halves: u32) -> Self {
        Self(halves)
    }

    pub const fn halves(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl AddAssign for Points {
    fn add_assign(&mut self, rhs: Points) {
        self.0 += rhs.0;
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Self {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

impl From<Points> for f64 {
    fn from(points: Points) -> f64 {
        points.as_f64()
    }
}

impl TryFrom<f64> for Points {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let halves = value * 2.0;
        if !halves.is_finite() || halves < 0.0 || halves.fract() != 0.0 || halves > f64::from(u32::MAX) {
            return Err(format!("points must be a non-negative multiple of 0.5, got {value}"));
        }
        Ok(Points(halves as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Points::whole(2).to_string(), "2");
        assert_eq!(Points::from_halves(7).to_string(), "3.5");
        assert_eq!(Points::HALF.to_string(), "0.5");
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&Points::from_halves(3)).expect("serialize");
        assert_eq!(json, "1.5");
        let back: Points = serde_json::from_str("3.5").expect("deserialize");
        assert_eq!(back, Points::from_halves(7));
        assert!(serde_json::from_str::<Points>("0.25").is_err());
        assert!(serde_json::from_str::<Points>("-1").is_err());
    }

    #[test]
    fn test_sum_and_order() {
        let total: Points = [Points::HALF, Points::whole(1), Points::whole(2)].into_iter().sum();
        assert_eq!(total, Points::from_halves(7));
        assert!(Points::whole(1) > Points::HALF);
    }
}
