#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, Mul, Sub},
};

/// A location on the map. Two points are the same vertex exactly when their
/// coordinates are equal, so points double as lookup keys. Graphs refuse
/// non-finite coordinates, which keeps [`Eq`] and [`Hash`] sound.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    pub fn distance_squared(&self, other: Self) -> f64 {
        (other.x - self.x).powi(2) + (other.y - self.y).powi(2)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }

    /// The unit vector in the direction of this point, or `None` for the
    /// origin.
    pub fn normalized(&self) -> Option<Self> {
        let m = self.magnitude();
        if m == 0.0 {
            None
        } else {
            Some(*self * (1.0 / m))
        }
    }

    /// Round both coordinates to the nearest integer (pixel).
    pub fn round(&self) -> Self {
        Self {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    pub fn snap(&mut self) {
        self.x *= 1.0e6;
        self.x = self.x.round();
        self.x *= 1.0e-6;

        self.y *= 1.0e6;
        self.y = self.y.round();
        self.y *= 1.0e-6;
    }

    // -0.0 and 0.0 compare equal so must hash equal.
    fn key_bits(&self) -> (u64, u64) {
        ((self.x + 0.0).to_bits(), (self.y + 0.0).to_bits())
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_bits().hash(state);
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.x + 0.0)
            .total_cmp(&(other.x + 0.0))
            .then_with(|| (self.y + 0.0).total_cmp(&(other.y + 0.0)))
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Point {
    fn arbitrary(g: &mut quickcheck::Gen) -> Point {
        Point {
            x: SafeFloat::arbitrary(g).0,
            y: SafeFloat::arbitrary(g).0,
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
        }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl From<Point> for robust::Coord<f64> {
    fn from(s: Point) -> robust::Coord<f64> {
        robust::Coord { x: s.x, y: s.y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// A map coordinate within the bounds used when generating test geometry.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct SafeFloat(pub f64);

impl SafeFloat {
    pub const MAX: SafeFloat = SafeFloat(4000.0);
    pub const MIN: SafeFloat = SafeFloat(-4000.0);
    pub const EPSILON: SafeFloat = SafeFloat(1.0 / (0xf_i64 as f64));
    pub fn new(f: f64) -> Option<Self> {
        let s = SafeFloat(f);
        if s <= SafeFloat::MAX && s >= SafeFloat::MIN {
            Some(s)
        } else {
            None
        }
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for SafeFloat {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // Whole pixels only: map geometry comes from a tile grid.
        SafeFloat(f64::from(i16::arbitrary(g) % 4000))
    }
}

impl Display for SafeFloat {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}
