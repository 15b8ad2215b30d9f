//! World coordinates and relative offsets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A tile position (or an offset from an anchor tile)
///
/// Serialized as an `(x, y, z)` tuple so catalog files stay compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(i32, i32, i32)", into = "(i32, i32, i32)")]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point3 {
    /// The origin
    pub const ZERO: Point3 = Point3 { x: 0, y: 0, z: 0 };

    /// Create a new point
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev distance on the ground plane, the way tile range is measured
    pub fn tile_distance(&self, other: &Point3) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl From<(i32, i32, i32)> for Point3 {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3> for (i32, i32, i32) {
    fn from(p: Point3) -> Self {
        (p.x, p.y, p.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_offset() {
        let anchor = Point3::new(1000, 2000, 5);
        assert_eq!(anchor + Point3::new(1, -1, 0), Point3::new(1001, 1999, 5));
    }

    #[test]
    fn test_tile_distance_ignores_z() {
        let a = Point3::new(10, 10, 0);
        assert_eq!(a.tile_distance(&Point3::new(13, 9, 40)), 3);
    }

    #[test]
    fn test_ron_tuple_form() {
        let p: Point3 = ron::from_str("(1, -2, 3)").unwrap();
        assert_eq!(p, Point3::new(1, -2, 3));
    }
}
