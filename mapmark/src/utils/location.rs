use std::ops::Sub;

use serde::{Deserialize, Serialize};
use ui_common::units::Distance;

/// Mean earth radius, the same value web map libraries use for `distance()`
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the map in degrees
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self {
            lat: self.lat - other.lat,
            lng: self.lng - other.lng,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

impl Position {
    pub fn new<T: Into<f64>>(lat: T, lng: T) -> Self {
        Self {
            lat: lat.into(),
            lng: lng.into(),
        }
    }

    /// Finite and inside [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn to_radians(&self) -> Self {
        Self {
            lat: self.lat.to_radians(),
            lng: self.lng.to_radians(),
        }
    }

    pub fn distance_to(&self, other: &Self) -> Distance {
        haversine(self, other)
    }
}

// See https://en.wikipedia.org/wiki/Great-circle_distance
fn haversine(pos1: &Position, pos2: &Position) -> Distance {
    let pos1 = pos1.to_radians();
    let pos2 = pos2.to_radians();

    let diff = pos1 - pos2;

    let a = (diff.lat / 2.0).sin().powi(2)
        + (diff.lng / 2.0).sin().powi(2) * pos1.lat.cos() * pos2.lat.cos();

    let c = 2.0 * a.sqrt().asin();

    Distance::from_km(c * EARTH_RADIUS_KM)
}

#[test]
fn test_haversine() {
    let eiffel_tower = Position::new(48.8584, 2.2945);
    let big_ben = Position::new(51.5007, -0.1246);
    assert_eq!(eiffel_tower.distance_to(&big_ben).as_km().round(), 341.0);
}

#[test]
fn test_position_validity() {
    assert!(Position::new(14.5995, 120.9842).is_valid());
    assert!(Position::new(-90.0, 180.0).is_valid());
    assert!(!Position::new(91.0, 0.0).is_valid());
    assert!(!Position::new(0.0, -180.5).is_valid());
    assert!(!Position::new(f64::NAN, 0.0).is_valid());
    assert!(!Position::new(0.0, f64::INFINITY).is_valid());
}
