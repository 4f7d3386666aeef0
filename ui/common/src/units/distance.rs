use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceUnit {
    #[default]
    Km,
    Mi,
}

impl DistanceUnit {
    pub fn to_str<'a>(&self) -> &'a str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Mi => "mi",
        }
    }
}

const KM_PER_MILE: f64 = 1.609344;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance {
    pub km: f64,
}

impl Distance {
    pub fn from_km(km: f64) -> Self {
        Self { km }
    }

    pub fn from_miles(miles: f64) -> Self {
        Self {
            km: miles * KM_PER_MILE,
        }
    }

    pub fn as_km(&self) -> f64 {
        self.km
    }

    pub fn as_miles(&self) -> f64 {
        self.km / KM_PER_MILE
    }

    /// Value in `unit` with two decimals, e.g. `343.56 km`
    pub fn to_string(&self, unit: &DistanceUnit) -> String {
        let value = match unit {
            DistanceUnit::Km => self.as_km(),
            DistanceUnit::Mi => self.as_miles(),
        };
        format!("{value:.2} {}", unit.to_str())
    }

    pub fn is_zero(&self) -> bool {
        self.km == 0.0
    }
}

#[test]
fn test_distance_format() {
    let d = Distance::from_km(343.556);
    assert_eq!(d.to_string(&DistanceUnit::Km), "343.56 km");
    assert_eq!(Distance::from_miles(1.0).to_string(&DistanceUnit::Km), "1.61 km");
    assert!(Distance::default().is_zero());
}
