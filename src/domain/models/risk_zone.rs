use serde::{Deserialize, Serialize};

pub const DEFAULT_ZONE_RADIUS: f64 = 0.01;
pub const DEFAULT_ZONE_PENALTY: i32 = 20;

/// A square area around a centre point. A position is inside when both its
/// latitude and longitude differ from the centre by strictly less than `radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskZone {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_penalty")]
    pub penalty: i32,
}

fn default_radius() -> f64 {
    DEFAULT_ZONE_RADIUS
}

fn default_penalty() -> i32 {
    DEFAULT_ZONE_PENALTY
}

impl RiskZone {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius: DEFAULT_ZONE_RADIUS,
            penalty: DEFAULT_ZONE_PENALTY,
        }
    }

    pub fn defaults() -> Vec<RiskZone> {
        vec![RiskZone::new(26.2, 91.7)]
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (latitude - self.latitude).abs() < self.radius
            && (longitude - self.longitude).abs() < self.radius
    }
}
