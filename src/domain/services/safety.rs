use crate::domain::models::risk_zone::RiskZone;
use crate::domain::models::tourist::{MAX_SAFETY_SCORE, MIN_SAFETY_SCORE};

/// Scores a reported position against a fixed set of risk zones.
///
/// Every zone containing the position subtracts its penalty, so overlapping
/// zones stack within a single update. The result never leaves
/// `MIN_SAFETY_SCORE..=MAX_SAFETY_SCORE`.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    zones: Vec<RiskZone>,
}

impl SafetyPolicy {
    pub fn new(zones: Vec<RiskZone>) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &[RiskZone] {
        &self.zones
    }

    pub fn matching_zones(&self, latitude: f64, longitude: f64) -> impl Iterator<Item = &RiskZone> {
        self.zones.iter().filter(move |z| z.contains(latitude, longitude))
    }

    pub fn adjust(&self, score: i32, latitude: f64, longitude: f64) -> i32 {
        self.matching_zones(latitude, longitude)
            .fold(score.clamp(MIN_SAFETY_SCORE, MAX_SAFETY_SCORE), |current, zone| {
                current.saturating_sub(zone.penalty.max(0)).max(MIN_SAFETY_SCORE)
            })
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::new(RiskZone::defaults())
    }
}
