use serde::Serialize;

#[derive(Serialize)]
pub struct LocationUpdateResponse {
    pub status: &'static str,
    pub safety_score: i32,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
