use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const MAX_SAFETY_SCORE: i32 = 100;
pub const MIN_SAFETY_SCORE: i32 = 0;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Tourist {
    pub id: String,
    pub provider_subject: String,
    pub name: String,
    pub national_id: String,
    pub date_of_birth: String,
    pub gender: String,
    pub mobile: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub tourist_id: String,
    pub qr_code_path: String,
    pub latitude: f64,
    pub longitude: f64,
    pub safety_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes collected by the registration form.
#[derive(Debug, Clone)]
pub struct RegistrationProfile {
    pub name: String,
    pub national_id: String,
    pub date_of_birth: String,
    pub gender: String,
    pub mobile: String,
    pub username: String,
    pub password: String,
}

impl Tourist {
    pub fn new(
        provider_subject: String,
        email: String,
        tourist_id: String,
        qr_code_path: String,
        profile: RegistrationProfile,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            provider_subject,
            name: profile.name,
            national_id: profile.national_id,
            date_of_birth: profile.date_of_birth,
            gender: profile.gender,
            mobile: profile.mobile,
            username: profile.username,
            password_hash,
            email,
            tourist_id,
            qr_code_path,
            latitude: 0.0,
            longitude: 0.0,
            safety_score: MAX_SAFETY_SCORE,
            created_at: now,
            updated_at: now,
        }
    }
}
