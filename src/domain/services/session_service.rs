use crate::domain::models::identity::{ProviderProfile, SessionClaims};
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};

pub const SESSION_AUDIENCE: &str = "tourist-portal";
pub const SESSION_ISSUER: &str = "tourist-registry";

pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, profile: &ProviderProfile) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            iss: SESSION_ISSUER.to_string(),
            sub: profile.sub.clone(),
            aud: SESSION_AUDIENCE.to_string(),
            exp: (now + self.ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            email: profile.email.clone(),
            name: profile.name.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Session token encoding failed: {}", e);
            AppError::Internal
        })
    }

    /// Returns `None` for anything that is not a live token we signed.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[SESSION_AUDIENCE]);
        validation.set_issuer(&[SESSION_ISSUER]);

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .ok()
    }

    pub fn new_oauth_state(&self) -> String {
        rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn profile() -> ProviderProfile {
        ProviderProfile {
            sub: "google-sub-1".to_string(),
            email: "traveller@example.com".to_string(),
            name: Some("Traveller".to_string()),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let service = SessionService::new(SECRET, 24);
        let token = service.issue(&profile()).unwrap();
        let claims = service.verify(&token).expect("token should verify");
        assert_eq!(claims.sub, "google-sub-1");
        assert_eq!(claims.email, "traveller@example.com");
        assert_eq!(claims.name.as_deref(), Some("Traveller"));
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let token = SessionService::new(SECRET, 24).issue(&profile()).unwrap();
        let other = SessionService::new("ffffffffffffffffffffffffffffffff", 24);
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = SessionService::new(SECRET, -2);
        let token = service.issue(&profile()).unwrap();
        assert!(service.verify(&token).is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let service = SessionService::new(SECRET, 24);
        assert!(service.verify("not-a-token").is_none());
        assert!(service.verify("").is_none());
    }

    #[test]
    fn test_oauth_state_is_random() {
        let service = SessionService::new(SECRET, 24);
        let a = service.new_oauth_state();
        let b = service.new_oauth_state();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
