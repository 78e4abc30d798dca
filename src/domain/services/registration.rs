use std::sync::Arc;
use crate::domain::{
    models::{identity::SessionClaims, tourist::{RegistrationProfile, Tourist}},
    ports::{BadgeRenderer, TouristRepository},
    services::identifier::generate_tourist_id,
};
use crate::error::AppError;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use tracing::{info, warn};

pub const MAX_ID_ATTEMPTS: usize = 5;

pub struct RegistrationService {
    repo: Arc<dyn TouristRepository>,
    renderer: Arc<dyn BadgeRenderer>,
    id_source: fn() -> String,
}

impl RegistrationService {
    pub fn new(repo: Arc<dyn TouristRepository>, renderer: Arc<dyn BadgeRenderer>) -> Self {
        Self::with_id_source(repo, renderer, generate_tourist_id)
    }

    pub fn with_id_source(
        repo: Arc<dyn TouristRepository>,
        renderer: Arc<dyn BadgeRenderer>,
        id_source: fn() -> String,
    ) -> Self {
        Self { repo, renderer, id_source }
    }

    /// Creates the record for this identity, or returns the one it already has.
    pub async fn register(&self, identity: &SessionClaims, profile: RegistrationProfile) -> Result<Tourist, AppError> {
        if let Some(existing) = self.repo.find_by_provider_subject(&identity.sub).await? {
            info!(tourist_id = %existing.tourist_id, "Registration skipped, identity already registered");
            return Ok(existing);
        }

        let tourist_id = self.allocate_tourist_id().await?;
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(profile.password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)?
            .to_string();

        let qr_code_path = self.renderer.render(&tourist_id).await?;

        let tourist = Tourist::new(
            identity.sub.clone(),
            identity.email.clone(),
            tourist_id,
            qr_code_path,
            profile,
            password_hash,
        );
        let created = match self.repo.create(&tourist).await {
            Ok(created) => created,
            Err(err) => {
                if let Err(cleanup) = self.renderer.discard(&tourist.qr_code_path).await {
                    warn!(path = %tourist.qr_code_path, "Could not remove QR code after failed insert: {}", cleanup);
                }
                return Err(err);
            }
        };

        info!(tourist_id = %created.tourist_id, "Registered tourist");
        Ok(created)
    }

    async fn allocate_tourist_id(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = (self.id_source)();
            if self.repo.find_by_tourist_id(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            warn!(attempt, candidate = %candidate, "Tourist id collision, retrying");
        }

        Err(AppError::InternalWithMsg(format!(
            "Could not allocate a unique tourist id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }
}
