use crate::domain::models::{identity::ProviderProfile, tourist::Tourist};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait TouristRepository: Send + Sync {
    async fn create(&self, tourist: &Tourist) -> Result<Tourist, AppError>;
    async fn find_by_provider_subject(&self, subject: &str) -> Result<Option<Tourist>, AppError>;
    async fn find_by_tourist_id(&self, tourist_id: &str) -> Result<Option<Tourist>, AppError>;
    async fn update_location(&self, id: &str, latitude: f64, longitude: f64, safety_score: i32) -> Result<Tourist, AppError>;
}

/// OAuth2 / OpenID Connect authorization-code provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, AppError>;
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<ProviderProfile, AppError>;
}

/// Produces the scannable code for a tourist identifier and returns where it was stored,
/// relative to the static asset directory.
#[async_trait]
pub trait BadgeRenderer: Send + Sync {
    async fn render(&self, tourist_id: &str) -> Result<String, AppError>;
    /// Removes an artifact returned by `render`.
    async fn discard(&self, relative_path: &str) -> Result<(), AppError>;
}
