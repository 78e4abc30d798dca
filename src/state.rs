use std::sync::Arc;
use crate::domain::ports::{IdentityProvider, TouristRepository};
use crate::domain::services::{
    registration::RegistrationService, safety::SafetyPolicy, session_service::SessionService,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tourist_repo: Arc<dyn TouristRepository>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub session_service: Arc<SessionService>,
    pub registration_service: Arc<RegistrationService>,
    pub safety_policy: Arc<SafetyPolicy>,
    pub templates: Arc<Tera>,
}
