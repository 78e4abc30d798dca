use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{BadgeRenderer, IdentityProvider, TouristRepository};
use crate::domain::services::{
    registration::RegistrationService, safety::SafetyPolicy, session_service::SessionService,
};
use crate::infra::badge::qr_badge_renderer::QrBadgeRenderer;
use crate::infra::identity::oidc_provider::OidcIdentityProvider;
use crate::infra::repositories::{
    postgres_tourist_repo::PostgresTouristRepo, sqlite_tourist_repo::SqliteTouristRepo,
};

pub fn build_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("index.html", include_str!("../templates/index.html")),
        ("form.html", include_str!("../templates/form.html")),
        ("dashboard.html", include_str!("../templates/dashboard.html")),
        ("error.html", include_str!("../templates/error.html")),
    ])?;
    Ok(tera)
}

/// Wires services around an already chosen repository and identity provider.
pub fn assemble_state(
    config: &Config,
    tourist_repo: Arc<dyn TouristRepository>,
    identity_provider: Arc<dyn IdentityProvider>,
    templates: Tera,
) -> AppState {
    let badge_renderer: Arc<dyn BadgeRenderer> = Arc::new(QrBadgeRenderer::new(&config.static_dir));
    let registration_service = Arc::new(RegistrationService::new(tourist_repo.clone(), badge_renderer));

    AppState {
        config: config.clone(),
        tourist_repo,
        identity_provider,
        session_service: Arc::new(SessionService::new(&config.session_secret, config.session_ttl_hours)),
        registration_service,
        safety_policy: Arc::new(SafetyPolicy::new(config.risk_zones.clone())),
        templates: Arc::new(templates),
    }
}

pub async fn bootstrap_state(config: &Config) -> anyhow::Result<AppState> {
    let database_url = &config.database_url;
    let templates = build_templates()?;

    let identity_provider = Arc::new(OidcIdentityProvider::new(
        config.oauth_client_id.clone(),
        config.oauth_client_secret.clone(),
        config.oauth_auth_url.clone(),
        config.oauth_token_url.clone(),
        config.oauth_userinfo_url.clone(),
        Duration::from_secs(config.provider_timeout_secs),
    )?);

    let tourist_repo: Arc<dyn TouristRepository> =
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            info!("Initializing PostgreSQL connection...");

            let mut opts: PgConnectOptions = database_url.parse()?;
            opts = opts.log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect_with(opts)
                .await?;

            run_postgres_migrations(&pool).await?;
            Arc::new(PostgresTouristRepo::new(pool))
        } else {
            info!("Initializing SQLite connection with WAL Mode...");

            let opts = SqliteConnectOptions::from_str(database_url)?
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(opts)
                .await?;

            run_sqlite_migrations(&pool).await?;
            Arc::new(SqliteTouristRepo::new(pool))
        };

    info!(zones = config.risk_zones.len(), "Loaded risk zones");
    Ok(assemble_state(config, tourist_repo, identity_provider, templates))
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations/sqlite").run(pool).await
}
