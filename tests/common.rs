use tourist_registry::{
    api::router::create_router,
    config::Config,
    domain::models::{identity::ProviderProfile, risk_zone::RiskZone},
    domain::ports::IdentityProvider,
    error::AppError,
    infra::factory::{assemble_state, build_templates, run_sqlite_migrations},
    infra::repositories::sqlite_tourist_repo::SqliteTouristRepo,
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, Response, header},
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_SECRET: &str = "test-session-secret-0123456789abcdef";

/// Maps authorization codes to profiles. Unknown codes fail like a rejected exchange.
#[derive(Default)]
pub struct MockIdentityProvider {
    profiles: Mutex<HashMap<String, ProviderProfile>>,
}

impl MockIdentityProvider {
    pub fn register_code(&self, code: &str, sub: &str, email: &str) {
        self.profiles.lock().unwrap().insert(
            code.to_string(),
            ProviderProfile {
                sub: sub.to_string(),
                email: email.to_string(),
                name: Some("Test Traveller".to_string()),
            },
        );
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, AppError> {
        Ok(format!(
            "https://idp.test/authorize?client_id=test-client&redirect_uri={}&state={}",
            redirect_uri, state
        ))
    }

    async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> Result<ProviderProfile, AppError> {
        self.profiles
            .lock()
            .unwrap()
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::AuthenticationFailed("Token exchange failed: invalid_grant".into()))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub static_dir: String,
    pub provider: Arc<MockIdentityProvider>,
    pub state: Arc<AppState>,
}

pub fn test_config(db_url: &str, static_dir: &str, zones: Vec<RiskZone>) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        public_base_url: "http://localhost:3000".to_string(),
        session_secret: TEST_SECRET.to_string(),
        session_ttl_hours: 1,
        cookie_secure: false,
        oauth_client_id: "test-client".to_string(),
        oauth_client_secret: "test-secret".to_string(),
        oauth_auth_url: "https://idp.test/authorize".to_string(),
        oauth_token_url: "https://idp.test/token".to_string(),
        oauth_userinfo_url: "https://idp.test/userinfo".to_string(),
        provider_timeout_secs: 1,
        static_dir: static_dir.to_string(),
        risk_zones: zones,
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_zones(RiskZone::defaults()).await
    }

    pub async fn with_zones(zones: Vec<RiskZone>) -> Self {
        let run_id = Uuid::new_v4();
        let db_filename = format!("test_{}.db", run_id);
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        let static_dir = format!("test_static_{}", run_id);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = test_config(&db_url, &static_dir, zones);
        let provider = Arc::new(MockIdentityProvider::default());

        let state = Arc::new(assemble_state(
            &config,
            Arc::new(SqliteTouristRepo::new(pool.clone())),
            provider.clone(),
            build_templates().expect("templates should parse"),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            static_dir,
            provider,
            state,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, format!("session={}", cookie));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Runs `/login` then `/login/callback` and returns the session token and the callback response.
    pub async fn login_via_callback(&self, sub: &str, email: &str) -> (String, Response<Body>) {
        let code = format!("code-{}", sub);
        self.provider.register_code(&code, sub, email);

        let login = self.get("/login", None).await;
        let oauth_state = cookie_value(&login, "oauth_state").expect("login should set oauth_state");

        let response = self.send(
            Request::builder()
                .method("GET")
                .uri(format!("/login/callback?code={}&state={}", code, oauth_state))
                .header(header::COOKIE, format!("oauth_state={}", oauth_state))
                .body(Body::empty())
                .unwrap(),
        ).await;

        let session = cookie_value(&response, "session").expect("callback should set a session");
        (session, response)
    }

    pub async fn login(&self, sub: &str) -> String {
        self.login_via_callback(sub, &format!("{}@example.com", sub)).await.0
    }

    pub async fn post_form(&self, session: Option<&str>, body: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/form")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, format!("session={}", cookie));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn register(&self, session: &str) -> Response<Body> {
        self.post_form(Some(session), FULL_FORM).await
    }

    pub async fn post_location(&self, session: Option<&str>, body: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/update_location")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = session {
            builder = builder.header(header::COOKIE, format!("session={}", cookie));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn count_for_subject(&self, sub: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM tourists WHERE provider_subject = ?")
            .bind(sub)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn stored_position(&self, sub: &str) -> (f64, f64, i32) {
        sqlx::query_as("SELECT latitude, longitude, safety_score FROM tourists WHERE provider_subject = ?")
            .bind(sub)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn set_score(&self, sub: &str, score: i32) {
        sqlx::query("UPDATE tourists SET safety_score = ? WHERE provider_subject = ?")
            .bind(score)
            .bind(sub)
            .execute(&self.pool)
            .await
            .unwrap();
    }
}

#[allow(dead_code)]
pub const FULL_FORM: &str =
    "name=Asha+Das&national_id=1234-5678-9012&dob=1994-05-17&gender=female&mobile=9876543210&username=asha&password=s3cret";

#[allow(dead_code)]
pub fn cookie_value(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .filter(|c| c.starts_with(&prefix))
        .map(|c| c[prefix.len()..].split(';').next().unwrap_or_default().to_string())
        .find(|v| !v.is_empty())
}

#[allow(dead_code)]
pub fn location(response: &Response<Body>) -> String {
    response.headers()
        .get(header::LOCATION)
        .expect("expected a redirect")
        .to_str()
        .unwrap()
        .to_string()
}

#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}
