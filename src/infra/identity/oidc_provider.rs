use crate::domain::{models::identity::ProviderProfile, ports::IdentityProvider};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

pub const OIDC_SCOPES: &str = "openid email profile";

/// Authorization-code flow against an OpenID Connect provider (Google by default).
pub struct OidcIdentityProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

impl OidcIdentityProvider {
    pub fn new(
        client_id: String,
        client_secret: String,
        auth_url: String,
        token_url: String,
        userinfo_url: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            client_id,
            client_secret,
            auth_url,
            token_url,
            userinfo_url,
        })
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

fn auth_failure(stage: &str, detail: impl std::fmt::Display) -> AppError {
    let msg = format!("{} failed: {}", stage, detail);
    error!("{}", msg);
    AppError::AuthenticationFailed(msg)
}

#[async_trait]
impl IdentityProvider for OidcIdentityProvider {
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<String, AppError> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", OIDC_SCOPES),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::InternalWithMsg(format!("Invalid authorization endpoint: {}", e)))?;

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<ProviderProfile, AppError> {
        let res = self.client.post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| auth_failure("Token exchange", e))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(auth_failure("Token exchange", format!("status {}, body {}", status, text)));
        }

        let token: TokenResponse = res.json().await
            .map_err(|e| auth_failure("Token decode", e))?;

        let res = self.client.get(&self.userinfo_url)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| auth_failure("Userinfo request", e))?;

        if !res.status().is_success() {
            return Err(auth_failure("Userinfo request", format!("status {}", res.status())));
        }

        let profile: ProviderProfile = res.json().await
            .map_err(|e| auth_failure("Userinfo decode", e))?;

        debug!(subject = %profile.sub, "Fetched provider profile");
        Ok(profile)
    }
}
