use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use crate::api::{dtos::requests::CallbackParams, extractors::session::SESSION_COOKIE, views::error_page};
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let oauth_state = state.session_service.new_oauth_state();
    let url = state.identity_provider
        .authorization_url(&state.config.callback_url(), &oauth_state)?;

    cookies.add(build_cookie(&state, OAUTH_STATE_COOKIE, oauth_state, Duration::minutes(10)));

    Ok(Redirect::to(&url))
}

pub async fn callback(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Query(params): Query<CallbackParams>,
) -> Response {
    match complete_login(&state, &cookies, params).await {
        Ok(redirect) => redirect.into_response(),
        Err(err @ AppError::AuthenticationFailed(_)) => {
            warn!("Login failed: {}", err);
            error_page(&state, err)
        }
        Err(err) => err.into_response(),
    }
}

async fn complete_login(
    state: &AppState,
    cookies: &Cookies,
    params: CallbackParams,
) -> Result<Redirect, AppError> {
    let expected_state = cookies.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    cookies.remove(Cookie::build((OAUTH_STATE_COOKIE, "")).path("/").into());

    if let Some(provider_error) = params.error {
        return Err(AppError::AuthenticationFailed(format!("Provider returned an error: {}", provider_error)));
    }

    match (expected_state, params.state) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(AppError::AuthenticationFailed("Login request expired or did not match".into())),
    }

    let code = params.code
        .ok_or_else(|| AppError::AuthenticationFailed("Missing authorization code".into()))?;

    let profile = state.identity_provider
        .exchange_code(&code, &state.config.callback_url())
        .await?;

    let token = state.session_service.issue(&profile)?;
    cookies.add(build_cookie(state, SESSION_COOKIE, token, session_max_age(state)));

    info!(subject = %profile.sub, "User logged in");

    let registered = state.tourist_repo.find_by_provider_subject(&profile.sub).await?.is_some();
    Ok(if registered {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/form")
    })
}

pub async fn logout(cookies: Cookies) -> Redirect {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
    info!("User logged out");
    Redirect::to("/")
}

fn session_max_age(state: &AppState) -> Duration {
    Duration::seconds(state.session_service.ttl().num_seconds())
}

fn build_cookie(state: &AppState, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_secure(state.config.cookie_secure);
    // Lax so the cookie survives the provider's top-level redirect back to us.
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(max_age);
    cookie
}
