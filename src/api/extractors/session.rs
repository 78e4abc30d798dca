use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::state::AppState;
use crate::error::AppError;
use crate::domain::models::identity::SessionClaims;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

pub const SESSION_COOKIE: &str = "session";

/// An authenticated identity. Rejects with a structured 401.
pub struct SessionUser(pub SessionClaims);

/// The identity if the request carries a valid session, otherwise `None`.
pub struct MaybeSessionUser(pub Option<SessionClaims>);

fn read_session(parts: &Parts, state: &AppState) -> Option<SessionClaims> {
    let cookies = parts.extensions.get::<Cookies>()?;
    let token = cookies.get(SESSION_COOKIE)?;
    let claims = state.session_service.verify(token.value())?;

    Span::current().record("subject", claims.sub.as_str());
    Some(claims)
}

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        read_session(parts, &app_state)
            .map(SessionUser)
            .ok_or(AppError::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for MaybeSessionUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        Ok(MaybeSessionUser(read_session(parts, &app_state)))
    }
}
