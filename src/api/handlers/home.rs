use axum::{extract::State, response::IntoResponse};
use crate::api::{extractors::session::MaybeSessionUser, views::render};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tera::Context;

pub async fn index(
    State(state): State<Arc<AppState>>,
    MaybeSessionUser(session): MaybeSessionUser,
) -> Result<impl IntoResponse, AppError> {
    let mut context = Context::new();
    context.insert("logged_in", &session.is_some());
    if let Some(claims) = &session {
        context.insert("email", &claims.email);
    }
    render(&state, "index.html", &context)
}
