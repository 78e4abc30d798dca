use axum::{extract::State, response::{IntoResponse, Redirect, Response}};
use crate::api::{extractors::session::MaybeSessionUser, views::render};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tera::Context;

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    MaybeSessionUser(session): MaybeSessionUser,
) -> Result<Response, AppError> {
    let Some(claims) = session else {
        return Ok(Redirect::to("/").into_response());
    };

    let Some(tourist) = state.tourist_repo.find_by_provider_subject(&claims.sub).await? else {
        return Ok(Redirect::to("/form").into_response());
    };

    let mut context = Context::new();
    context.insert("tourist", &tourist);
    context.insert("qr_url", &format!("/static/{}", tourist.qr_code_path));

    Ok(render(&state, "dashboard.html", &context)?.into_response())
}
