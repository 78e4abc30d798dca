use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use crate::api::{
    dtos::requests::RegistrationForm,
    extractors::session::MaybeSessionUser,
    views::{bad_request, render},
};
use crate::domain::models::identity::SessionClaims;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tera::Context;
use tracing::{info, warn};

fn form_context(claims: &SessionClaims, error: Option<&str>) -> Context {
    let mut context = Context::new();
    context.insert("email", &claims.email);
    context.insert("name", &claims.name.clone().unwrap_or_default());
    if let Some(message) = error {
        context.insert("error", message);
    }
    context
}

pub async fn show_form(
    State(state): State<Arc<AppState>>,
    MaybeSessionUser(session): MaybeSessionUser,
) -> Result<Response, AppError> {
    let Some(claims) = session else {
        return Ok(Redirect::to("/").into_response());
    };

    if state.tourist_repo.find_by_provider_subject(&claims.sub).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(render(&state, "form.html", &form_context(&claims, None))?.into_response())
}

pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    MaybeSessionUser(session): MaybeSessionUser,
    form: Result<Form<RegistrationForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Some(claims) = session else {
        return Ok(Redirect::to("/").into_response());
    };

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(subject = %claims.sub, "Unreadable registration form: {}", rejection.body_text());
            let message = "The form could not be read, please fill it in again";
            let page = render(&state, "form.html", &form_context(&claims, Some(message)))?;
            return Ok(bad_request(page));
        }
    };

    let profile = match form.into_profile() {
        Ok(profile) => profile,
        Err(err @ AppError::MissingField(_)) => {
            let page = render(&state, "form.html", &form_context(&claims, Some(&err.to_string())))?;
            return Ok(bad_request(page));
        }
        Err(err) => return Err(err),
    };

    let tourist = state.registration_service.register(&claims, profile).await?;
    info!(tourist_id = %tourist.tourist_id, subject = %claims.sub, "Registration complete");

    Ok(Redirect::to("/dashboard").into_response())
}
