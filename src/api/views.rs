use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};
use tera::Context;
use crate::error::AppError;
use crate::state::AppState;

pub fn render(state: &AppState, template: &str, context: &Context) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.render(template, context)?))
}

/// HTML error page. Falls back to the JSON error if the page itself fails to render.
pub fn error_page(state: &AppState, err: AppError) -> Response {
    let mut context = Context::new();
    context.insert("status", &err.status().as_u16());
    context.insert("message", &err.public_message());

    match render(state, "error.html", &context) {
        Ok(page) => (err.status(), page).into_response(),
        Err(render_err) => {
            tracing::error!("Failed to render error page: {}", render_err);
            err.into_response()
        }
    }
}

pub fn bad_request(page: Html<String>) -> Response {
    (StatusCode::BAD_REQUEST, page).into_response()
}
