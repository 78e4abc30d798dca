use axum::{body::Bytes, extract::State, Json};
use crate::api::dtos::{requests::Coordinates, responses::LocationUpdateResponse};
use crate::api::extractors::session::SessionUser;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn update_location(
    State(state): State<Arc<AppState>>,
    SessionUser(claims): SessionUser,
    body: Bytes,
) -> Result<Json<LocationUpdateResponse>, AppError> {
    let coords = Coordinates::from_body(&body)?;

    let tourist = state.tourist_repo.find_by_provider_subject(&claims.sub).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let policy = &state.safety_policy;
    let hits = policy.matching_zones(coords.latitude, coords.longitude).count();
    let score = policy.adjust(tourist.safety_score, coords.latitude, coords.longitude);

    let updated = state.tourist_repo
        .update_location(&tourist.id, coords.latitude, coords.longitude, score)
        .await?;

    if hits > 0 {
        warn!(
            tourist_id = %updated.tourist_id,
            zones = hits,
            safety_score = updated.safety_score,
            "Location inside risk zone"
        );
    } else {
        info!(tourist_id = %updated.tourist_id, "Location updated");
    }

    Ok(Json(LocationUpdateResponse {
        status: "success",
        safety_score: updated.safety_score,
    }))
}
