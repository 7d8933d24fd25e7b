//! Case endpoints.
//!
//! - `POST /api/cases` — create a case
//! - `GET /api/cases` — list all cases
//! - `GET /api/cases/:id` — one case

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{MedicalCase, NewMedicalCase};

/// `POST /api/cases` — create a case.
///
/// Malformed bodies and empty required fields both answer 400 with the
/// same generic message.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewMedicalCase>, JsonRejection>,
) -> Result<Json<MedicalCase>, ApiError> {
    let Json(new_case) = payload.map_err(|_| ApiError::BadRequest("Invalid case data".into()))?;
    validate_case(&new_case)?;

    let case = ctx.store.create_case(new_case)?;
    tracing::info!(case_id = case.id, "Created medical case");
    Ok(Json(case))
}

fn validate_case(new_case: &NewMedicalCase) -> Result<(), ApiError> {
    let required = [
        &new_case.patient_id,
        &new_case.gender,
        &new_case.chief_complaint,
        &new_case.symptoms_history,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(ApiError::BadRequest("Invalid case data".into()));
    }
    Ok(())
}

/// `GET /api/cases` — all cases, ascending id.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<MedicalCase>>, ApiError> {
    Ok(Json(ctx.store.cases()?))
}

/// `GET /api/cases/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<u64>,
) -> Result<Json<MedicalCase>, ApiError> {
    let case = ctx
        .store
        .case(id)?
        .ok_or_else(|| ApiError::NotFound("Case not found".into()))?;
    Ok(Json(case))
}
