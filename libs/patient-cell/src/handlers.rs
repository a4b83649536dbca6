// libs/patient-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::PatientError;
use crate::services::NoShowTrackingService;

fn map_patient_error(e: PatientError) -> AppError {
    match e {
        PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
        PatientError::DatabaseError(msg) => AppError::Database(msg),
    }
}

/// Operator action: mark that a patient failed to show up.
#[axum::debug_handler]
pub async fn record_no_show(
    State(service): State<Arc<NoShowTrackingService>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let patient = service
        .record_no_show(patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "success": true,
        "no_show_count": patient.no_show_count,
        "is_blocked": patient.is_blocked,
    })))
}

#[axum::debug_handler]
pub async fn is_blocked(
    State(service): State<Arc<NoShowTrackingService>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let blocked = service
        .is_blocked(patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({ "is_blocked": blocked })))
}
