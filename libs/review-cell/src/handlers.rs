// libs/review-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{ReviewError, SubmitReviewRequest};
use crate::services::RatingService;

fn map_review_error(e: ReviewError) -> AppError {
    match e {
        ReviewError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        ReviewError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        ReviewError::LaboratoryNotFound => {
            AppError::NotFound("Laboratory not found".to_string())
        }
        ReviewError::ValidationError(msg) => AppError::ValidationError(msg),
        ReviewError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn submit_doctor_review(
    State(service): State<Arc<RatingService>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Json<Value>, AppError> {
    let review = service
        .review_doctor(request.patient_id, doctor_id, request.rating, request.comment)
        .await
        .map_err(map_review_error)?;

    Ok(Json(json!({
        "success": true,
        "review": review,
    })))
}

#[axum::debug_handler]
pub async fn submit_lab_review(
    State(service): State<Arc<RatingService>>,
    Path(lab_id): Path<Uuid>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Json<Value>, AppError> {
    let review = service
        .review_lab(request.patient_id, lab_id, request.rating, request.comment)
        .await
        .map_err(map_review_error)?;

    Ok(Json(json!({
        "success": true,
        "review": review,
    })))
}

#[axum::debug_handler]
pub async fn list_doctor_reviews(
    State(service): State<Arc<RatingService>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let reviews = service
        .reviews_for_doctor(doctor_id)
        .await
        .map_err(map_review_error)?;

    Ok(Json(json!({ "reviews": reviews })))
}

#[axum::debug_handler]
pub async fn list_lab_reviews(
    State(service): State<Arc<RatingService>>,
    Path(lab_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let reviews = service
        .reviews_for_lab(lab_id)
        .await
        .map_err(map_review_error)?;

    Ok(Json(json!({ "reviews": reviews })))
}
