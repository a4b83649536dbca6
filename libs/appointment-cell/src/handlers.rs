// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AppointmentError, BookAppointmentRequest, CancelAppointmentRequest, CancelledBy,
};
use crate::services::{BookingService, LifecycleService};

#[derive(Clone)]
pub struct AppointmentCellState {
    pub booking: Arc<BookingService>,
    pub lifecycle: Arc<LifecycleService>,
}

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AppointmentError::SlotConflict => {
            AppError::Conflict("Time slot already booked".to_string())
        }
        AppointmentError::StateConflict(status) => {
            AppError::Conflict(format!("Appointment is already {}", status))
        }
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<AppointmentCellState>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .booking
        .create_appointment(
            request.patient_id,
            request.doctor_id,
            request.appointment_date,
            &request.appointment_time,
        )
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .booking
        .get_appointment(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    match request.cancelled_by {
        CancelledBy::Patient => state
            .lifecycle
            .cancel_by_patient(appointment_id)
            .await
            .map_err(map_appointment_error)?,
        CancelledBy::Doctor => state
            .lifecycle
            .cancel_by_doctor(appointment_id, request.reason)
            .await
            .map_err(map_appointment_error)?,
    }

    Ok(Json(json!({
        "success": true,
        "message": "Appointment cancelled successfully",
    })))
}

#[axum::debug_handler]
pub async fn get_patient_upcoming(
    State(state): State<AppointmentCellState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .booking
        .upcoming_for_patient(patient_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_patient_past(
    State(state): State<AppointmentCellState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .booking
        .past_for_patient(patient_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_doctor_upcoming(
    State(state): State<AppointmentCellState>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointments = state
        .booking
        .upcoming_for_doctor(doctor_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "appointments": appointments })))
}
