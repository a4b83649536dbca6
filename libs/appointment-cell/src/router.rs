// libs/appointment-cell/src/router.rs
use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, AppointmentCellState};

pub fn appointment_routes(state: AppointmentCellState) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/patients/{patient_id}/upcoming", get(handlers::get_patient_upcoming))
        .route("/patients/{patient_id}/past", get(handlers::get_patient_past))
        .route("/doctors/{doctor_id}/upcoming", get(handlers::get_doctor_upcoming))
        .with_state(state)
}
