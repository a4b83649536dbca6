use axum::{routing::get, Router};

use appointment_cell::handlers::AppointmentCellState;
use appointment_cell::router::appointment_routes;
use patient_cell::router::patient_routes;
use review_cell::router::review_routes;

use crate::state::AppState;

pub fn create_router(state: &AppState) -> Router {
    let appointment_state = AppointmentCellState {
        booking: state.booking.clone(),
        lifecycle: state.lifecycle.clone(),
    };

    Router::new()
        .route("/", get(|| async { "Bookwell API is running!" }))
        .nest("/appointments", appointment_routes(appointment_state))
        .nest("/patients", patient_routes(state.no_show.clone()))
        .nest("/reviews", review_routes(state.rating.clone()))
}
