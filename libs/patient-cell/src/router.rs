// libs/patient-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::services::NoShowTrackingService;

pub fn patient_routes(service: Arc<NoShowTrackingService>) -> Router {
    Router::new()
        .route("/{patient_id}/no-show", post(handlers::record_no_show))
        .route("/{patient_id}/blocked", get(handlers::is_blocked))
        .with_state(service)
}
