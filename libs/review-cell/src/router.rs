// libs/review-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers;
use crate::services::RatingService;

pub fn review_routes(service: Arc<RatingService>) -> Router {
    Router::new()
        .route(
            "/doctors/{doctor_id}",
            post(handlers::submit_doctor_review).get(handlers::list_doctor_reviews),
        )
        .route(
            "/labs/{lab_id}",
            post(handlers::submit_lab_review).get(handlers::list_lab_reviews),
        )
        .with_state(service)
}
