// libs/provider-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable doctor. `average_rating` and `total_reviews` are derived state,
/// written only by the rating recompute in review-cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    pub location: String,
    pub average_rating: f64,
    pub total_reviews: i32,
}

/// A laboratory offering test slots. Carries the same derived rating fields
/// as `Doctor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laboratory {
    pub id: Uuid,
    pub lab_name: String,
    pub location: String,
    pub average_rating: f64,
    pub total_reviews: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Laboratory not found")]
    LaboratoryNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
