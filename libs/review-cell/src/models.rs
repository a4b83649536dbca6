// libs/review-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// An immutable review. Exactly one of `doctor_id`/`lab_id` is set; the
/// constructors are the only way service code builds one, which keeps the
/// XOR invariant out of reach of callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn for_doctor(patient_id: Uuid, doctor_id: Uuid, rating: i32, comment: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id: Some(doctor_id),
            lab_id: None,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }

    pub fn for_lab(patient_id: Uuid, lab_id: Uuid, rating: i32, comment: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id: None,
            lab_id: Some(lab_id),
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReviewRequest {
    pub patient_id: Uuid,
    pub rating: i32,
    pub comment: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Laboratory not found")]
    LaboratoryNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
