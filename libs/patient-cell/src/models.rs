// libs/patient-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A patient who has booked at least once is blocked after this many
/// no-shows. There is no unblocking path.
pub const NO_SHOW_BLOCK_THRESHOLD: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub no_show_count: i32,
    pub is_blocked: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
