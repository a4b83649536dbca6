// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Hours past the scheduled slot before the sweep treats a Scheduled
/// appointment as completed.
pub const COMPLETION_GRACE_HOURS: i64 = 2;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    /// Slot token as the provider published it, e.g. "10:00". Treated as an
    /// opaque key for slot identity; parsed only when the sweep needs a
    /// chronological comparison.
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// The slot as an instant in time, or None when the stored token does
    /// not parse. Used by the sweep; string comparison of date/time fields
    /// is not reliable across formats.
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        let time = parse_slot_time(&self.appointment_time)?;
        Some(self.appointment_date.and_time(time).and_utc())
    }
}

/// Parse a slot token. Providers publish minute-granularity tokens; a
/// seconds suffix is tolerated for data imported from other systems.
pub fn parse_slot_time(token: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(token, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M:%S"))
        .ok()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    CancelledByPatient,
    CancelledByDoctor,
    NoShow,
}

impl AppointmentStatus {
    /// Every non-Scheduled status is terminal; no operation transitions out
    /// of them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::CancelledByPatient => write!(f, "cancelled_by_patient"),
            AppointmentStatus::CancelledByDoctor => write!(f, "cancelled_by_doctor"),
            AppointmentStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// Statuses that appear in a patient's history view.
pub const TERMINAL_STATUSES: [AppointmentStatus; 4] = [
    AppointmentStatus::Completed,
    AppointmentStatus::CancelledByPatient,
    AppointmentStatus::CancelledByDoctor,
    AppointmentStatus::NoShow,
];

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelAppointmentRequest {
    pub cancelled_by: CancelledBy,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Patient,
    Doctor,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Time slot already booked")]
    SlotConflict,

    /// Reserved for a deployment that guards transitions out of terminal
    /// states. The current lifecycle performs no such guard and never
    /// raises it.
    #[error("Appointment is already in terminal status: {0}")]
    StateConflict(AppointmentStatus),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
