// libs/patient-cell/src/services/noshow.rs
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Patient, PatientError};
use crate::store::PatientStore;

/// Tracks patient no-shows and enforces the blocking threshold.
///
/// Nothing in the appointment lifecycle calls this automatically; the
/// endpoint exists for staff marking a lapsed appointment by hand.
pub struct NoShowTrackingService {
    patients: Arc<dyn PatientStore>,
}

impl NoShowTrackingService {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self { patients }
    }

    /// Increment the patient's no-show counter. Blocking happens inside the
    /// store, atomically with the increment; the returned record reflects the
    /// post-increment state.
    pub async fn record_no_show(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        let patient = self.patients.record_no_show(patient_id).await?;

        if patient.is_blocked {
            warn!(
                "Patient {} is blocked after {} no-shows",
                patient_id, patient.no_show_count
            );
        } else {
            info!(
                "Recorded no-show for patient {} (count now {})",
                patient_id, patient.no_show_count
            );
        }

        Ok(patient)
    }

    pub async fn is_blocked(&self, patient_id: Uuid) -> Result<bool, PatientError> {
        debug!("Checking blocked state for patient {}", patient_id);

        let patient = self
            .patients
            .find_by_id(patient_id)
            .await?
            .ok_or(PatientError::NotFound)?;

        Ok(patient.is_blocked)
    }
}
