// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::{AppointmentError, AppointmentStatus, COMPLETION_GRACE_HOURS};
use crate::store::AppointmentStore;

/// Applies manual cancellation transitions and the time-driven sweep that
/// promotes overdue Scheduled appointments to Completed.
///
/// Cancellations do not check the current status first: cancelling an
/// already-concluded appointment simply overwrites the status, matching the
/// observed behavior this engine replaces.
pub struct LifecycleService {
    appointments: Arc<dyn AppointmentStore>,
}

impl LifecycleService {
    pub fn new(appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { appointments }
    }

    pub async fn cancel_by_patient(&self, appointment_id: Uuid) -> Result<(), AppointmentError> {
        debug!("Patient cancelling appointment {}", appointment_id);

        self.appointments
            .set_status(appointment_id, AppointmentStatus::CancelledByPatient, None)
            .await?;

        info!("Appointment {} cancelled by patient", appointment_id);
        Ok(())
    }

    pub async fn cancel_by_doctor(
        &self,
        appointment_id: Uuid,
        reason: Option<String>,
    ) -> Result<(), AppointmentError> {
        debug!("Doctor cancelling appointment {}", appointment_id);

        self.appointments
            .set_status(appointment_id, AppointmentStatus::CancelledByDoctor, reason)
            .await?;

        info!("Appointment {} cancelled by doctor", appointment_id);
        Ok(())
    }

    /// Promote every Scheduled appointment whose slot lies more than the
    /// grace period before `now`. A failure on one row is logged and the
    /// rest of the batch continues; returns how many rows were promoted.
    pub async fn promote_overdue(&self, now: DateTime<Utc>) -> Result<usize, AppointmentError> {
        let threshold = now - Duration::hours(COMPLETION_GRACE_HOURS);
        debug!("Promoting appointments scheduled before {}", threshold);

        let scheduled = self
            .appointments
            .list_by_status(AppointmentStatus::Scheduled)
            .await?;

        let mut promoted = 0usize;
        for appointment in scheduled {
            let scheduled_at = match appointment.scheduled_at() {
                Some(t) => t,
                None => {
                    warn!(
                        "Skipping appointment {}: unparseable slot token {:?}",
                        appointment.id, appointment.appointment_time
                    );
                    continue;
                }
            };

            if scheduled_at >= threshold {
                continue;
            }

            match self
                .appointments
                .set_status(appointment.id, AppointmentStatus::Completed, None)
                .await
            {
                Ok(_) => promoted += 1,
                Err(e) => {
                    error!(
                        "Failed to promote appointment {} to completed: {}",
                        appointment.id, e
                    );
                }
            }
        }

        if promoted > 0 {
            info!("Promoted {} overdue appointments to completed", promoted);
        }

        Ok(promoted)
    }
}
