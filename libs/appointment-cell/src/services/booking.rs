// libs/appointment-cell/src/services/booking.rs
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use patient_cell::store::PatientStore;
use provider_cell::store::DoctorStore;

use crate::models::{
    parse_slot_time, Appointment, AppointmentError, AppointmentStatus, TERMINAL_STATUSES,
};
use crate::store::AppointmentStore;

/// Creates appointments. The slot-conflict invariant itself lives in
/// `AppointmentStore::insert_scheduled`, so a lost race surfaces here as
/// `SlotConflict` rather than a double booking.
pub struct BookingService {
    appointments: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientStore>,
    doctors: Arc<dyn DoctorStore>,
}

impl BookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        patients: Arc<dyn PatientStore>,
        doctors: Arc<dyn DoctorStore>,
    ) -> Self {
        Self {
            appointments,
            patients,
            doctors,
        }
    }

    pub async fn create_appointment(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        date: NaiveDate,
        time: &str,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} at {} {}",
            patient_id, doctor_id, date, time
        );

        self.validate_slot_token(time)?;

        // Both references must resolve before anything is written.
        self.verify_patient_exists(patient_id).await?;
        self.verify_doctor_exists(doctor_id).await?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id,
            doctor_id,
            appointment_date: date,
            appointment_time: time.to_string(),
            status: AppointmentStatus::Scheduled,
            cancellation_reason: None,
            created_at: Utc::now(),
        };

        let created = self.appointments.insert_scheduled(appointment).await?;

        info!("Appointment {} booked with doctor {}", created.id, doctor_id);
        Ok(created)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        self.appointments
            .find_by_id(id)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Scheduled appointments for a patient, soonest first.
    pub async fn upcoming_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointments
            .list_for_patient(patient_id, &[AppointmentStatus::Scheduled])
            .await
    }

    /// Concluded appointments for a patient, most recent first.
    pub async fn past_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut appointments = self
            .appointments
            .list_for_patient(patient_id, &TERMINAL_STATUSES)
            .await?;
        appointments.reverse();
        Ok(appointments)
    }

    /// Scheduled appointments for a doctor, soonest first.
    pub async fn upcoming_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointments
            .list_for_doctor(doctor_id, AppointmentStatus::Scheduled)
            .await
    }

    fn validate_slot_token(&self, time: &str) -> Result<(), AppointmentError> {
        if time.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "Appointment time must not be blank".to_string(),
            ));
        }

        // Tokens must stay chronologically comparable for the sweep.
        if parse_slot_time(time).is_none() {
            warn!("Rejecting malformed slot token {:?}", time);
            return Err(AppointmentError::ValidationError(format!(
                "Malformed appointment time: {}",
                time
            )));
        }

        Ok(())
    }

    async fn verify_patient_exists(&self, patient_id: Uuid) -> Result<(), AppointmentError> {
        debug!("Verifying patient {}", patient_id);

        let patient = self
            .patients
            .find_by_id(patient_id)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if patient.is_none() {
            return Err(AppointmentError::PatientNotFound);
        }

        Ok(())
    }

    async fn verify_doctor_exists(&self, doctor_id: Uuid) -> Result<(), AppointmentError> {
        debug!("Verifying doctor {}", doctor_id);

        let doctor = self
            .doctors
            .find_by_id(doctor_id)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if doctor.is_none() {
            return Err(AppointmentError::DoctorNotFound);
        }

        Ok(())
    }
}
