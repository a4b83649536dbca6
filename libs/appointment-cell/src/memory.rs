// libs/appointment-cell/src/memory.rs
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};
use crate::store::AppointmentStore;

/// In-memory store for tests and the dev fallback. The slot-conflict check
/// and the insert run under one write lock, which is what makes
/// `insert_scheduled` atomic here.
#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert bypassing the conflict check. Test seam for rows that could
    /// not have been produced through `insert_scheduled`, e.g. imported
    /// data with a malformed slot token.
    pub async fn insert_raw(&self, appointment: Appointment) {
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment);
    }

    fn sort_chronological(appointments: &mut [Appointment]) {
        appointments.sort_by(|a, b| {
            (a.appointment_date, a.appointment_time.as_str())
                .cmp(&(b.appointment_date, b.appointment_time.as_str()))
        });
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert_scheduled(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointments = self.appointments.write().await;

        let slot_taken = appointments.values().any(|a| {
            a.doctor_id == appointment.doctor_id
                && a.appointment_date == appointment.appointment_date
                && a.appointment_time == appointment.appointment_time
                && a.status == AppointmentStatus::Scheduled
        });

        if slot_taken {
            return Err(AppointmentError::SlotConflict);
        }

        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments.get_mut(&id).ok_or(AppointmentError::NotFound)?;

        appointment.status = status;
        if cancellation_reason.is_some() {
            appointment.cancellation_reason = cancellation_reason;
        }

        Ok(appointment.clone())
    }

    async fn list_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut matching: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.status == status)
            .cloned()
            .collect();
        Self::sort_chronological(&mut matching);
        Ok(matching)
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut matching: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.patient_id == patient_id && statuses.contains(&a.status))
            .cloned()
            .collect();
        Self::sort_chronological(&mut matching);
        Ok(matching)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut matching: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.doctor_id == doctor_id && a.status == status)
            .cloned()
            .collect();
        Self::sort_chronological(&mut matching);
        Ok(matching)
    }
}
