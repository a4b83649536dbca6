// libs/appointment-cell/src/store.rs
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// Durable record of appointments.
///
/// `insert_scheduled` is the only write path that can create a Scheduled row
/// and it must be atomic with the slot-conflict check: at most one Scheduled
/// appointment may exist per (doctor, date, time) at any instant.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Persist a new Scheduled appointment, failing with `SlotConflict` when
    /// the slot already holds one. Check and insert are a single atomic step.
    async fn insert_scheduled(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, AppointmentError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError>;

    /// Overwrite the status and, when given, the cancellation reason.
    /// `None` leaves any stored reason untouched.
    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Appointment, AppointmentError>;

    /// All appointments in the given status, ordered by date then slot token.
    async fn list_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError>;
}

/// PostgREST-backed store. Slot uniqueness rests on a partial unique index on
/// (doctor_id, appointment_date, appointment_time) WHERE status =
/// 'scheduled'; a racing second insert comes back as HTTP 409.
pub struct PostgrestAppointmentStore {
    supabase: Arc<SupabaseClient>,
}

impl PostgrestAppointmentStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, AppointmentError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Appointment>, _>>()
            .map_err(|e| {
                AppointmentError::DatabaseError(format!("Failed to parse appointments: {}", e))
            })
    }
}

#[async_trait]
impl AppointmentStore for PostgrestAppointmentStore {
    async fn insert_scheduled(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Inserting scheduled appointment for doctor {} at {} {}",
            appointment.doctor_id, appointment.appointment_date, appointment.appointment_time
        );

        let body = json!({
            "id": appointment.id,
            "patient_id": appointment.patient_id,
            "doctor_id": appointment.doctor_id,
            "appointment_date": appointment.appointment_date.format("%Y-%m-%d").to_string(),
            "appointment_time": appointment.appointment_time,
            "status": appointment.status.to_string(),
            "created_at": appointment.created_at.to_rfc3339(),
        });

        let result: Vec<Value> = self
            .supabase
            .insert_returning("/rest/v1/appointments", body)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    AppointmentError::SlotConflict
                } else {
                    AppointmentError::DatabaseError(e.to_string())
                }
            })?;

        let row = result.into_iter().next().ok_or_else(|| {
            AppointmentError::DatabaseError("Insert returned no rows".to_string())
        })?;

        serde_json::from_value(row).map_err(|e| {
            AppointmentError::DatabaseError(format!("Failed to parse created appointment: {}", e))
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentError> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Ok(Self::parse_rows(result)?.into_iter().next())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Appointment, AppointmentError> {
        let mut update = serde_json::Map::new();
        update.insert("status".to_string(), json!(status.to_string()));
        if let Some(reason) = cancellation_reason {
            update.insert("cancellation_reason".to_string(), json!(reason));
        }

        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let result: Vec<Value> = self
            .supabase
            .update_returning(&path, Value::Object(update))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Self::parse_rows(result)?
            .into_iter()
            .next()
            .ok_or(AppointmentError::NotFound)
    }

    async fn list_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?status=eq.{}&order=appointment_date.asc,appointment_time.asc",
            status
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Self::parse_rows(result)
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let status_list = statuses
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "/rest/v1/appointments?patient_id=eq.{}&status=in.({})&order=appointment_date.asc,appointment_time.asc",
            patient_id, status_list
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Self::parse_rows(result)
    }

    async fn list_for_doctor(
        &self,
        doctor_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?doctor_id=eq.{}&status=eq.{}&order=appointment_date.asc,appointment_time.asc",
            doctor_id, status
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        Self::parse_rows(result)
    }
}
