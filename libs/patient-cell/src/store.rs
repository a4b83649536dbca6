// libs/patient-cell/src/store.rs
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Patient, PatientError};

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, PatientError>;

    /// Atomically increment `no_show_count` and set `is_blocked` once the
    /// counter reaches the threshold. Returns the post-increment record, so
    /// the caller always observes the fully updated value.
    async fn record_no_show(&self, id: Uuid) -> Result<Patient, PatientError>;
}

pub struct PostgrestPatientStore {
    supabase: Arc<SupabaseClient>,
}

impl PostgrestPatientStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl PatientStore for PostgrestPatientStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, PatientError> {
        let path = format!("/rest/v1/patients?id=eq.{}", id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => {
                let patient: Patient = serde_json::from_value(row).map_err(|e| {
                    PatientError::DatabaseError(format!("Failed to parse patient: {}", e))
                })?;
                Ok(Some(patient))
            }
            None => Ok(None),
        }
    }

    async fn record_no_show(&self, id: Uuid) -> Result<Patient, PatientError> {
        debug!("Recording no-show for patient {}", id);

        // The increment and the blocking check run server-side in one
        // statement, so concurrent calls cannot lose updates.
        let result: Vec<Value> = self
            .supabase
            .request(
                Method::POST,
                "/rest/v1/rpc/record_no_show",
                Some(json!({ "p_patient_id": id })),
            )
            .await
            .map_err(|e| PatientError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(PatientError::NotFound)?;

        let patient: Patient = serde_json::from_value(row)
            .map_err(|e| PatientError::DatabaseError(format!("Failed to parse patient: {}", e)))?;

        Ok(patient)
    }
}
