// libs/patient-cell/src/memory.rs
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Patient, PatientError, NO_SHOW_BLOCK_THRESHOLD};
use crate::store::PatientStore;

#[derive(Default)]
pub struct InMemoryPatientStore {
    patients: RwLock<HashMap<Uuid, Patient>>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, patient: Patient) {
        self.patients.write().await.insert(patient.id, patient);
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Patient>, PatientError> {
        Ok(self.patients.read().await.get(&id).cloned())
    }

    async fn record_no_show(&self, id: Uuid) -> Result<Patient, PatientError> {
        // Increment and blocking check happen under the same write lock.
        let mut patients = self.patients.write().await;
        let patient = patients.get_mut(&id).ok_or(PatientError::NotFound)?;

        patient.no_show_count += 1;
        if patient.no_show_count >= NO_SHOW_BLOCK_THRESHOLD {
            patient.is_blocked = true;
        }

        Ok(patient.clone())
    }
}
