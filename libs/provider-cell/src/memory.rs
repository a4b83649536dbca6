// libs/provider-cell/src/memory.rs
//
// In-memory stores used by tests and by the API's dev fallback when Supabase
// is not configured.
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Doctor, Laboratory, ProviderError};
use crate::store::{DoctorStore, LaboratoryStore};

#[derive(Default)]
pub struct InMemoryDoctorStore {
    doctors: RwLock<HashMap<Uuid, Doctor>>,
}

impl InMemoryDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, doctor: Doctor) {
        self.doctors.write().await.insert(doctor.id, doctor);
    }
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, ProviderError> {
        Ok(self.doctors.read().await.get(&id).cloned())
    }

    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: i32,
    ) -> Result<(), ProviderError> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors.get_mut(&id).ok_or(ProviderError::DoctorNotFound)?;
        doctor.average_rating = average_rating;
        doctor.total_reviews = total_reviews;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLaboratoryStore {
    labs: RwLock<HashMap<Uuid, Laboratory>>,
}

impl InMemoryLaboratoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, lab: Laboratory) {
        self.labs.write().await.insert(lab.id, lab);
    }
}

#[async_trait]
impl LaboratoryStore for InMemoryLaboratoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Laboratory>, ProviderError> {
        Ok(self.labs.read().await.get(&id).cloned())
    }

    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: i32,
    ) -> Result<(), ProviderError> {
        let mut labs = self.labs.write().await;
        let lab = labs.get_mut(&id).ok_or(ProviderError::LaboratoryNotFound)?;
        lab.average_rating = average_rating;
        lab.total_reviews = total_reviews;
        Ok(())
    }
}
