// libs/provider-cell/src/store.rs
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Doctor, Laboratory, ProviderError};

/// Read access to doctor records plus the single permitted writer for the
/// derived rating fields.
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, ProviderError>;

    /// Overwrite both derived fields in one write. Callers serialize per
    /// provider, the store does not.
    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: i32,
    ) -> Result<(), ProviderError>;
}

#[async_trait]
pub trait LaboratoryStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Laboratory>, ProviderError>;

    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: i32,
    ) -> Result<(), ProviderError>;
}

pub struct PostgrestDoctorStore {
    supabase: Arc<SupabaseClient>,
}

impl PostgrestDoctorStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl DoctorStore for PostgrestDoctorStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Doctor>, ProviderError> {
        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ProviderError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => {
                let doctor: Doctor = serde_json::from_value(row)
                    .map_err(|e| ProviderError::DatabaseError(format!("Failed to parse doctor: {}", e)))?;
                Ok(Some(doctor))
            }
            None => Ok(None),
        }
    }

    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: i32,
    ) -> Result<(), ProviderError> {
        debug!("Updating doctor {} rating to {} ({} reviews)", id, average_rating, total_reviews);

        let path = format!("/rest/v1/doctors?id=eq.{}", id);
        let body = json!({
            "average_rating": average_rating,
            "total_reviews": total_reviews,
        });

        let updated: Vec<Value> = self
            .supabase
            .update_returning(&path, body)
            .await
            .map_err(|e| ProviderError::DatabaseError(e.to_string()))?;

        if updated.is_empty() {
            return Err(ProviderError::DoctorNotFound);
        }

        Ok(())
    }
}

pub struct PostgrestLaboratoryStore {
    supabase: Arc<SupabaseClient>,
}

impl PostgrestLaboratoryStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl LaboratoryStore for PostgrestLaboratoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Laboratory>, ProviderError> {
        let path = format!("/rest/v1/laboratories?id=eq.{}", id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ProviderError::DatabaseError(e.to_string()))?;

        match result.into_iter().next() {
            Some(row) => {
                let lab: Laboratory = serde_json::from_value(row).map_err(|e| {
                    ProviderError::DatabaseError(format!("Failed to parse laboratory: {}", e))
                })?;
                Ok(Some(lab))
            }
            None => Ok(None),
        }
    }

    async fn update_rating(
        &self,
        id: Uuid,
        average_rating: f64,
        total_reviews: i32,
    ) -> Result<(), ProviderError> {
        debug!("Updating laboratory {} rating to {} ({} reviews)", id, average_rating, total_reviews);

        let path = format!("/rest/v1/laboratories?id=eq.{}", id);
        let body = json!({
            "average_rating": average_rating,
            "total_reviews": total_reviews,
        });

        let updated: Vec<Value> = self
            .supabase
            .update_returning(&path, body)
            .await
            .map_err(|e| ProviderError::DatabaseError(e.to_string()))?;

        if updated.is_empty() {
            return Err(ProviderError::LaboratoryNotFound);
        }

        Ok(())
    }
}
