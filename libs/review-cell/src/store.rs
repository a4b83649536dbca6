// libs/review-cell/src/store.rs
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use shared_database::supabase::SupabaseClient;

use crate::models::{Review, ReviewError};

/// Durable record of reviews. Reviews are append-only; the aggregate
/// recompute reads the full per-target set on every write.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, review: Review) -> Result<Review, ReviewError>;

    /// Reviews for a doctor, newest first.
    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Review>, ReviewError>;

    /// Reviews for a laboratory, newest first.
    async fn list_for_lab(&self, lab_id: Uuid) -> Result<Vec<Review>, ReviewError>;
}

pub struct PostgrestReviewStore {
    supabase: Arc<SupabaseClient>,
}

impl PostgrestReviewStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn parse_rows(rows: Vec<Value>) -> Result<Vec<Review>, ReviewError> {
        rows.into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Review>, _>>()
            .map_err(|e| ReviewError::DatabaseError(format!("Failed to parse reviews: {}", e)))
    }
}

#[async_trait]
impl ReviewStore for PostgrestReviewStore {
    async fn insert(&self, review: Review) -> Result<Review, ReviewError> {
        debug!("Inserting review {} from patient {}", review.id, review.patient_id);

        let body = json!({
            "id": review.id,
            "patient_id": review.patient_id,
            "doctor_id": review.doctor_id,
            "lab_id": review.lab_id,
            "rating": review.rating,
            "comment": review.comment,
            "created_at": review.created_at.to_rfc3339(),
        });

        let result: Vec<Value> = self
            .supabase
            .insert_returning("/rest/v1/reviews", body)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| ReviewError::DatabaseError("Insert returned no rows".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| ReviewError::DatabaseError(format!("Failed to parse created review: {}", e)))
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        let path = format!(
            "/rest/v1/reviews?doctor_id=eq.{}&order=created_at.desc",
            doctor_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        Self::parse_rows(result)
    }

    async fn list_for_lab(&self, lab_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        let path = format!(
            "/rest/v1/reviews?lab_id=eq.{}&order=created_at.desc",
            lab_id
        );
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        Self::parse_rows(result)
    }
}
