// libs/review-cell/src/memory.rs
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Review, ReviewError};
use crate::store::ReviewStore;

#[derive(Default)]
pub struct InMemoryReviewStore {
    reviews: RwLock<HashMap<Uuid, Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut reviews: Vec<Review>) -> Vec<Review> {
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert(&self, review: Review) -> Result<Review, ReviewError> {
        self.reviews.write().await.insert(review.id, review.clone());
        Ok(review)
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        let matching: Vec<Review> = self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.doctor_id == Some(doctor_id))
            .cloned()
            .collect();
        Ok(Self::newest_first(matching))
    }

    async fn list_for_lab(&self, lab_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        let matching: Vec<Review> = self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| r.lab_id == Some(lab_id))
            .cloned()
            .collect();
        Ok(Self::newest_first(matching))
    }
}
