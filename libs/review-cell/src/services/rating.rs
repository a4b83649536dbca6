// libs/review-cell/src/services/rating.rs
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use patient_cell::store::PatientStore;
use provider_cell::store::{DoctorStore, LaboratoryStore};

use crate::models::{Review, ReviewError, MAX_RATING, MIN_RATING};
use crate::store::ReviewStore;

/// Persists reviews and keeps provider aggregates in step.
///
/// The aggregate is always recomputed from the full review set, never
/// incremented, so any serialization of concurrent writes converges on the
/// correct value. The recompute-and-store for one provider runs under that
/// provider's lock; two racing recomputes cannot leave a stale value as the
/// final write.
pub struct RatingService {
    reviews: Arc<dyn ReviewStore>,
    doctors: Arc<dyn DoctorStore>,
    labs: Arc<dyn LaboratoryStore>,
    patients: Arc<dyn PatientStore>,
    recompute_locks: StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl RatingService {
    pub fn new(
        reviews: Arc<dyn ReviewStore>,
        doctors: Arc<dyn DoctorStore>,
        labs: Arc<dyn LaboratoryStore>,
        patients: Arc<dyn PatientStore>,
    ) -> Self {
        Self {
            reviews,
            doctors,
            labs,
            patients,
            recompute_locks: StdMutex::new(HashMap::new()),
        }
    }

    pub async fn review_doctor(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        rating: i32,
        comment: String,
    ) -> Result<Review, ReviewError> {
        self.validate_submission(rating, &comment)?;
        self.verify_patient_exists(patient_id).await?;

        if self.doctors.find_by_id(doctor_id).await.map_err(db_err)?.is_none() {
            return Err(ReviewError::DoctorNotFound);
        }

        let review = Review::for_doctor(patient_id, doctor_id, rating, comment);
        let saved = self.reviews.insert(review).await?;

        self.recompute_doctor_rating(doctor_id).await?;

        info!("Review {} recorded for doctor {}", saved.id, doctor_id);
        Ok(saved)
    }

    pub async fn review_lab(
        &self,
        patient_id: Uuid,
        lab_id: Uuid,
        rating: i32,
        comment: String,
    ) -> Result<Review, ReviewError> {
        self.validate_submission(rating, &comment)?;
        self.verify_patient_exists(patient_id).await?;

        if self.labs.find_by_id(lab_id).await.map_err(db_err)?.is_none() {
            return Err(ReviewError::LaboratoryNotFound);
        }

        let review = Review::for_lab(patient_id, lab_id, rating, comment);
        let saved = self.reviews.insert(review).await?;

        self.recompute_lab_rating(lab_id).await?;

        info!("Review {} recorded for laboratory {}", saved.id, lab_id);
        Ok(saved)
    }

    pub async fn reviews_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        self.reviews.list_for_doctor(doctor_id).await
    }

    pub async fn reviews_for_lab(&self, lab_id: Uuid) -> Result<Vec<Review>, ReviewError> {
        self.reviews.list_for_lab(lab_id).await
    }

    async fn recompute_doctor_rating(&self, doctor_id: Uuid) -> Result<(), ReviewError> {
        let lock = self.provider_lock(doctor_id);
        let _guard = lock.lock().await;

        let reviews = self.reviews.list_for_doctor(doctor_id).await?;
        let Some((average, total)) = aggregate(&reviews) else {
            // Nothing to aggregate; leave the stored fields alone rather
            // than writing a meaningless average.
            debug!("Doctor {} has no reviews, skipping aggregate update", doctor_id);
            return Ok(());
        };

        self.doctors
            .update_rating(doctor_id, average, total)
            .await
            .map_err(db_err)?;

        debug!(
            "Doctor {} aggregate updated: average {} over {} reviews",
            doctor_id, average, total
        );
        Ok(())
    }

    async fn recompute_lab_rating(&self, lab_id: Uuid) -> Result<(), ReviewError> {
        let lock = self.provider_lock(lab_id);
        let _guard = lock.lock().await;

        let reviews = self.reviews.list_for_lab(lab_id).await?;
        let Some((average, total)) = aggregate(&reviews) else {
            debug!("Laboratory {} has no reviews, skipping aggregate update", lab_id);
            return Ok(());
        };

        self.labs
            .update_rating(lab_id, average, total)
            .await
            .map_err(db_err)?;

        debug!(
            "Laboratory {} aggregate updated: average {} over {} reviews",
            lab_id, average, total
        );
        Ok(())
    }

    fn validate_submission(&self, rating: i32, comment: &str) -> Result<(), ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ReviewError::ValidationError(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        if comment.trim().is_empty() {
            return Err(ReviewError::ValidationError(
                "Comment must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    async fn verify_patient_exists(&self, patient_id: Uuid) -> Result<(), ReviewError> {
        let patient = self
            .patients
            .find_by_id(patient_id)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        if patient.is_none() {
            return Err(ReviewError::PatientNotFound);
        }

        Ok(())
    }

    /// One lock per provider id. The registry mutex is held only long
    /// enough to clone the entry, never across an await.
    fn provider_lock(&self, provider_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .recompute_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(provider_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn db_err(e: provider_cell::models::ProviderError) -> ReviewError {
    ReviewError::DatabaseError(e.to_string())
}

/// Mean rounded half-up to one decimal, plus the count. None when the set
/// is empty.
fn aggregate(reviews: &[Review]) -> Option<(f64, i32)> {
    if reviews.is_empty() {
        return None;
    }

    let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
    // Scale to tenths before rounding so 4.25 lands on 4.3, not 4.2.
    let average = ((sum * 10) as f64 / reviews.len() as f64).round() / 10.0;

    Some((average, reviews.len() as i32))
}
