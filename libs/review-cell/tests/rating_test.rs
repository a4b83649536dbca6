use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use patient_cell::memory::InMemoryPatientStore;
use patient_cell::models::Patient;
use provider_cell::memory::{InMemoryDoctorStore, InMemoryLaboratoryStore};
use provider_cell::models::{Doctor, Laboratory};
use provider_cell::store::{DoctorStore, LaboratoryStore};
use review_cell::memory::InMemoryReviewStore;
use review_cell::models::ReviewError;
use review_cell::services::RatingService;

struct TestCell {
    rating: Arc<RatingService>,
    doctors: Arc<InMemoryDoctorStore>,
    labs: Arc<InMemoryLaboratoryStore>,
    patient_id: Uuid,
    doctor_id: Uuid,
    lab_id: Uuid,
}

async fn test_cell() -> TestCell {
    let reviews = Arc::new(InMemoryReviewStore::new());
    let doctors = Arc::new(InMemoryDoctorStore::new());
    let labs = Arc::new(InMemoryLaboratoryStore::new());
    let patients = Arc::new(InMemoryPatientStore::new());

    let patient_id = Uuid::new_v4();
    patients
        .insert(Patient {
            id: patient_id,
            full_name: "Test Patient".to_string(),
            phone_number: None,
            no_show_count: 0,
            is_blocked: false,
        })
        .await;

    let doctor_id = Uuid::new_v4();
    doctors
        .insert(Doctor {
            id: doctor_id,
            name: "Dr. Test".to_string(),
            specialty: "General Practice".to_string(),
            location: "Clinic A".to_string(),
            average_rating: 0.0,
            total_reviews: 0,
        })
        .await;

    let lab_id = Uuid::new_v4();
    labs.insert(Laboratory {
        id: lab_id,
        lab_name: "Central Lab".to_string(),
        location: "Downtown".to_string(),
        average_rating: 0.0,
        total_reviews: 0,
    })
    .await;

    let rating = Arc::new(RatingService::new(
        reviews,
        doctors.clone(),
        labs.clone(),
        patients,
    ));

    TestCell {
        rating,
        doctors,
        labs,
        patient_id,
        doctor_id,
        lab_id,
    }
}

#[tokio::test]
async fn doctor_aggregate_follows_each_review() {
    let cell = test_cell().await;

    for stars in [5, 4, 3] {
        cell.rating
            .review_doctor(cell.patient_id, cell.doctor_id, stars, "Fine visit".to_string())
            .await
            .unwrap();
    }

    let doctor = cell.doctors.find_by_id(cell.doctor_id).await.unwrap().unwrap();
    assert_eq!(doctor.average_rating, 4.0);
    assert_eq!(doctor.total_reviews, 3);

    // A fourth review pushes the mean to 4.25, stored as 4.3.
    cell.rating
        .review_doctor(cell.patient_id, cell.doctor_id, 5, "Great".to_string())
        .await
        .unwrap();

    let doctor = cell.doctors.find_by_id(cell.doctor_id).await.unwrap().unwrap();
    assert_eq!(doctor.average_rating, 4.3);
    assert_eq!(doctor.total_reviews, 4);
}

#[tokio::test]
async fn lab_aggregate_follows_each_review() {
    let cell = test_cell().await;

    cell.rating
        .review_lab(cell.patient_id, cell.lab_id, 2, "Slow results".to_string())
        .await
        .unwrap();
    cell.rating
        .review_lab(cell.patient_id, cell.lab_id, 5, "Much better".to_string())
        .await
        .unwrap();

    let lab = cell.labs.find_by_id(cell.lab_id).await.unwrap().unwrap();
    assert_eq!(lab.average_rating, 3.5);
    assert_eq!(lab.total_reviews, 2);
}

#[tokio::test]
async fn rating_outside_the_scale_is_rejected() {
    let cell = test_cell().await;

    for invalid in [0, 6, -1] {
        let result = cell
            .rating
            .review_doctor(cell.patient_id, cell.doctor_id, invalid, "x".to_string())
            .await;
        assert_matches!(result, Err(ReviewError::ValidationError(_)));
    }
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let cell = test_cell().await;

    let result = cell
        .rating
        .review_doctor(cell.patient_id, cell.doctor_id, 4, "   ".to_string())
        .await;
    assert_matches!(result, Err(ReviewError::ValidationError(_)));
}

#[tokio::test]
async fn unknown_references_are_rejected() {
    let cell = test_cell().await;

    let result = cell
        .rating
        .review_doctor(Uuid::new_v4(), cell.doctor_id, 4, "ok".to_string())
        .await;
    assert_matches!(result, Err(ReviewError::PatientNotFound));

    let result = cell
        .rating
        .review_doctor(cell.patient_id, Uuid::new_v4(), 4, "ok".to_string())
        .await;
    assert_matches!(result, Err(ReviewError::DoctorNotFound));

    let result = cell
        .rating
        .review_lab(cell.patient_id, Uuid::new_v4(), 4, "ok".to_string())
        .await;
    assert_matches!(result, Err(ReviewError::LaboratoryNotFound));
}

#[tokio::test]
async fn rejected_review_leaves_the_aggregate_untouched() {
    let cell = test_cell().await;

    cell.rating
        .review_doctor(cell.patient_id, cell.doctor_id, 4, "ok".to_string())
        .await
        .unwrap();

    let _ = cell
        .rating
        .review_doctor(cell.patient_id, cell.doctor_id, 9, "ok".to_string())
        .await;

    let doctor = cell.doctors.find_by_id(cell.doctor_id).await.unwrap().unwrap();
    assert_eq!(doctor.average_rating, 4.0);
    assert_eq!(doctor.total_reviews, 1);
}

#[tokio::test]
async fn listing_returns_reviews_newest_first() {
    let cell = test_cell().await;

    let first = cell
        .rating
        .review_doctor(cell.patient_id, cell.doctor_id, 3, "First".to_string())
        .await
        .unwrap();
    let second = cell
        .rating
        .review_doctor(cell.patient_id, cell.doctor_id, 5, "Second".to_string())
        .await
        .unwrap();

    let listed = cell.rating.reviews_for_doctor(cell.doctor_id).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn concurrent_reviews_converge_on_the_full_recompute() {
    let cell = test_cell().await;

    let tasks: Vec<_> = [5, 4, 3, 4]
        .into_iter()
        .map(|stars| {
            let rating = cell.rating.clone();
            let patient_id = cell.patient_id;
            let doctor_id = cell.doctor_id;
            tokio::spawn(async move {
                rating
                    .review_doctor(patient_id, doctor_id, stars, "Visit".to_string())
                    .await
            })
        })
        .collect();

    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let doctor = cell.doctors.find_by_id(cell.doctor_id).await.unwrap().unwrap();
    assert_eq!(doctor.total_reviews, 4);
    assert_eq!(doctor.average_rating, 4.0);
}
