use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use patient_cell::memory::InMemoryPatientStore;
use patient_cell::models::Patient;
use provider_cell::memory::{InMemoryDoctorStore, InMemoryLaboratoryStore};
use provider_cell::models::Doctor;
use review_cell::memory::InMemoryReviewStore;
use review_cell::router::review_routes;
use review_cell::services::RatingService;

async fn test_app() -> (Router, Uuid, Uuid) {
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

    let app = review_routes(Arc::new(RatingService::new(
        reviews, doctors, labs, patients,
    )));
    (app, patient_id, doctor_id)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn submitting_a_review_returns_the_stored_review() {
    let (app, patient_id, doctor_id) = test_app().await;

    let response = app
        .oneshot(post_json(
            &format!("/doctors/{}", doctor_id),
            json!({ "patient_id": patient_id, "rating": 5, "comment": "Great" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["review"]["rating"], json!(5));
    assert_eq!(body["review"]["doctor_id"], json!(doctor_id));
}

#[tokio::test]
async fn out_of_range_rating_returns_bad_request() {
    let (app, patient_id, doctor_id) = test_app().await;

    let response = app
        .oneshot(post_json(
            &format!("/doctors/{}", doctor_id),
            json!({ "patient_id": patient_id, "rating": 6, "comment": "Too good" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reviewing_an_unknown_lab_returns_not_found() {
    let (app, patient_id, _doctor_id) = test_app().await;

    let response = app
        .oneshot(post_json(
            &format!("/labs/{}", Uuid::new_v4()),
            json!({ "patient_id": patient_id, "rating": 4, "comment": "ok" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_returns_submitted_reviews() {
    let (app, patient_id, doctor_id) = test_app().await;

    for comment in ["First visit", "Second visit"] {
        app.clone()
            .oneshot(post_json(
                &format!("/doctors/{}", doctor_id),
                json!({ "patient_id": patient_id, "rating": 4, "comment": comment }),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/doctors/{}", doctor_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 2);
}
