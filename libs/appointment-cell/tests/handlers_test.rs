use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::handlers::AppointmentCellState;
use appointment_cell::memory::InMemoryAppointmentStore;
use appointment_cell::router::appointment_routes;
use appointment_cell::services::{BookingService, LifecycleService};
use patient_cell::memory::InMemoryPatientStore;
use patient_cell::models::Patient;
use provider_cell::memory::InMemoryDoctorStore;
use provider_cell::models::Doctor;

async fn test_app() -> (Router, Uuid, Uuid) {
    let appointments = Arc::new(InMemoryAppointmentStore::new());
    let patients = Arc::new(InMemoryPatientStore::new());
    let doctors = Arc::new(InMemoryDoctorStore::new());

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

    let booking = Arc::new(BookingService::new(
        appointments.clone(),
        patients,
        doctors,
    ));
    let lifecycle = Arc::new(LifecycleService::new(appointments));

    let app = appointment_routes(AppointmentCellState { booking, lifecycle });
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
async fn booking_endpoint_returns_the_created_appointment() {
    let (app, patient_id, doctor_id) = test_app().await;

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": patient_id,
                "doctor_id": doctor_id,
                "appointment_date": "2026-09-01",
                "appointment_time": "10:00",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["status"], json!("scheduled"));
    assert_eq!(body["appointment"]["appointment_time"], json!("10:00"));
}

#[tokio::test]
async fn double_booking_returns_conflict() {
    let (app, patient_id, doctor_id) = test_app().await;
    let request_body = json!({
        "patient_id": patient_id,
        "doctor_id": doctor_id,
        "appointment_date": "2026-09-01",
        "appointment_time": "10:00",
    });

    let first = app
        .clone()
        .oneshot(post_json("/", request_body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_json("/", request_body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["error"], json!("Time slot already booked"));
}

#[tokio::test]
async fn booking_for_unknown_patient_returns_not_found() {
    let (app, _patient_id, doctor_id) = test_app().await;

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": Uuid::new_v4(),
                "doctor_id": doctor_id,
                "appointment_date": "2026-09-01",
                "appointment_time": "10:00",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_with_malformed_time_returns_bad_request() {
    let (app, patient_id, doctor_id) = test_app().await;

    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": patient_id,
                "doctor_id": doctor_id,
                "appointment_date": "2026-09-01",
                "appointment_time": "noonish",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancel_endpoint_transitions_the_appointment() {
    let (app, patient_id, doctor_id) = test_app().await;

    let booked = app
        .clone()
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": patient_id,
                "doctor_id": doctor_id,
                "appointment_date": "2026-09-01",
                "appointment_time": "10:00",
            }),
        ))
        .await
        .unwrap();
    let appointment_id = body_json(booked).await["appointment"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let cancelled = app
        .clone()
        .oneshot(post_json(
            &format!("/{}/cancel", appointment_id),
            json!({ "cancelled_by": "doctor", "reason": "Emergency surgery" }),
        ))
        .await
        .unwrap();
    assert_eq!(cancelled.status(), StatusCode::OK);

    let fetched = app
        .oneshot(
            Request::builder()
                .uri(format!("/{}", appointment_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(fetched).await;
    assert_eq!(body["appointment"]["status"], json!("cancelled_by_doctor"));
    assert_eq!(
        body["appointment"]["cancellation_reason"],
        json!("Emergency surgery")
    );
}

#[tokio::test]
async fn cancel_missing_appointment_returns_not_found() {
    let (app, _patient_id, _doctor_id) = test_app().await;

    let response = app
        .oneshot(post_json(
            &format!("/{}/cancel", Uuid::new_v4()),
            json!({ "cancelled_by": "patient" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patient_upcoming_endpoint_lists_scheduled_appointments() {
    let (app, patient_id, doctor_id) = test_app().await;

    app.clone()
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": patient_id,
                "doctor_id": doctor_id,
                "appointment_date": "2026-09-01",
                "appointment_time": "10:00",
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/patients/{}/upcoming", patient_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["appointments"].as_array().unwrap().len(), 1);
}
