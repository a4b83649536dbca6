use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use provider_cell::models::ProviderError;
use provider_cell::store::{DoctorStore, PostgrestDoctorStore};
use shared_database::SupabaseClient;

fn store_for(server: &MockServer) -> PostgrestDoctorStore {
    PostgrestDoctorStore::new(Arc::new(SupabaseClient::with_base_url(
        server.uri(),
        "test-key",
    )))
}

#[tokio::test]
async fn find_by_id_parses_the_doctor_row() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": doctor_id,
            "name": "Dr. Test",
            "specialty": "General Practice",
            "location": "Clinic A",
            "average_rating": 4.3,
            "total_reviews": 12,
        }])))
        .mount(&server)
        .await;

    let doctor = store_for(&server).find_by_id(doctor_id).await.unwrap().unwrap();
    assert_eq!(doctor.name, "Dr. Test");
    assert_eq!(doctor.average_rating, 4.3);
    assert_eq!(doctor.total_reviews, 12);
}

#[tokio::test]
async fn update_rating_patches_both_derived_fields() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .and(body_json(json!({
            "average_rating": 4.3,
            "total_reviews": 4,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": doctor_id,
            "name": "Dr. Test",
            "specialty": "General Practice",
            "location": "Clinic A",
            "average_rating": 4.3,
            "total_reviews": 4,
        }])))
        .mount(&server)
        .await;

    store_for(&server)
        .update_rating(doctor_id, 4.3, 4)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_rating_for_missing_doctor_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = store_for(&server).update_rating(Uuid::new_v4(), 4.0, 1).await;
    assert_matches!(result, Err(ProviderError::DoctorNotFound));
}
