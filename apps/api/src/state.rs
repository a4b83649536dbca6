use std::sync::Arc;

use tracing::{info, warn};

use appointment_cell::memory::InMemoryAppointmentStore;
use appointment_cell::services::{BookingService, LifecycleService};
use appointment_cell::store::{AppointmentStore, PostgrestAppointmentStore};
use patient_cell::memory::InMemoryPatientStore;
use patient_cell::services::NoShowTrackingService;
use patient_cell::store::{PatientStore, PostgrestPatientStore};
use provider_cell::memory::{InMemoryDoctorStore, InMemoryLaboratoryStore};
use provider_cell::store::{
    DoctorStore, LaboratoryStore, PostgrestDoctorStore, PostgrestLaboratoryStore,
};
use review_cell::memory::InMemoryReviewStore;
use review_cell::services::RatingService;
use review_cell::store::{PostgrestReviewStore, ReviewStore};
use shared_config::AppConfig;
use shared_database::SupabaseClient;

/// Services shared across the router and the background sweep.
#[derive(Clone)]
pub struct AppState {
    pub booking: Arc<BookingService>,
    pub lifecycle: Arc<LifecycleService>,
    pub no_show: Arc<NoShowTrackingService>,
    pub rating: Arc<RatingService>,
}

impl AppState {
    /// Wires every cell against PostgREST when Supabase is configured,
    /// otherwise against the in-memory stores so the server still comes up
    /// in local development.
    pub fn from_config(config: &AppConfig) -> Self {
        let (appointments, patients, doctors, labs, reviews) = if config.is_configured() {
            info!("Using Supabase-backed stores");
            let supabase = Arc::new(SupabaseClient::new(config));

            let appointments: Arc<dyn AppointmentStore> =
                Arc::new(PostgrestAppointmentStore::new(supabase.clone()));
            let patients: Arc<dyn PatientStore> =
                Arc::new(PostgrestPatientStore::new(supabase.clone()));
            let doctors: Arc<dyn DoctorStore> =
                Arc::new(PostgrestDoctorStore::new(supabase.clone()));
            let labs: Arc<dyn LaboratoryStore> =
                Arc::new(PostgrestLaboratoryStore::new(supabase.clone()));
            let reviews: Arc<dyn ReviewStore> = Arc::new(PostgrestReviewStore::new(supabase));

            (appointments, patients, doctors, labs, reviews)
        } else {
            warn!("Supabase not configured, falling back to in-memory stores");

            let appointments: Arc<dyn AppointmentStore> =
                Arc::new(InMemoryAppointmentStore::new());
            let patients: Arc<dyn PatientStore> = Arc::new(InMemoryPatientStore::new());
            let doctors: Arc<dyn DoctorStore> = Arc::new(InMemoryDoctorStore::new());
            let labs: Arc<dyn LaboratoryStore> = Arc::new(InMemoryLaboratoryStore::new());
            let reviews: Arc<dyn ReviewStore> = Arc::new(InMemoryReviewStore::new());

            (appointments, patients, doctors, labs, reviews)
        };

        let booking = Arc::new(BookingService::new(
            appointments.clone(),
            patients.clone(),
            doctors.clone(),
        ));
        let lifecycle = Arc::new(LifecycleService::new(appointments));
        let no_show = Arc::new(NoShowTrackingService::new(patients.clone()));
        let rating = Arc::new(RatingService::new(reviews, doctors, labs, patients));

        Self {
            booking,
            lifecycle,
            no_show,
            rating,
        }
    }
}
