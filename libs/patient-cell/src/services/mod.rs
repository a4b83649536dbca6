pub mod noshow;

pub use noshow::NoShowTrackingService;
