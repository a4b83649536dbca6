pub mod booking;
pub mod lifecycle;
pub mod scheduler;

pub use booking::BookingService;
pub use lifecycle::LifecycleService;
pub use scheduler::SweepScheduler;
