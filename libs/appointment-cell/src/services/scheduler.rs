// libs/appointment-cell/src/services/scheduler.rs
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::services::lifecycle::LifecycleService;

/// Drives the overdue-appointment sweep on a fixed period.
///
/// Passes are single-flight: if a pass is still running when the next tick
/// fires, the tick is skipped rather than starting a second pass over the
/// same rows. Shutdown lets an in-progress pass finish.
pub struct SweepScheduler {
    lifecycle: Arc<LifecycleService>,
    period: std::time::Duration,
    in_flight: Mutex<()>,
}

impl SweepScheduler {
    pub fn new(lifecycle: Arc<LifecycleService>, period: std::time::Duration) -> Self {
        Self {
            lifecycle,
            period,
            in_flight: Mutex::new(()),
        }
    }

    /// Run until the shutdown channel flips to true. The first sweep happens
    /// immediately on startup.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Starting appointment sweep every {:?}", self.period);

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_once().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Sweep scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Execute a single sweep pass unless one is already in flight.
    pub async fn run_once(&self) {
        let _guard = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("Previous sweep still running, skipping this pass");
                return;
            }
        };

        match self.lifecycle.promote_overdue(Utc::now()).await {
            Ok(promoted) => {
                if promoted > 0 {
                    info!("Sweep pass promoted {} appointments", promoted);
                }
            }
            Err(e) => error!("Sweep pass failed: {}", e),
        }
    }
}
