//! Periodic and on-demand delivery cost calculation
//!
//! Runs are single-flight: while one pass is in flight, both the cron job and
//! manual triggers skip instead of starting a second pass over the same rows.
//! A started pass cannot be cancelled.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::{
    calculator::CostCalculator,
    error::DeliveryResult,
    models::CalculationReport,
};

/// Cron expression (with seconds) firing at the start of every minute
pub const EVERY_MINUTE: &str = "0 * * * * *";

/// Result of asking for a calculation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A new run was started in the background
    Started,
    /// A run was already in flight; nothing was started
    AlreadyRunning,
}

/// Drives the [`CostCalculator`] from a cron schedule and manual triggers
#[derive(Clone)]
pub struct DeliveryCostScheduler {
    calculator: CostCalculator,
    in_flight: Arc<Mutex<()>>,
    cron: Arc<Mutex<Option<JobScheduler>>>,
}

impl DeliveryCostScheduler {
    pub fn new(calculator: CostCalculator) -> Self {
        Self {
            calculator,
            in_flight: Arc::new(Mutex::new(())),
            cron: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether a calculation pass is currently running
    pub fn is_running(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Run one pass on the current task unless another is in flight
    ///
    /// Returns `None` when the pass was skipped.
    pub async fn run_once(&self) -> Option<DeliveryResult<CalculationReport>> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Delivery cost calculation already in flight, skipping run");
            return None;
        };

        Some(run_pass(&self.calculator).await)
    }

    /// Start a pass in the background and return immediately
    pub fn trigger(&self) -> TriggerOutcome {
        let Ok(guard) = self.in_flight.clone().try_lock_owned() else {
            info!("Manual trigger ignored, a calculation is already in flight");
            return TriggerOutcome::AlreadyRunning;
        };

        let calculator = self.calculator.clone();
        tokio::spawn(async move {
            let _guard = guard;
            let _ = run_pass(&calculator).await;
        });

        info!("Delivery cost calculation triggered");
        TriggerOutcome::Started
    }

    /// Register the calculation job on a cron schedule and start it
    pub async fn start(&self, schedule: &str) -> DeliveryResult<()> {
        let scheduler = JobScheduler::new().await?;
        let this = self.clone();

        let job = Job::new_async(schedule, move |_, _| {
            let this = this.clone();
            Box::pin(async move {
                info!("Scheduled delivery cost calculation fired");
                this.run_once().await;
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        *self.cron.lock().await = Some(scheduler);

        info!(
            "Started delivery cost scheduler with schedule: {}",
            schedule
        );
        Ok(())
    }

    /// Stop the cron job; an in-flight pass runs to completion
    pub async fn shutdown(&self) -> DeliveryResult<()> {
        if let Some(mut scheduler) = self.cron.lock().await.take() {
            scheduler.shutdown().await?;
            info!("Delivery cost scheduler stopped");
        }
        Ok(())
    }
}

async fn run_pass(calculator: &CostCalculator) -> DeliveryResult<CalculationReport> {
    let result = calculator.compute_all_pending().await;
    if let Err(e) = &result {
        error!("Delivery cost calculation failed: {}", e);
    }
    result
}
