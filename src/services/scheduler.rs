use anyhow::Result;
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::services::summary::SummaryRunStats;
use crate::state::SharedState;

pub type SchedulerState = Arc<RwLock<SharedState>>;

pub struct Scheduler {
    state: SchedulerState,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(state: SchedulerState, config: SchedulerConfig) -> Self {
        Self {
            state,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                let start = std::time::Instant::now();
                info!(event = "job_started", job_name = "monthly_summary", "Starting monthly summary run");

                let summary_service = state.read().await.summary_service.clone();
                match summary_service.run().await {
                    Ok(stats) => info!(
                        event = "job_finished",
                        job_name = "monthly_summary",
                        sent = stats.sent,
                        skipped = stats.skipped,
                        failed = stats.failed,
                        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "Monthly summary run finished"
                    ),
                    Err(e) => {
                        error!(event = "job_failed", job_name = "monthly_summary", error = %e, "Monthly summary run failed");
                    }
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    /// Fallback when no cron expression is configured: poll periodically
    /// and fire once on the first day of each month.
    async fn run_with_interval(&self) -> Result<()> {
        let check_hours = self.config.fallback_check_hours.max(1);

        info!(
            "Scheduler running: monthly summary checked every {}h",
            check_hours
        );

        let mut check_interval = interval(Duration::from_secs(check_hours * 60 * 60));
        let mut last_run: Option<(i32, u32)> = None;

        loop {
            check_interval.tick().await;
            if !*self.running.read().await {
                break;
            }

            let today = Utc::now().date_naive();
            if today.day() != 1 {
                continue;
            }
            let current = (today.year(), today.month());
            if last_run == Some(current) {
                continue;
            }

            let start = std::time::Instant::now();
            info!(event = "job_started", job_name = "monthly_summary", "Starting monthly summary run");

            let summary_service = self.state.read().await.summary_service.clone();
            match summary_service.run().await {
                Ok(stats) => {
                    last_run = Some(current);
                    info!(
                        event = "job_finished",
                        job_name = "monthly_summary",
                        sent = stats.sent,
                        skipped = stats.skipped,
                        failed = stats.failed,
                        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                        "Monthly summary run finished"
                    );
                }
                Err(e) => {
                    error!(event = "job_failed", job_name = "monthly_summary", error = %e, "Monthly summary run failed");
                }
            }
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Immediate batch run, used by the manual trigger endpoint and the
    /// `summary` CLI command.
    pub async fn run_once(&self) -> Result<SummaryRunStats> {
        info!("Running manual summary...");

        let summary_service = self.state.read().await.summary_service.clone();
        summary_service.run().await
    }
}
