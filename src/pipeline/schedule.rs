// src/pipeline/schedule.rs

//! Batch scheduling loop and shutdown handling.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::models::Schedule;
use crate::pipeline::deliver::Deliver;
use crate::services::{Notices, Notifier};

/// Draw a sleep duration uniformly from the schedule's minute bounds.
pub fn pick_interval<R: Rng + ?Sized>(rng: &mut R, schedule: &Schedule) -> Duration {
    let minutes =
        rng.random_range(schedule.min_interval_minutes..=schedule.max_interval_minutes);
    Duration::from_secs(minutes.saturating_mul(60))
}

/// Resolves on the first SIGINT or SIGTERM.
///
/// Handlers are installed when this is called, not when first polled.
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => log::info!("Received SIGINT"),
            _ = terminate.recv() => log::info!("Received SIGTERM"),
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Received Ctrl-C");
        }
    })
}

/// Runs delivery batches separated by randomized sleeps.
pub struct Scheduler<D> {
    cycle: D,
    notifier: Arc<dyn Notifier>,
    notices: Notices,
    schedule: Schedule,
    rng: StdRng,
}

impl<D: Deliver> Scheduler<D> {
    pub fn new(
        cycle: D,
        notifier: Arc<dyn Notifier>,
        notices: Notices,
        schedule: Schedule,
    ) -> Self {
        Self {
            cycle,
            notifier,
            notices,
            schedule,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Deliver `batch_size` comics back to back.
    pub async fn run_batch(&mut self) -> Result<usize> {
        let total = self.schedule.batch_size;
        for n in 1..=total {
            let id = self.cycle.deliver_one().await?;
            log::debug!("Batch progress {}/{} (comic {})", n, total, id);
        }
        Ok(total)
    }

    async fn run_forever(&mut self) -> Result<Infallible> {
        loop {
            let delivered = self.run_batch().await?;

            let wait = pick_interval(&mut self.rng, &self.schedule);
            let wake = chrono::Duration::from_std(wait)
                .ok()
                .and_then(|d| Local::now().checked_add_signed(d));
            match wake {
                Some(at) => log::info!(
                    "Delivered {} comic(s); sleeping {} min until {}",
                    delivered,
                    wait.as_secs() / 60,
                    at.format("%Y-%m-%d %H:%M:%S")
                ),
                None => log::info!(
                    "Delivered {} comic(s); sleeping {} min",
                    delivered,
                    wait.as_secs() / 60
                ),
            }

            tokio::time::sleep(wait).await;
        }
    }

    /// Announce startup, then loop until `shutdown` resolves or a delivery
    /// fails.
    ///
    /// On shutdown a best-effort notice is sent and `Ok(())` is returned,
    /// dropping any delivery still in flight. Delivery errors have already
    /// been reported by the cycle and are returned as-is.
    ///
    /// `shutdown` is first polled after the Up notice is sent, so a signal
    /// that arrives earlier stays queued until then.
    pub async fn run_until<S>(&mut self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        self.notifier.send_text(&self.notices.up()).await?;
        log::info!(
            "Running: {} per batch, every {}-{} min",
            self.schedule.batch_size,
            self.schedule.min_interval_minutes,
            self.schedule.max_interval_minutes
        );

        let outcome = tokio::select! {
            result = self.run_forever() => Some(result),
            _ = shutdown => None,
        };

        match outcome {
            Some(Err(e)) => Err(e),
            Some(Ok(never)) => match never {},
            None => {
                self.notify_shutdown().await;
                Ok(())
            }
        }
    }

    async fn notify_shutdown(&self) {
        log::info!("Shutting down ...");
        if let Err(e) = self.notifier.send_text(&self.notices.shutdown()).await {
            log::error!("Could not send shutdown notice: {}", e);
        }
    }
}
