// src/pipeline/relay.rs

//! Wiring from a [`RuntimeConfig`] to a running relay.

use std::future::Future;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{ComicId, RuntimeConfig, Schedule};
use crate::pipeline::deliver::{Deliver, DeliveryCycle};
use crate::pipeline::retry::RetryPolicy;
use crate::pipeline::schedule::Scheduler;
use crate::services::{ComicArchive, Notices, Notifier, TelegramNotifier, XkcdArchive};
use crate::storage::{LocalStorage, VisitedStore};
use crate::utils::http::create_async_client;

/// Concrete collaborators built from configuration.
#[derive(Clone)]
pub struct Components {
    pub archive: Arc<dyn ComicArchive>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<dyn VisitedStore>,
    pub notices: Notices,
    pub retry: RetryPolicy,
}

impl Components {
    /// Build the HTTP-backed archive and notifier plus the file store.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        let client = create_async_client(&config.http)?;
        Ok(Self {
            archive: Arc::new(XkcdArchive::new(client.clone(), &config.archive)?),
            notifier: Arc::new(TelegramNotifier::new(client, &config.telegram)?),
            store: Arc::new(LocalStorage::new(&config.storage.data_file)),
            notices: Notices::new(config.bot_name.clone()),
            retry: RetryPolicy::from(&config.retry),
        })
    }

    pub fn delivery_cycle(&self) -> DeliveryCycle {
        DeliveryCycle::new(
            Arc::clone(&self.archive),
            Arc::clone(&self.notifier),
            Arc::clone(&self.store),
            self.notices.clone(),
        )
        .with_retry(self.retry)
    }
}

/// Validate `config`, reporting a rejection through `notifier` first.
///
/// The report is best effort; the validation error is always returned.
pub async fn validate_or_report(
    config: &RuntimeConfig,
    notifier: Option<&dyn Notifier>,
    notices: &Notices,
) -> Result<Schedule> {
    let checked = config.validate().and_then(|_| config.schedule.validated());
    if let Err(e) = &checked {
        log::error!("Invalid configuration: {}", e);
        if let Some(notifier) = notifier {
            if let Err(report) = notifier.send_text(&notices.invalid_config(e)).await {
                log::error!("Could not report invalid configuration: {}", report);
            }
        }
    }
    checked
}

/// Run the long-lived loop until `shutdown` resolves or a delivery fails.
pub async fn run_relay<S>(components: &Components, schedule: Schedule, shutdown: S) -> Result<()>
where
    S: Future<Output = ()>,
{
    let mut scheduler = Scheduler::new(
        components.delivery_cycle(),
        Arc::clone(&components.notifier),
        components.notices.clone(),
        schedule,
    );
    scheduler.run_until(shutdown).await
}

/// Deliver exactly one comic.
pub async fn run_once(components: &Components) -> Result<ComicId> {
    components.delivery_cycle().deliver_one().await
}
