// src/pipeline/deliver.rs

//! Selection and delivery of a single comic.
//!
//! One call to [`Deliver::deliver_one`] runs the whole cycle:
//! latest id → load visited → (reset on exhaustion) → pick → fetch →
//! send photo → persist. Any failure is reported to the chat before it is
//! returned.

use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{AppError, Result};
use crate::models::{ComicId, VisitedSet};
use crate::pipeline::retry::{RetryPolicy, retry};
use crate::services::{ComicArchive, Notices, Notifier};
use crate::storage::VisitedStore;
use crate::utils::compose_message;

/// Something that can deliver one comic per call.
#[async_trait]
pub trait Deliver: Send {
    /// Deliver one unvisited comic and return its id.
    async fn deliver_one(&mut self) -> Result<ComicId>;
}

/// Pick an id uniformly from `1..=latest_id` minus `visited`.
pub fn select_unvisited<R: Rng + ?Sized>(
    rng: &mut R,
    visited: &VisitedSet,
    latest_id: ComicId,
) -> Result<ComicId> {
    let pool = visited.unvisited(latest_id);
    if pool.is_empty() {
        return Err(AppError::selection(format!(
            "no unvisited comics among 1..={latest_id} ({} visited)",
            visited.len()
        )));
    }
    log::debug!("Choosing from {} unvisited comics", pool.len());
    Ok(pool[rng.random_range(0..pool.len())])
}

/// The production delivery cycle.
pub struct DeliveryCycle {
    archive: Arc<dyn ComicArchive>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn VisitedStore>,
    notices: Notices,
    retry: RetryPolicy,
    rng: StdRng,
}

impl DeliveryCycle {
    pub fn new(
        archive: Arc<dyn ComicArchive>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn VisitedStore>,
        notices: Notices,
    ) -> Self {
        Self {
            archive,
            notifier,
            store,
            notices,
            retry: RetryPolicy::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Use a fixed RNG, e.g. a seeded one for reproducible picks.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    async fn try_deliver(&mut self) -> Result<ComicId> {
        let archive = &*self.archive;

        let latest_id = retry(self.retry, "Fetching latest comic", || archive.latest_id()).await?;

        let mut visited = self.store.load().await?;
        if visited.is_exhausted(latest_id) {
            log::info!("All {} comics delivered, starting over", latest_id);
            self.notifier.send_text(&self.notices.exhausted()).await?;
            // Persisted only once the next delivery succeeds.
            visited.clear();
        }

        let id = select_unvisited(&mut self.rng, &visited, latest_id)?;
        log::info!(
            "Fetching comic {} ({} of {} already delivered)",
            id,
            visited.len(),
            latest_id
        );

        let comic = retry(self.retry, &format!("Fetching comic {id}"), || archive.comic(id)).await?;

        let caption = compose_message(&comic);
        self.notifier.send_photo(&caption, &comic.image_url).await?;

        visited.insert(id);
        self.store.save(&visited).await?;
        log::info!("Delivered comic {}: {}", id, comic.title);

        Ok(id)
    }
}

#[async_trait]
impl Deliver for DeliveryCycle {
    async fn deliver_one(&mut self) -> Result<ComicId> {
        match self.try_deliver().await {
            Ok(id) => Ok(id),
            Err(e) => {
                log::error!("Delivery failed: {}", e);
                if let Err(report) = self.notifier.send_text(&self.notices.failure(&e)).await {
                    log::error!("Could not report delivery failure: {}", report);
                }
                Err(e)
            }
        }
    }
}
