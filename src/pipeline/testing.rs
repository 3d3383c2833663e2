//! In-memory fakes for the pipeline's collaborators.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Comic, ComicId, VisitedSet};
use crate::services::{ComicArchive, Notifier};
use crate::storage::VisitedStore;

/// Archive serving generated comics `1..=latest`.
#[derive(Debug)]
pub struct FakeArchive {
    latest: ComicId,
    latest_failures: AtomicU32,
    comic_failures: AtomicU32,
    latest_calls: AtomicU32,
}

impl FakeArchive {
    pub fn new(latest: ComicId) -> Self {
        Self {
            latest,
            latest_failures: AtomicU32::new(0),
            comic_failures: AtomicU32::new(0),
            latest_calls: AtomicU32::new(0),
        }
    }

    /// Fail the next `n` latest-id requests.
    pub fn fail_latest(&self, n: u32) {
        self.latest_failures.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` comic requests.
    pub fn fail_comics(&self, n: u32) {
        self.comic_failures.store(n, Ordering::SeqCst);
    }

    pub fn latest_calls(&self) -> u32 {
        self.latest_calls.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ComicArchive for FakeArchive {
    async fn latest_id(&self) -> Result<ComicId> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.latest_failures) {
            return Err(AppError::archive("latest comic", "HTTP 503 Service Unavailable"));
        }
        Ok(self.latest)
    }

    async fn comic(&self, id: ComicId) -> Result<Comic> {
        if Self::take_failure(&self.comic_failures) {
            return Err(AppError::archive(format!("comic {id}"), "connection reset"));
        }
        Ok(Comic {
            id,
            title: format!("Comic {id}"),
            alt_text: format!("Alt text {id}."),
            image_url: format!("https://imgs.example/{id}.png"),
            link: None,
            extra_parts: None,
        })
    }
}

/// A message captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Photo { caption: String, image_url: String },
}

/// Notifier that records everything it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
    fail_texts: AtomicBool,
    fail_photos: AtomicBool,
    stall_photos: AtomicBool,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_texts(&self) {
        self.fail_texts.store(true, Ordering::SeqCst);
    }

    pub fn fail_photos(&self) {
        self.fail_photos.store(true, Ordering::SeqCst);
    }

    /// Make every photo send hang forever.
    pub fn stall_photos(&self) {
        self.stall_photos.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_text(&self, text: &str) -> Result<()> {
        if self.fail_texts.load(Ordering::SeqCst) {
            return Err(AppError::notification("sendMessage returned HTTP 400"));
        }
        self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_photo(&self, caption: &str, image_url: &str) -> Result<()> {
        if self.stall_photos.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.fail_photos.load(Ordering::SeqCst) {
            return Err(AppError::notification("sendPhoto returned HTTP 400"));
        }
        self.sent.lock().unwrap().push(Sent::Photo {
            caption: caption.to_string(),
            image_url: image_url.to_string(),
        });
        Ok(())
    }
}

/// Visited store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    current: Mutex<Option<VisitedSet>>,
    saves: AtomicU32,
    fail_loads: AtomicBool,
}

impl MemoryStore {
    pub fn with(visited: VisitedSet) -> Self {
        Self {
            current: Mutex::new(Some(visited)),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Option<VisitedSet> {
        self.current.lock().unwrap().clone()
    }

    pub fn saves(&self) -> u32 {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VisitedStore for MemoryStore {
    async fn load(&self) -> Result<VisitedSet> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(AppError::store("malformed data.json"));
        }
        Ok(self.current().unwrap_or_default())
    }

    async fn save(&self, visited: &VisitedSet) -> Result<()> {
        *self.current.lock().unwrap() = Some(visited.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
