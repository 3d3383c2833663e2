// src/services/archive.rs

//! Comic archive client.
//!
//! Talks to the xkcd JSON interface:
//! - `GET {base}/info.0.json` for the latest comic
//! - `GET {base}/{id}/info.0.json` for a specific comic

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ArchiveConfig, BROKEN_COMIC_ID, Comic, ComicId, ComicRecord, LatestRecord};
use crate::utils::http::base_url;

/// Source of numbered comics.
#[async_trait]
pub trait ComicArchive: Send + Sync {
    /// Number of the most recent comic.
    async fn latest_id(&self) -> Result<ComicId>;

    /// Fetch a single comic by number.
    async fn comic(&self, id: ComicId) -> Result<Comic>;
}

/// HTTP client for the xkcd archive.
#[derive(Debug, Clone)]
pub struct XkcdArchive {
    client: Client,
    base: Url,
}

impl XkcdArchive {
    pub fn new(client: Client, config: &ArchiveConfig) -> Result<Self> {
        Ok(Self {
            client,
            base: base_url(&config.base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, context: &str, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::archive(context, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::archive(context, format!("HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::archive(context, format!("malformed body: {e}")))
    }
}

#[async_trait]
impl ComicArchive for XkcdArchive {
    async fn latest_id(&self) -> Result<ComicId> {
        let url = self.endpoint("info.0.json")?;
        let record: LatestRecord = self.get_json("latest comic", url).await?;
        Ok(record.num)
    }

    async fn comic(&self, id: ComicId) -> Result<Comic> {
        if id == BROKEN_COMIC_ID {
            return Ok(Comic::placeholder_404());
        }

        let url = self.endpoint(&format!("{id}/info.0.json"))?;
        let record: ComicRecord = self.get_json(&format!("comic {id}"), url).await?;
        Ok(Comic::from(record))
    }
}
