//! Comic data structures.

use serde::Deserialize;

/// Archive-assigned comic number.
pub type ComicId = u32;

/// The archive id that is a real "not found" page rather than a comic.
pub const BROKEN_COMIC_ID: ComicId = 404;

/// A comic ready to be formatted and delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comic {
    pub id: ComicId,

    /// Title as returned by the archive, HTML entities still encoded
    pub title: String,

    /// Hover text
    pub alt_text: String,

    pub image_url: String,

    /// Optional external link attached to the comic
    pub link: Option<String>,

    /// Optional extra markup for interactive comics
    pub extra_parts: Option<String>,
}

impl Comic {
    /// Fixed stand-in for comic #404, which has no archive entry.
    pub fn placeholder_404() -> Self {
        Self {
            id: BROKEN_COMIC_ID,
            title: "404".to_string(),
            alt_text: "404 Not Found".to_string(),
            image_url: "https://xkcd.com/s/0b7742.png".to_string(),
            link: None,
            extra_parts: None,
        }
    }

    /// Canonical permalink on xkcd.com.
    pub fn permalink(&self) -> String {
        format!("https://xkcd.com/{}/", self.id)
    }
}

/// Raw `info.0.json` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ComicRecord {
    pub num: ComicId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub alt: String,
    pub img: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub extra_parts: Option<serde_json::Value>,
}

/// Only the number from the "latest" endpoint is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct LatestRecord {
    pub num: ComicId,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<ComicRecord> for Comic {
    fn from(record: ComicRecord) -> Self {
        let extra_parts = match record.extra_parts {
            Some(serde_json::Value::String(text)) => Some(text),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => {
                log::debug!(
                    "Ignoring non-text extra_parts on comic {}: {}",
                    record.num,
                    other
                );
                None
            }
        };

        Self {
            id: record.num,
            title: record.title,
            alt_text: record.alt,
            image_url: record.img,
            link: non_empty(record.link),
            extra_parts: non_empty(extra_parts),
        }
    }
}
