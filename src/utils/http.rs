// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))
}

/// Parse a base URL so that relative joins append instead of replacing
/// the last path segment.
pub fn base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim_end_matches('/');
    Ok(Url::parse(&format!("{trimmed}/"))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_join() {
        let base = base_url("https://xkcd.com").unwrap();
        assert_eq!(
            base.join("57/info.0.json").unwrap().as_str(),
            "https://xkcd.com/57/info.0.json"
        );

        let nested = base_url("http://127.0.0.1:8080/mirror/").unwrap();
        assert_eq!(
            nested.join("info.0.json").unwrap().as_str(),
            "http://127.0.0.1:8080/mirror/info.0.json"
        );
    }

    #[test]
    fn test_base_url_invalid() {
        assert!(matches!(base_url("not a url"), Err(AppError::Url(_))));
    }

    #[test]
    fn test_create_client() {
        assert!(create_async_client(&HttpConfig::default()).is_ok());
    }
}
