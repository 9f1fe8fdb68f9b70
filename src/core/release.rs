//! Latest-release lookup for the version badge and the `status` command.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

pub const BADGE_PENDING: &str = "Latest: checking...";
pub const BADGE_OFFLINE: &str = "Latest: v1.0.0 (offline)";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("release payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("release payload has no tag_name")]
    MissingTag,
}

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<String, FetchError>> + 'a>>;

/// Read-only GET returning the response body.
pub trait HttpClient {
    fn get_text<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

#[derive(Debug, Deserialize)]
struct ReleasePayload {
    #[serde(default)]
    tag_name: Option<String>,
}

pub fn parse_release_tag(body: &str) -> Result<String, ReleaseError> {
    let payload: ReleasePayload = serde_json::from_str(body)?;
    match payload.tag_name {
        Some(tag) if !tag.trim().is_empty() => Ok(tag),
        _ => Err(ReleaseError::MissingTag),
    }
}

pub fn badge_text(tag: &str) -> String {
    format!("Latest: {tag}")
}

/// Fetch and parse in one go. One attempt, no retry.
pub async fn fetch_latest_tag(client: &dyn HttpClient, url: &str) -> Result<String, ReleaseError> {
    let body = client.get_text(url).await?;
    let tag = parse_release_tag(&body)?;
    Ok(tag)
}

/// Log a failed lookup. Callers fall back to [`BADGE_OFFLINE`].
pub fn report_failure(err: &ReleaseError) {
    warn!("Failed to fetch release: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedClient(Result<&'static str, u16>);

    impl HttpClient for CannedClient {
        fn get_text<'a>(&'a self, _url: &'a str) -> FetchFuture<'a> {
            let res = match self.0 {
                Ok(body) => Ok(body.to_string()),
                Err(code) => Err(FetchError::Status(code)),
            };
            Box::pin(async move { res })
        }
    }

    #[test]
    fn tag_is_extracted() {
        assert_eq!(parse_release_tag(r#"{"tag_name":"v2.0.0"}"#).unwrap(), "v2.0.0");
        assert_eq!(badge_text("v2.0.0"), "Latest: v2.0.0");
    }

    #[test]
    fn malformed_or_tagless_payloads_fail() {
        assert!(matches!(parse_release_tag("<html>"), Err(ReleaseError::Json(_))));
        assert!(matches!(
            parse_release_tag(r#"{"message":"Not Found"}"#),
            Err(ReleaseError::MissingTag)
        ));
        assert!(matches!(
            parse_release_tag(r#"{"tag_name":""}"#),
            Err(ReleaseError::MissingTag)
        ));
    }

    #[test]
    fn fetch_goes_through_the_client() {
        let ok = CannedClient(Ok(r#"{"tag_name":"v3.1.4","name":"x"}"#));
        let tag = pollster::block_on(fetch_latest_tag(&ok, "https://example.test")).unwrap();
        assert_eq!(tag, "v3.1.4");

        let down = CannedClient(Err(503));
        let err = pollster::block_on(fetch_latest_tag(&down, "https://example.test")).unwrap_err();
        assert!(matches!(err, ReleaseError::Fetch(FetchError::Status(503))));
    }
}
