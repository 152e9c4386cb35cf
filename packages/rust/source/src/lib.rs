//! Text sources for the adjacency dataset.
//!
//! The dataset is a single delimited text document. It is either published
//! over HTTP(S) or kept on disk; in both cases the whole document is
//! returned or the load fails, never a partial body.

use std::fmt;
use std::path::PathBuf;

use limitrofe_shared::{LimitrofeError, LoadConfig, Result};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Default timeout in seconds for HTTP sources.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum response size we accept (50 MB).
const MAX_RESPONSE_SIZE: u64 = 50 * 1024 * 1024;

/// User-Agent string for dataset requests.
const USER_AGENT: &str = concat!("Limitrofe/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where the dataset text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// An `http`/`https` URL.
    Http(Url),
    /// A local file.
    File(PathBuf),
    /// Text already in memory (tests, stdin).
    Inline(String),
}

impl Source {
    /// Interpret a configured location: HTTP(S) URLs are fetched, anything
    /// else is treated as a file path.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(LimitrofeError::validation("source location is empty"));
        }

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if url.host_str().is_none() {
                    return Err(LimitrofeError::validation(format!(
                        "URL has no host: {url}"
                    )));
                }
                Ok(Self::Http(url))
            }
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::File)
                .map_err(|()| LimitrofeError::validation(format!("invalid file URL: {url}"))),
            _ => Ok(Self::File(PathBuf::from(location))),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline(text) => write!(f, "<inline, {} bytes>", text.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// Configuration for fetching a source.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl From<&LoadConfig> for FetchOptions {
    fn from(config: &LoadConfig) -> Self {
        Self {
            timeout_secs: config.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch the full text of `source`.
///
/// A transport error or non-success HTTP status is a
/// [`LimitrofeError::Fetch`]; an unreadable file is a
/// [`LimitrofeError::Io`].
#[instrument(skip_all, fields(source = %source))]
pub async fn fetch(source: &Source, opts: &FetchOptions) -> Result<String> {
    let text = match source {
        Source::Http(url) => {
            let client = build_client(opts)?;
            fetch_http(&client, url).await?
        }
        Source::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LimitrofeError::io(path, e))?,
        Source::Inline(text) => text.clone(),
    };

    info!(bytes = text.len(), "dataset text fetched");
    Ok(text)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a reqwest client with appropriate settings.
fn build_client(opts: &FetchOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(std::time::Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| LimitrofeError::fetch(format!("failed to build HTTP client: {e}")))
}

/// GET a URL and return its body as text.
async fn fetch_http(client: &Client, url: &Url) -> Result<String> {
    debug!(%url, "requesting dataset");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| LimitrofeError::fetch(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LimitrofeError::fetch(format!("{url}: HTTP {status}")));
    }

    if let Some(len) = response.content_length() {
        if len > MAX_RESPONSE_SIZE {
            return Err(LimitrofeError::validation(format!(
                "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
            )));
        }
    }

    response
        .text()
        .await
        .map_err(|e| LimitrofeError::fetch(format!("{url}: failed to read body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use limitrofe_shared::FailureKind;

    const SAMPLE: &str = "NM_MUN,NM_LIM\nPelotas,Capão do Leão\n";

    #[test]
    fn parse_http_location() {
        let source = Source::parse("https://example.com/limites.csv").unwrap();
        assert!(matches!(source, Source::Http(_)));
    }

    #[test]
    fn parse_file_location() {
        let source = Source::parse("data/limites.csv").unwrap();
        assert_eq!(source, Source::File(PathBuf::from("data/limites.csv")));
    }

    #[test]
    fn parse_empty_location_fails() {
        assert!(Source::parse("   ").is_err());
    }

    #[tokio::test]
    async fn fetch_inline() {
        let text = fetch(&Source::Inline(SAMPLE.into()), &FetchOptions::default())
            .await
            .unwrap();
        assert_eq!(text, SAMPLE);
    }

    #[tokio::test]
    async fn fetch_fixture_file() {
        let source = Source::parse("../../../fixtures/csv/sample.csv").unwrap();
        let text = fetch(&source, &FetchOptions::default()).await.unwrap();
        assert!(text.starts_with("NM_MUN,NM_LIM"));
    }

    #[tokio::test]
    async fn fetch_missing_file_is_fetch_failure() {
        let source = Source::File(PathBuf::from("../../../fixtures/csv/does-not-exist.csv"));
        let err = fetch(&source, &FetchOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Fetch);
    }

    #[tokio::test]
    async fn fetch_with_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/limites.csv"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let source = Source::parse(&format!("{}/limites.csv", server.uri())).unwrap();
        let text = fetch(&source, &FetchOptions::default()).await.unwrap();
        assert_eq!(text, SAMPLE);
    }

    #[tokio::test]
    async fn fetch_non_success_status() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/limites.csv"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = Source::parse(&format!("{}/limites.csv", server.uri())).unwrap();
        let err = fetch(&source, &FetchOptions::default()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Fetch);
        assert!(err.to_string().contains("404"));
    }
}
