//! HTTP transport for the release page and the artifact download.
//!
//! Provides a trait-based abstraction over `ureq`, enabling dependency
//! injection for testing. Requests run to completion or failure: there are
//! no retries and no timeouts.

use std::io::Read;
use std::sync::OnceLock;

const MAX_REDIRECTS: u32 = 10;

/// Trait for issuing the two GET requests the updater needs.
///
/// # Examples
///
/// ```no_run
/// use atom_updater::http::{HttpClient, UreqClient};
///
/// let page = UreqClient.get_text("https://github.com/atom/atom/releases/latest")?;
/// assert!(!page.is_empty());
/// # Ok::<(), atom_updater::http::HttpError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient {
    /// Fetches `url` and returns the whole body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails, the server answers with an
    /// error status, or the body cannot be read completely.
    fn get_text(&self, url: &str) -> Result<String, HttpError>;

    /// Opens `url` for streaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the server answers with an
    /// error status.
    fn open(&self, url: &str) -> Result<HttpBody, HttpError>;
}

/// A response body ready to be streamed.
pub struct HttpBody {
    reader: Box<dyn Read + Send>,
    content_length: Option<u64>,
}

impl HttpBody {
    /// Wraps a reader together with the advertised content length.
    #[must_use]
    pub const fn new(reader: Box<dyn Read + Send>, content_length: Option<u64>) -> Self {
        Self {
            reader,
            content_length,
        }
    }

    /// The `Content-Length` announced by the server, if any.
    #[must_use]
    pub const fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Consumes the body, returning the underlying reader.
    #[must_use]
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.reader
    }
}

impl std::fmt::Debug for HttpBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Errors arising from HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    /// The connection could not be established or the request failed.
    #[error("can't get connection to {url}: {reason}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered with an error status.
    #[error("{url} returned HTTP status {code}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        code: u16,
    },

    /// The body could not be read in full.
    #[error("failed to read body of {url}: {reason}")]
    Read {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },
}

impl HttpError {
    /// The URL the failed request was addressed to.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Read { url, .. } => url,
        }
    }

    /// Description of the failure without the URL.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Transport { reason, .. } | Self::Read { reason, .. } => reason.clone(),
            Self::Status { code, .. } => format!("HTTP status {code}"),
        }
    }
}

/// HTTP client backed by a shared `ureq` agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqClient;

impl HttpClient for UreqClient {
    fn get_text(&self, url: &str) -> Result<String, HttpError> {
        log::debug!("GET {url}");
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| HttpError::Read {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    fn open(&self, url: &str) -> Result<HttpBody, HttpError> {
        log::debug!("GET {url} (streaming)");
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let content_length = response
            .headers()
            .get(ureq::http::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let reader = response.into_body().into_reader();
        Ok(HttpBody::new(Box::new(reader), content_length))
    }
}

/// Shared `ureq` agent.
///
/// The `releases/latest` URL answers with a redirect to the tagged release.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .max_redirects(MAX_REDIRECTS)
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to an [`HttpError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> HttpError {
    match err {
        ureq::Error::StatusCode(code) => HttpError::Status {
            url: url.to_owned(),
            code: *code,
        },
        other => HttpError::Transport {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "an in-memory body cannot fail to read"
)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn map_ureq_error_keeps_status_code() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/release", &err);
        assert_eq!(
            mapped,
            HttpError::Status {
                url: "https://example.test/release".to_owned(),
                code: 404,
            }
        );
    }

    #[test]
    fn map_ureq_error_maps_other_failures_to_transport() {
        let err = ureq::Error::HostNotFound;
        let mapped = map_ureq_error("https://example.test/release", &err);
        assert!(matches!(mapped, HttpError::Transport { .. }));
    }

    #[test]
    fn error_accessors_split_url_and_reason() {
        let err = HttpError::Read {
            url: "https://example.test/a.deb".to_owned(),
            reason: "connection reset".to_owned(),
        };
        assert_eq!(err.url(), "https://example.test/a.deb");
        assert_eq!(err.reason(), "connection reset");
    }

    #[test]
    fn http_body_exposes_reader_and_length() {
        let body = HttpBody::new(Box::new(Cursor::new(b"abc".to_vec())), Some(3));
        assert_eq!(body.content_length(), Some(3));

        let mut contents = String::new();
        body.into_reader()
            .read_to_string(&mut contents)
            .expect("read body");
        assert_eq!(contents, "abc");
    }
}
