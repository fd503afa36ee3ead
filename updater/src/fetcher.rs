//! Release page retrieval.

use crate::config::UpdaterConfig;
use crate::error::Result;
use crate::http::HttpClient;

/// The raw HTML of the release page.
///
/// Owned by the parser once fetched and dropped after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDocument(String);

impl ReleaseDocument {
    /// Wraps already-fetched HTML.
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// The document source.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.0
    }

    /// Consumes the document, returning its source.
    #[must_use]
    pub fn into_html(self) -> String {
        self.0
    }
}

/// Fetches the configured "latest release" page with a single GET.
///
/// # Errors
///
/// Returns [`UpdaterError::Network`](crate::error::UpdaterError::Network) if
/// the connection fails or the body cannot be read in full.
pub fn fetch_latest_release_page(
    client: &dyn HttpClient,
    config: &UpdaterConfig,
) -> Result<ReleaseDocument> {
    let html = client.get_text(&config.release_url)?;
    log::debug!("fetched {} bytes from {}", html.len(), config.release_url);
    Ok(ReleaseDocument(html))
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "the mocked fetch must succeed before its body can be checked"
)]
mod tests {
    use super::*;
    use crate::error::UpdaterError;
    use crate::http::{HttpError, MockHttpClient};

    #[test]
    fn fetches_configured_release_url_once() {
        let mut client = MockHttpClient::new();
        client
            .expect_get_text()
            .withf(|url| url == "https://github.com/atom/atom/releases/latest")
            .times(1)
            .returning(|_| Ok("<html></html>".to_owned()));

        let doc = fetch_latest_release_page(&client, &UpdaterConfig::default()).expect("page");
        assert_eq!(doc.html(), "<html></html>");
    }

    #[test]
    fn connection_failure_is_network_error() {
        let mut client = MockHttpClient::new();
        client.expect_get_text().times(1).returning(|url| {
            Err(HttpError::Transport {
                url: url.to_owned(),
                reason: "connection refused".to_owned(),
            })
        });

        let err = fetch_latest_release_page(&client, &UpdaterConfig::default())
            .expect_err("fetch should fail");
        assert!(matches!(err, UpdaterError::Network { reason, .. } if reason == "connection refused"));
    }
}
