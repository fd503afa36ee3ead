//! Error types for the Atom updater.
//!
//! Every variant is terminal: the pipeline never retries, and the binary
//! reports the message and exits with a failure status. Messages are written
//! for the person running the updater, so each one names what was being
//! attempted.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur while checking for or applying an update.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// The local application could not be queried for its version.
    #[error("Atom Editor is not installed ({command}: {reason})")]
    NotInstalled {
        /// The command that was invoked.
        command: String,
        /// Why the command could not report a version.
        reason: String,
    },

    /// The version command ran but its output did not have the expected shape.
    #[error("unexpected version output: {output:?}")]
    UnexpectedFormat {
        /// The first line of the command output.
        output: String,
    },

    /// A request to the release page or the download link failed.
    #[error("network error for {url}: {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The release page no longer matches the expected structure.
    #[error("release page format has changed: could not find {missing}")]
    FormatChanged {
        /// The value(s) that could not be extracted.
        missing: &'static str,
    },

    /// The artifact file could not be created or written.
    #[error("failed to write artifact to {path}")]
    ArtifactWrite {
        /// Location of the artifact file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The package installer command failed.
    #[error("failed to install package ({status}): {message}")]
    InstallFailed {
        /// Exit status description reported by the installer.
        status: String,
        /// Diagnostic output from the installer.
        message: String,
    },

    /// Test stub received an unexpected or mismatched invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl From<HttpError> for UpdaterError {
    fn from(err: HttpError) -> Self {
        Self::Network {
            url: err.url().to_owned(),
            reason: err.reason(),
        }
    }
}

/// Result type alias using [`UpdaterError`].
pub type Result<T> = std::result::Result<T, UpdaterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_installed_mentions_the_editor() {
        let err = UpdaterError::NotInstalled {
            command: "atom --version".to_owned(),
            reason: "No such file or directory".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Atom Editor is not installed"));
        assert!(msg.contains("atom --version"));
    }

    #[test]
    fn format_changed_names_the_missing_value() {
        let err = UpdaterError::FormatChanged {
            missing: "download link",
        };
        assert!(err.to_string().contains("download link"));
    }

    #[test]
    fn http_status_error_becomes_network_error() {
        let err = UpdaterError::from(HttpError::Status {
            url: "https://example.test/page".to_owned(),
            code: 503,
        });
        match err {
            UpdaterError::Network { url, reason } => {
                assert_eq!(url, "https://example.test/page");
                assert!(reason.contains("503"));
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn artifact_write_preserves_source() {
        let err = UpdaterError::ArtifactWrite {
            path: Utf8PathBuf::from("/tmp/atom_latest.deb"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.to_string().contains("/tmp/atom_latest.deb"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
