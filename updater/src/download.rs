//! Artifact download with a progress indicator.
//!
//! The response body is streamed into the artifact file on the calling thread
//! while a [`ProgressIndicator`] animates alongside. The indicator is stopped
//! and joined before this module reports anything, so its output never
//! interleaves with the summary line.

use camino::{Utf8Path, Utf8PathBuf};
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, Write};

use crate::config::UpdaterConfig;
use crate::error::{Result, UpdaterError};
use crate::http::{HttpClient, HttpError};
use crate::output::write_line;
use crate::parser::DownloadLink;
use crate::progress::ProgressIndicator;

/// A downloaded package, exclusively owned until handed to the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: Utf8PathBuf,
    bytes_written: u64,
    content_length: Option<u64>,
}

impl Artifact {
    /// Describes an artifact that already exists on disk.
    #[must_use]
    pub fn new(
        path: impl Into<Utf8PathBuf>,
        bytes_written: u64,
        content_length: Option<u64>,
    ) -> Self {
        Self {
            path: path.into(),
            bytes_written,
            content_length,
        }
    }

    /// Location of the artifact on disk.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Consumes the artifact, returning its location.
    #[must_use]
    pub fn into_path(self) -> Utf8PathBuf {
        self.path
    }

    /// Number of bytes written to the file.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Length advertised by the server, when it sent one.
    #[must_use]
    pub const fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Human-readable `written/expected` summary.
    ///
    /// # Examples
    ///
    /// ```
    /// use atom_updater::download::Artifact;
    ///
    /// let artifact = Artifact::new("/tmp/atom_latest.deb", 42, None);
    /// assert_eq!(artifact.summary(), "42/unknown bytes downloaded.");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String {
        let expected = self
            .content_length
            .map_or_else(|| "unknown".to_owned(), |len| len.to_string());
        format!("{}/{expected} bytes downloaded.", self.bytes_written)
    }
}

/// Streams `link` into the configured artifact path.
///
/// Any existing file at that path is overwritten. On failure the partial
/// file is removed before the error is returned.
///
/// # Errors
///
/// Returns [`UpdaterError::ArtifactWrite`] if the file cannot be created or
/// written, and [`UpdaterError::Network`] if the request or the body read
/// fails.
pub fn download(
    client: &dyn HttpClient,
    link: &DownloadLink,
    config: &UpdaterConfig,
    out: &mut dyn Write,
) -> Result<Artifact> {
    let path = &config.artifact_path;
    let file = File::create(path).map_err(|source| UpdaterError::ArtifactWrite {
        path: path.clone(),
        source,
    })?;

    match stream_into(client, link, file, config, config.progress.bar()) {
        Ok((bytes_written, content_length)) => {
            let artifact = Artifact::new(path.clone(), bytes_written, content_length);
            write_line(out, "");
            write_line(out, artifact.summary());
            log::info!("downloaded {link} to {path}");
            Ok(artifact)
        }
        Err(err) => {
            remove_partial(path);
            Err(err)
        }
    }
}

/// Opens and copies the body with the indicator running throughout.
///
/// The indicator starts before the request so connection setup and redirects
/// are animated too; on any early return it is stopped by `Drop`.
fn stream_into(
    client: &dyn HttpClient,
    link: &DownloadLink,
    mut file: File,
    config: &UpdaterConfig,
    bar: ProgressBar,
) -> Result<(u64, Option<u64>)> {
    let indicator = ProgressIndicator::start(bar, config.tick_interval);

    let body = client.open(link.as_str())?;
    let content_length = body.content_length();
    let mut reader = body.into_reader();

    let copied = copy_body(&mut reader, &mut file, link, &config.artifact_path);
    let frames = indicator.stop();
    log::debug!("progress indicator drew {frames} frame(s)");

    let bytes_written = copied?;
    file.sync_all()
        .map_err(|source| UpdaterError::ArtifactWrite {
            path: config.artifact_path.clone(),
            source,
        })?;
    Ok((bytes_written, content_length))
}

/// Copies the body, attributing failures to the network or the disk.
fn copy_body(
    reader: &mut dyn io::Read,
    file: &mut File,
    link: &DownloadLink,
    path: &Utf8Path,
) -> Result<u64> {
    let mut tracked = TrackedWriter {
        inner: file,
        failed: false,
    };
    io::copy(reader, &mut tracked).map_err(|source| {
        if tracked.failed {
            UpdaterError::ArtifactWrite {
                path: path.to_owned(),
                source,
            }
        } else {
            HttpError::Read {
                url: link.as_str().to_owned(),
                reason: source.to_string(),
            }
            .into()
        }
    })
}

/// Records whether an error came from the write side of a copy.
struct TrackedWriter<'a> {
    inner: &'a mut File,
    failed: bool,
}

impl Write for TrackedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).inspect_err(|_| self.failed = true)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|_| self.failed = true)
    }
}

fn remove_partial(path: &Utf8Path) {
    match std::fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            log::warn!("could not remove partial download {path}: {err}");
        }
        _ => {}
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "temporary directories and downloads must succeed for the assertions to mean anything"
)]
mod tests {
    use super::*;
    use crate::http::{HttpBody, MockHttpClient};
    use crate::progress::ProgressMode;
    use std::io::{Cursor, Read};
    use std::time::Duration;

    const LINK: &str = "https://github.com/atom/atom/releases/download/v1.60.0/atom-amd64.deb";

    fn config_in(dir: &tempfile::TempDir) -> UpdaterConfig {
        let path = Utf8PathBuf::from_path_buf(dir.path().join("atom_latest.deb"))
            .expect("temp path is UTF-8");
        UpdaterConfig {
            progress: ProgressMode::Hidden,
            tick_interval: Duration::from_millis(1),
            ..UpdaterConfig::default()
        }
        .with_artifact_path(path)
    }

    fn link() -> DownloadLink {
        DownloadLink::new(LINK)
    }

    fn serving(bytes: Vec<u8>, content_length: Option<u64>) -> MockHttpClient {
        let mut client = MockHttpClient::new();
        let mut body = Some(bytes);
        client
            .expect_open()
            .withf(|url| url == LINK)
            .times(1)
            .returning(move |_| {
                let served = body.take().unwrap_or_default();
                Ok(HttpBody::new(Box::new(Cursor::new(served)), content_length))
            });
        client
    }

    /// Reader that yields some bytes and then fails.
    struct BrokenReader(Option<Vec<u8>>);

    impl Read for BrokenReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.take() {
                Some(bytes) => (&mut *buf).write(&bytes),
                None => Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
            }
        }
    }

    #[test]
    fn artifact_matches_source_body() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(&dir);
        let body: Vec<u8> = (0..=255u8).cycle().take(200_000).collect();
        let client = serving(body.clone(), Some(200_000));
        let mut captured = Vec::new();

        let artifact = download(&client, &link(), &config, &mut captured).expect("download");

        let written = std::fs::read(artifact.path()).expect("read artifact");
        assert_eq!(written, body);
        assert_eq!(artifact.bytes_written(), 200_000);
        assert_eq!(
            std::fs::metadata(artifact.path()).expect("metadata").len(),
            artifact.bytes_written()
        );
        let out = String::from_utf8(captured).expect("UTF-8 output");
        assert!(out.contains("200000/200000 bytes downloaded."));
    }

    #[test]
    fn overwrites_previous_artifact() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(&dir);
        std::fs::write(&config.artifact_path, vec![b'x'; 4096]).expect("seed old artifact");
        let client = serving(b"new".to_vec(), None);

        let artifact = download(&client, &link(), &config, &mut Vec::new()).expect("download");

        assert_eq!(std::fs::read(artifact.path()).expect("read"), b"new");
        assert_eq!(artifact.content_length(), None);
        assert_eq!(artifact.summary(), "3/unknown bytes downloaded.");
    }

    #[test]
    fn connection_failure_removes_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(&dir);
        let mut client = MockHttpClient::new();
        client.expect_open().returning(|url| {
            Err(HttpError::Transport {
                url: url.to_owned(),
                reason: "dns failure".to_owned(),
            })
        });

        let err = download(&client, &link(), &config, &mut Vec::new()).expect_err("should fail");

        assert!(matches!(err, UpdaterError::Network { .. }));
        assert!(!config.artifact_path.exists());
    }

    #[test]
    fn interrupted_body_is_network_error_and_cleaned_up() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(&dir);
        let mut client = MockHttpClient::new();
        client.expect_open().returning(|_| {
            Ok(HttpBody::new(
                Box::new(BrokenReader(Some(b"partial".to_vec()))),
                Some(1024),
            ))
        });
        let mut out = Vec::new();

        let err = download(&client, &link(), &config, &mut out).expect_err("should fail");

        match err {
            UpdaterError::Network { url, .. } => assert_eq!(url, LINK),
            other => panic!("expected network error, got {other:?}"),
        }
        assert!(!config.artifact_path.exists());
        assert!(out.is_empty());
    }

    #[test]
    fn unwritable_destination_is_artifact_write_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(&dir).with_artifact_path(
            Utf8PathBuf::from_path_buf(dir.path().join("missing").join("atom.deb"))
                .expect("temp path is UTF-8"),
        );
        let mut client = MockHttpClient::new();
        client.expect_open().never();

        let err = download(&client, &link(), &config, &mut Vec::new()).expect_err("should fail");
        assert!(matches!(err, UpdaterError::ArtifactWrite { .. }));
    }

    #[test]
    fn indicator_runs_while_the_connection_is_opened() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = config_in(&dir);
        let file = File::create(&config.artifact_path).expect("create artifact");
        let mut client = MockHttpClient::new();
        client.expect_open().times(1).returning(|url| {
            std::thread::sleep(Duration::from_millis(50));
            Err(HttpError::Transport {
                url: url.to_owned(),
                reason: "connection refused".to_owned(),
            })
        });
        let bar = ProgressMode::Hidden.bar();

        let result = stream_into(&client, &link(), file, &config, bar.clone());

        assert!(matches!(result, Err(UpdaterError::Network { .. })));
        assert!(bar.position() > 0, "no frame drawn while connecting");
        assert!(bar.is_finished());
    }

    #[test]
    fn summary_reports_expected_length() {
        let artifact = Artifact::new("/tmp/atom_latest.deb", 10, Some(12));
        assert_eq!(artifact.summary(), "10/12 bytes downloaded.");
    }
}
