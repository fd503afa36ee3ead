//! Tests for the update orchestration.

use super::*;
use crate::config::RELEASE_URL;
use crate::error::UpdaterError;
use crate::progress::ProgressMode;
use crate::test_utils::{ExpectedCall, StubExecutor, StubHttpClient, failure_output, success_output};
use camino::Utf8PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const DEB_URL: &str = "https://github.com/atom/atom/releases/download/v1.60.0/atom-amd64.deb";
const PACKAGE: &[u8] = b"!<arch>\ndebian-binary   1.60.0 package bytes";

fn release_page(version: &str) -> String {
    format!(
        concat!(
            "<html><body>",
            "<h1 class=\"release-title\">\n<a href=\"/atom/atom/releases/tag/v{v}\">{v}</a>\n</h1>",
            "<a href=\"/atom/atom/releases/download/v{v}/atom-amd64.deb\">atom-amd64.deb</a>",
            "</body></html>"
        ),
        v = version
    )
}

struct Fixture {
    _dir: TempDir,
    config: UpdaterConfig,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("atom_latest.deb"))
            .expect("temp path is UTF-8");
        let config = UpdaterConfig {
            progress: ProgressMode::Hidden,
            tick_interval: Duration::from_millis(1),
            ..UpdaterConfig::default()
        }
        .with_artifact_path(path);
        Self { _dir: dir, config }
    }

    fn artifact(&self) -> &str {
        self.config.artifact_path.as_str()
    }

    fn run(
        &self,
        executor: &StubExecutor,
        client: &StubHttpClient,
    ) -> (Result<UpdateOutcome>, String) {
        let mut out = Vec::new();
        let result = Updater::new(executor, client, &self.config).run(&mut out);
        (result, String::from_utf8(out).expect("UTF-8 output"))
    }
}

#[test]
fn identical_versions_stop_before_download() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(vec![ExpectedCall::version_query(
        "Atom    : 1.60.0\nElectron: 9.4.4\n",
    )]);
    let client = StubHttpClient::new().with_page(RELEASE_URL, &release_page("1.60.0"));

    let (result, out) = fixture.run(&executor, &client);

    assert_eq!(
        result.expect("run should succeed"),
        UpdateOutcome::UpToDate {
            version: VersionString::from("1.60.0")
        }
    );
    assert!(out.contains("Found local version: 1.60.0"));
    assert!(out.contains("You're already up-to-date !"));
    assert_eq!(client.requests(), [RELEASE_URL]);
    assert!(executor.is_finished());
    assert!(!fixture.config.artifact_path.exists());
}

#[test]
fn different_version_downloads_installs_and_confirms() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(vec![
        ExpectedCall::version_query("Atom    : 1.59.0\n"),
        ExpectedCall::dpkg_install(fixture.artifact(), success_output()),
        ExpectedCall::version_query("Atom    : 1.60.0\n"),
    ]);
    let client = StubHttpClient::new()
        .with_page(RELEASE_URL, &release_page("1.60.0"))
        .with_body(DEB_URL, PACKAGE);

    let (result, out) = fixture.run(&executor, &client);

    assert_eq!(
        result.expect("run should succeed"),
        UpdateOutcome::Updated {
            previous: VersionString::from("1.59.0"),
            latest: VersionString::from("1.60.0"),
            confirmation: Confirmation::Confirmed(VersionString::from("1.60.0")),
        }
    );
    assert_eq!(
        std::fs::read(&fixture.config.artifact_path).expect("artifact"),
        PACKAGE
    );
    assert_eq!(client.requests(), [RELEASE_URL, DEB_URL]);
    assert!(executor.is_finished());
    assert!(out.contains("Found newer version: 1.60.0"));
    assert!(out.contains(&format!("{0}/{0} bytes downloaded.", PACKAGE.len())));
    assert!(out.contains("New version 1.60.0 installed !"));
}

#[test]
fn newer_local_build_is_still_replaced() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(vec![
        ExpectedCall::version_query("Atom : 1.61.0-dev\n"),
        ExpectedCall::dpkg_install(fixture.artifact(), success_output()),
        ExpectedCall::version_query("Atom : 1.60.0\n"),
    ]);
    let client = StubHttpClient::new()
        .with_page(RELEASE_URL, &release_page("1.60.0"))
        .with_body(DEB_URL, PACKAGE);

    let (result, _) = fixture.run(&executor, &client);

    assert!(matches!(
        result.expect("run should succeed"),
        UpdateOutcome::Updated { .. }
    ));
}

#[test]
fn changed_page_fails_before_download() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(vec![ExpectedCall::version_query("Atom : 1.59.0\n")]);
    let page = "<html><body><h1 class=\"title\">1.60.0</h1></body></html>";
    let client = StubHttpClient::new()
        .with_page(RELEASE_URL, page)
        .with_body(DEB_URL, PACKAGE);

    let (result, _) = fixture.run(&executor, &client);

    assert!(matches!(result, Err(UpdaterError::FormatChanged { .. })));
    assert_eq!(client.requests(), [RELEASE_URL]);
    assert!(!fixture.config.artifact_path.exists());
}

#[test]
fn unreachable_release_page_is_reported_first() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(Vec::new());
    let client = StubHttpClient::new();

    let (result, out) = fixture.run(&executor, &client);

    assert!(matches!(result, Err(UpdaterError::Network { .. })));
    assert!(out.starts_with("Searching Atom versions..."));
    assert!(executor.is_finished());
}

#[test]
fn missing_local_install_is_fatal() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(vec![ExpectedCall {
        result: Ok(failure_output("atom: command not found")),
        ..ExpectedCall::version_query("")
    }]);
    let client = StubHttpClient::new().with_page(RELEASE_URL, &release_page("1.60.0"));

    let (result, _) = fixture.run(&executor, &client);

    assert!(matches!(result, Err(UpdaterError::NotInstalled { .. })));
}

#[test]
fn failed_install_is_fatal() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(vec![
        ExpectedCall::version_query("Atom : 1.59.0\n"),
        ExpectedCall::dpkg_install(fixture.artifact(), failure_output("dpkg: error")),
    ]);
    let client = StubHttpClient::new()
        .with_page(RELEASE_URL, &release_page("1.60.0"))
        .with_body(DEB_URL, PACKAGE);

    let (result, out) = fixture.run(&executor, &client);

    assert!(matches!(result, Err(UpdaterError::InstallFailed { .. })));
    assert!(!out.contains("installed !"));
    assert!(executor.is_finished());
}

#[test]
fn unconfirmed_version_still_succeeds() {
    let fixture = Fixture::new();
    let executor = StubExecutor::new(vec![
        ExpectedCall::version_query("Atom : 1.59.0\n"),
        ExpectedCall::dpkg_install(fixture.artifact(), success_output()),
        ExpectedCall {
            result: Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()),
            ..ExpectedCall::version_query("")
        },
    ]);
    let client = StubHttpClient::new()
        .with_page(RELEASE_URL, &release_page("1.60.0"))
        .with_body(DEB_URL, PACKAGE);

    let (result, out) = fixture.run(&executor, &client);

    match result.expect("run should succeed") {
        UpdateOutcome::Updated { confirmation, .. } => {
            assert!(matches!(confirmation, Confirmation::Unconfirmed { .. }));
        }
        other => panic!("expected an update, got {other:?}"),
    }
    assert!(out.contains("could not be confirmed"));
}
