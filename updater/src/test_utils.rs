//! Shared test utilities for the updater crate.

use crate::command::CommandExecutor;
use crate::error::{Result, UpdaterError};
use crate::http::{HttpBody, HttpClient, HttpError};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.unsigned_abs())
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    stdout_output("")
}

/// Creates a successful command `Output` printing `stdout`.
#[must_use]
pub fn stdout_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "atom").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Expects `atom --version` and answers with `stdout`.
    #[must_use]
    pub fn version_query(stdout: &str) -> Self {
        Self {
            cmd: "atom",
            args: vec!["--version".to_owned()],
            result: Ok(stdout_output(stdout)),
        }
    }

    /// Expects `sudo dpkg --install <artifact>` and answers with `output`.
    #[must_use]
    pub fn dpkg_install(artifact: &str, output: Output) -> Self {
        Self {
            cmd: "sudo",
            args: vec!["dpkg".to_owned(), "--install".to_owned(), artifact.to_owned()],
            result: Ok(output),
        }
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Returns `true` once every expected invocation has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.expected.borrow().is_empty()
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut expected = self.expected.borrow_mut();
        let Some(call) = expected.pop_front() else {
            return Err(UpdaterError::StubMismatch {
                message: format!("unexpected invocation of {cmd} {args:?}"),
            });
        };

        if call.cmd != cmd || call.args != args {
            return Err(UpdaterError::StubMismatch {
                message: format!(
                    "expected {} {:?}, got {cmd} {args:?}",
                    call.cmd, call.args
                ),
            });
        }

        call.result
    }
}

/// An `HttpClient` serving canned pages and bodies.
///
/// Unknown URLs fail with [`HttpError::Status`] 404. Every request is
/// recorded so tests can assert which URLs were fetched.
#[derive(Debug, Default)]
pub struct StubHttpClient {
    pages: HashMap<String, String>,
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl StubHttpClient {
    /// Creates a client that knows no URLs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` for text requests to `url`.
    #[must_use]
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_owned(), html.to_owned());
        self
    }

    /// Serves `body` for streaming requests to `url`.
    #[must_use]
    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_owned(), body.to_vec());
        self
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn record(&self, url: &str) {
        self.requests.borrow_mut().push(url.to_owned());
    }
}

impl HttpClient for StubHttpClient {
    fn get_text(&self, url: &str) -> std::result::Result<String, HttpError> {
        self.record(url);
        self.pages.get(url).cloned().ok_or_else(|| not_found(url))
    }

    fn open(&self, url: &str) -> std::result::Result<HttpBody, HttpError> {
        self.record(url);
        let body = self.bodies.get(url).ok_or_else(|| not_found(url))?;
        let length = u64::try_from(body.len()).ok();
        Ok(HttpBody::new(Box::new(Cursor::new(body.clone())), length))
    }
}

fn not_found(url: &str) -> HttpError {
    HttpError::Status {
        url: url.to_owned(),
        code: 404,
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "stub behaviour is asserted through its results"
)]
mod tests {
    use super::*;

    #[test]
    fn stub_executor_reports_mismatched_commands() {
        let executor = StubExecutor::new(vec![ExpectedCall::version_query("Atom : 1.60.0")]);
        let err = executor
            .run("atom", &["--help"])
            .expect_err("mismatch should fail");
        assert!(matches!(err, UpdaterError::StubMismatch { .. }));
        assert!(executor.is_finished());
    }

    #[test]
    fn stub_http_client_records_requests() {
        let client = StubHttpClient::new().with_page("https://example.test/", "<p></p>");
        assert_eq!(
            client.get_text("https://example.test/").expect("page"),
            "<p></p>"
        );
        assert!(client.open("https://example.test/missing.deb").is_err());
        assert_eq!(
            client.requests(),
            ["https://example.test/", "https://example.test/missing.deb"]
        );
    }
}
