//! Local version inspection.
//!
//! Runs the application's version command and extracts the version from the
//! first line of its standard output, which is expected to look like
//! `Atom    : 1.60.0`.

use crate::command::{CommandExecutor, display_command};
use crate::config::UpdaterConfig;
use crate::error::{Result, UpdaterError};
use crate::version::VersionString;

/// Queries the locally installed application for its version.
///
/// # Errors
///
/// Returns [`UpdaterError::NotInstalled`] when the command cannot be spawned
/// or exits unsuccessfully, and [`UpdaterError::UnexpectedFormat`] when the
/// output does not contain a `prefix: version` first line.
pub fn local_version(
    executor: &dyn CommandExecutor,
    config: &UpdaterConfig,
) -> Result<VersionString> {
    let args: Vec<&str> = config.version_args.iter().map(String::as_str).collect();
    let not_installed = |reason: String| UpdaterError::NotInstalled {
        command: display_command(&config.application, &args),
        reason,
    };

    let output = executor
        .run(&config.application, &args)
        .map_err(|err| not_installed(err.to_string()))?;

    if !output.status.success() {
        return Err(not_installed(format!("exited with {}", output.status)));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = parse_version_output(&stdout)?;
    log::debug!("local version is {version}");
    Ok(version)
}

/// Extracts the version from `--version` output.
///
/// Only the first line is considered. It is split on its first colon and the
/// trimmed remainder is the version.
///
/// # Errors
///
/// Returns [`UpdaterError::UnexpectedFormat`] if the first line has no colon
/// or nothing follows it.
///
/// # Examples
///
/// ```
/// use atom_updater::inspector::parse_version_output;
///
/// let output = "Atom    : 1.60.0\nElectron: 9.4.4\n";
/// assert_eq!(parse_version_output(output)?.as_str(), "1.60.0");
/// # Ok::<(), atom_updater::error::UpdaterError>(())
/// ```
pub fn parse_version_output(output: &str) -> Result<VersionString> {
    let first_line = output.lines().next().unwrap_or_default();
    let unexpected = || UpdaterError::UnexpectedFormat {
        output: first_line.to_owned(),
    };

    let (_, remainder) = first_line.split_once(':').ok_or_else(unexpected)?;
    let version = remainder.trim();
    if version.is_empty() {
        return Err(unexpected());
    }
    Ok(VersionString::from(version))
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests assert on the parsed version or the error it produced"
)]
mod tests {
    use super::*;
    use crate::command::MockCommandExecutor;
    use crate::test_utils::{exit_status, failure_output, stdout_output};
    use rstest::rstest;
    use std::process::Output;

    #[rstest]
    #[case::atom_layout("Atom    : 1.60.0\nElectron: 9.4.4\nChrome  : 83.0\n", "1.60.0")]
    #[case::tight("Atom:1.59.0", "1.59.0")]
    #[case::extra_colons("Atom : 1.60.0: dev\n", "1.60.0: dev")]
    #[case::crlf("Atom : 1.60.0\r\nNode : 12\r\n", "1.60.0")]
    fn parses_first_line_after_first_colon(#[case] output: &str, #[case] expected: &str) {
        let version = parse_version_output(output).expect("version should parse");
        assert_eq!(version.as_str(), expected);
    }

    #[rstest]
    #[case::no_colon("1.60.0\n")]
    #[case::empty("")]
    #[case::nothing_after_colon("Atom :   \n")]
    #[case::colon_only_on_second_line("Atom 1.60.0\nElectron: 9.4.4\n")]
    fn rejects_unexpected_output(#[case] output: &str) {
        let err = parse_version_output(output).expect_err("output should be rejected");
        assert!(matches!(err, UpdaterError::UnexpectedFormat { .. }));
    }

    #[test]
    fn local_version_runs_configured_command() {
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|cmd, args| cmd == "atom" && args == ["--version"])
            .times(1)
            .returning(|_, _| Ok(stdout_output("Atom    : 1.60.0\n")));

        let version = local_version(&executor, &UpdaterConfig::default()).expect("version");
        assert_eq!(version, VersionString::from("1.60.0"));
    }

    #[test]
    fn spawn_failure_means_not_installed() {
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .returning(|_, _| Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()));

        let err = local_version(&executor, &UpdaterConfig::default()).expect_err("should fail");
        assert!(matches!(err, UpdaterError::NotInstalled { .. }));
    }

    #[test]
    fn non_zero_exit_means_not_installed() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|_, _| {
            Ok(Output {
                stdout: b"Atom : 1.60.0\n".to_vec(),
                ..failure_output("crashed")
            })
        });

        let err = local_version(&executor, &UpdaterConfig::default()).expect_err("should fail");
        match err {
            UpdaterError::NotInstalled { command, .. } => assert_eq!(command, "atom --version"),
            other => panic!("expected NotInstalled, got {other:?}"),
        }
    }

    #[test]
    fn successful_command_with_bad_output_is_unexpected_format() {
        let mut executor = MockCommandExecutor::new();
        executor.expect_run().returning(|_, _| {
            Ok(Output {
                status: exit_status(0),
                stdout: b"atom version unknown".to_vec(),
                stderr: Vec::new(),
            })
        });

        let err = local_version(&executor, &UpdaterConfig::default()).expect_err("should fail");
        assert!(matches!(err, UpdaterError::UnexpectedFormat { .. }));
    }
}
