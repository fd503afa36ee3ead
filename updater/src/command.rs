//! External command execution.
//!
//! The version query and the package install are both external programs.
//! They run through [`CommandExecutor`] so tests can substitute canned output.

use crate::error::{Result, UpdaterError};
use std::process::{Command, Output};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use atom_updater::command::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("atom", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), atom_updater::error::UpdaterError>(())
    /// ```
    // The nested lifetime is named so `automock` can generate the mock.
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        log::debug!("running {}", display_command(cmd, args));
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(UpdaterError::from)
    }
}

/// Renders a command line for messages and logs.
///
/// # Examples
///
/// ```
/// use atom_updater::command::display_command;
///
/// assert_eq!(display_command("atom", &["--version"]), "atom --version");
/// ```
#[must_use]
pub fn display_command(cmd: &str, args: &[&str]) -> String {
    std::iter::once(cmd)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_command_without_arguments() {
        assert_eq!(display_command("atom", &[]), "atom");
    }

    #[test]
    fn display_command_joins_arguments_with_spaces() {
        assert_eq!(
            display_command("sudo", &["dpkg", "--install", "/tmp/atom_latest.deb"]),
            "sudo dpkg --install /tmp/atom_latest.deb"
        );
    }

    #[test]
    fn mock_executor_matches_borrowed_arguments() {
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .withf(|cmd, args| cmd == "sudo" && args == ["dpkg", "--install", "/tmp/a.deb"])
            .times(1)
            .returning(|_, _| Ok(crate::test_utils::success_output()));

        let artifact = String::from("/tmp/a.deb");
        let args = ["dpkg", "--install", artifact.as_str()];
        let result = executor.run("sudo", &args);

        assert!(result.is_ok_and(|output| output.status.success()));
    }

    #[test]
    fn system_executor_reports_missing_binaries() {
        let result = SystemCommandExecutor.run("atom-updater-missing-binary", &["--version"]);
        assert!(matches!(result, Err(UpdaterError::Io(_))));
    }
}
