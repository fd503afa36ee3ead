//! Package installation and confirmation.
//!
//! The installer hands the artifact to the configured privileged command
//! (`sudo dpkg --install <artifact>` by default), then asks the application
//! for its version again. A failing install is fatal; a failing confirmation
//! is only reported, because the package is already installed by then.

use crate::command::{CommandExecutor, display_command};
use crate::config::UpdaterConfig;
use crate::download::Artifact;
use crate::error::{Result, UpdaterError};
use crate::inspector::local_version;
use crate::version::VersionString;
use camino::Utf8Path;

/// Result of re-querying the application after installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// The application now reports this version.
    Confirmed(VersionString),
    /// The version query failed after a successful install.
    Unconfirmed {
        /// Why the version could not be read.
        reason: String,
    },
}

/// Installs `artifact` and confirms the resulting version.
///
/// Consumes the artifact: nothing references it after installation.
///
/// # Errors
///
/// Returns [`UpdaterError::InstallFailed`] if the install command cannot be
/// run or exits unsuccessfully.
pub fn install(
    executor: &dyn CommandExecutor,
    artifact: Artifact,
    config: &UpdaterConfig,
) -> Result<Confirmation> {
    let path = artifact.into_path();
    run_install_command(executor, &path, config)?;
    log::info!("installed {path}");

    Ok(match local_version(executor, config) {
        Ok(version) => Confirmation::Confirmed(version),
        Err(err) => {
            log::warn!("installed package but could not confirm version: {err}");
            Confirmation::Unconfirmed {
                reason: err.to_string(),
            }
        }
    })
}

fn run_install_command(
    executor: &dyn CommandExecutor,
    artifact: &Utf8Path,
    config: &UpdaterConfig,
) -> Result<()> {
    let mut words = config.install_command.iter().map(String::as_str);
    let Some(program) = words.next() else {
        return Err(UpdaterError::InstallFailed {
            status: "not run".to_owned(),
            message: "no install command configured".to_owned(),
        });
    };
    let args: Vec<&str> = words.chain([artifact.as_str()]).collect();
    log::debug!("running {}", display_command(program, &args));

    let output = executor
        .run(program, &args)
        .map_err(|err| UpdaterError::InstallFailed {
            status: "not run".to_owned(),
            message: err.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(UpdaterError::InstallFailed {
            status: output.status.to_string(),
            message: stderr.trim().to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests assert on the confirmation or the error it produced"
)]
mod tests {
    use super::*;
    use crate::command::MockCommandExecutor;
    use crate::test_utils::{failure_output, stdout_output, success_output};
    use mockall::Sequence;

    fn artifact() -> Artifact {
        Artifact::new("/tmp/atom_latest.deb", 10, Some(10))
    }

    fn expect_install(
        executor: &mut MockCommandExecutor,
        sequence: &mut Sequence,
        output: std::process::Output,
    ) {
        executor
            .expect_run()
            .withf(|cmd, args| cmd == "sudo" && args == ["dpkg", "--install", "/tmp/atom_latest.deb"])
            .times(1)
            .in_sequence(sequence)
            .return_once(move |_, _| Ok(output));
    }

    #[test]
    fn installs_then_confirms_version() {
        let mut executor = MockCommandExecutor::new();
        let mut sequence = Sequence::new();
        expect_install(&mut executor, &mut sequence, success_output());
        executor
            .expect_run()
            .withf(|cmd, args| cmd == "atom" && args == ["--version"])
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(stdout_output("Atom    : 1.60.0\n")));

        let confirmation =
            install(&executor, artifact(), &UpdaterConfig::default()).expect("install");
        assert_eq!(
            confirmation,
            Confirmation::Confirmed(VersionString::from("1.60.0"))
        );
    }

    #[test]
    fn failing_install_is_fatal_and_skips_confirmation() {
        let mut executor = MockCommandExecutor::new();
        let mut sequence = Sequence::new();
        expect_install(
            &mut executor,
            &mut sequence,
            failure_output("dpkg: error: cannot access archive\n"),
        );

        let err = install(&executor, artifact(), &UpdaterConfig::default())
            .expect_err("install should fail");
        match err {
            UpdaterError::InstallFailed { message, .. } => {
                assert_eq!(message, "dpkg: error: cannot access archive");
            }
            other => panic!("expected InstallFailed, got {other:?}"),
        }
    }

    #[test]
    fn failed_confirmation_is_not_fatal() {
        let mut executor = MockCommandExecutor::new();
        let mut sequence = Sequence::new();
        expect_install(&mut executor, &mut sequence, success_output());
        executor
            .expect_run()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(stdout_output("garbled")));

        let confirmation =
            install(&executor, artifact(), &UpdaterConfig::default()).expect("install");
        assert!(matches!(confirmation, Confirmation::Unconfirmed { .. }));
    }

    #[test]
    fn spawn_failure_is_install_error() {
        let mut executor = MockCommandExecutor::new();
        executor
            .expect_run()
            .times(1)
            .returning(|_, _| Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()));

        let err = install(&executor, artifact(), &UpdaterConfig::default())
            .expect_err("install should fail");
        assert!(matches!(err, UpdaterError::InstallFailed { .. }));
    }

    #[test]
    fn empty_install_command_is_rejected() {
        let executor = MockCommandExecutor::new();
        let config = UpdaterConfig {
            install_command: Vec::new(),
            ..UpdaterConfig::default()
        };

        let err = install(&executor, artifact(), &config).expect_err("install should fail");
        assert!(matches!(err, UpdaterError::InstallFailed { .. }));
    }
}
