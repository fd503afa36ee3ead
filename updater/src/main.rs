//! Atom updater CLI entrypoint.
//!
//! Checks the installed Atom editor against the latest upstream release and
//! installs the newer package when the versions differ. Progress and errors
//! are reported on stdout; diagnostics go to stderr via `RUST_LOG`.

use atom_updater::cli::Cli;
use atom_updater::command::SystemCommandExecutor;
use atom_updater::config::UpdaterConfig;
use atom_updater::error::Result;
use atom_updater::http::UreqClient;
use atom_updater::output::write_line;
use atom_updater::updater::{UpdateOutcome, Updater};
use clap::Parser;
use std::io::Write;

fn main() {
    let _cli = Cli::parse();
    init_logging();

    let mut stdout = std::io::stdout();
    let config = UpdaterConfig::default();
    let run_result = Updater::new(&SystemCommandExecutor, &UreqClient, &config).run(&mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stdout);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

fn exit_code_for_run_result(result: Result<UpdateOutcome>, stdout: &mut dyn Write) -> i32 {
    match result {
        Ok(UpdateOutcome::UpToDate { .. }) => 0,
        Ok(UpdateOutcome::Updated { .. }) => {
            write_line(stdout, "Have a nice day ! ;-)");
            0
        }
        Err(err) => {
            write_line(stdout, err);
            1
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "captured stdout is always UTF-8 in these tests"
)]
mod tests {
    use super::*;
    use atom_updater::error::UpdaterError;
    use atom_updater::installer::Confirmation;
    use atom_updater::version::VersionString;

    #[test]
    fn up_to_date_exits_zero_quietly() {
        let mut stdout = Vec::new();
        let outcome = UpdateOutcome::UpToDate {
            version: VersionString::from("1.60.0"),
        };
        assert_eq!(exit_code_for_run_result(Ok(outcome), &mut stdout), 0);
        assert!(stdout.is_empty());
    }

    #[test]
    fn update_exits_zero_with_farewell() {
        let mut stdout = Vec::new();
        let outcome = UpdateOutcome::Updated {
            previous: VersionString::from("1.59.0"),
            latest: VersionString::from("1.60.0"),
            confirmation: Confirmation::Unconfirmed {
                reason: "atom missing".to_owned(),
            },
        };
        assert_eq!(exit_code_for_run_result(Ok(outcome), &mut stdout), 0);
        assert_eq!(stdout, b"Have a nice day ! ;-)\n");
    }

    #[test]
    fn error_prints_message_and_exits_one() {
        let err = UpdaterError::FormatChanged {
            missing: "version",
        };

        let mut stdout = Vec::new();
        assert_eq!(exit_code_for_run_result(Err(err), &mut stdout), 1);

        let text = String::from_utf8(stdout).expect("stdout was not UTF-8");
        assert!(text.contains("release page format has changed"));
    }
}
