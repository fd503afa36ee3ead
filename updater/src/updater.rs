//! Check-then-update orchestration.
//!
//! The pipeline is strictly sequential:
//!
//! 1. fetch the release page;
//! 2. query the local version;
//! 3. parse the page for the latest version and download link;
//! 4. stop if the versions are identical;
//! 5. otherwise download the package, install it, and confirm the version.
//!
//! Every failure is terminal except the final confirmation.

use std::io::Write;

use crate::command::CommandExecutor;
use crate::config::UpdaterConfig;
use crate::download::download;
use crate::error::Result;
use crate::fetcher::fetch_latest_release_page;
use crate::http::HttpClient;
use crate::inspector::local_version;
use crate::installer::{Confirmation, install};
use crate::output::{
    SEARCHING, UP_TO_DATE, confirmation_message, download_complete, found_local, found_newer,
    write_line,
};
use crate::parser::parse_release;
use crate::version::{VersionString, is_up_to_date};

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The local version already matches the latest release.
    UpToDate {
        /// The installed (and latest) version.
        version: VersionString,
    },
    /// A different release was downloaded and installed.
    Updated {
        /// Version installed before the update.
        previous: VersionString,
        /// Version advertised by the release page.
        latest: VersionString,
        /// Result of re-querying the application afterwards.
        confirmation: Confirmation,
    },
}

/// Drives the update pipeline against injected collaborators.
pub struct Updater<'a> {
    executor: &'a dyn CommandExecutor,
    client: &'a dyn HttpClient,
    config: &'a UpdaterConfig,
}

impl<'a> Updater<'a> {
    /// Creates an updater using the given command executor and HTTP client.
    #[must_use]
    pub const fn new(
        executor: &'a dyn CommandExecutor,
        client: &'a dyn HttpClient,
        config: &'a UpdaterConfig,
    ) -> Self {
        Self {
            executor,
            client,
            config,
        }
    }

    /// Runs the full check-then-update flow, reporting progress to `out`.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: network failures, a missing or
    /// unreadable local install, a changed page format, and download or
    /// install failures.
    pub fn run(&self, out: &mut dyn Write) -> Result<UpdateOutcome> {
        write_line(out, SEARCHING);
        let page = fetch_latest_release_page(self.client, self.config)?;

        let local = local_version(self.executor, self.config)?;
        write_line(out, found_local(&local));

        let release = parse_release(page, self.config)?;
        log::info!("latest release is {}", release.version);

        if is_up_to_date(&local, &release.version) {
            write_line(out, UP_TO_DATE);
            return Ok(UpdateOutcome::UpToDate { version: local });
        }

        write_line(out, found_newer(&release.version));
        write_line(out, "Downloading latest version...");
        let artifact = download(self.client, &release.link, self.config, out)?;
        write_line(out, download_complete(&artifact));

        write_line(out, "Installing package...");
        let confirmation = install(self.executor, artifact, self.config)?;
        write_line(out, confirmation_message(&confirmation));

        Ok(UpdateOutcome::Updated {
            previous: local,
            latest: release.version,
            confirmation,
        })
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "fixtures use temporary directories that must be created"
)]
#[path = "updater_tests.rs"]
mod tests;
