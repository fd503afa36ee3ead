//! User-facing messages.
//!
//! Progress messages go to an injected writer (stdout in the binary) so the
//! orchestrator can be driven from tests. Diagnostics go through `log`.

use std::io::Write;

use crate::download::Artifact;
use crate::installer::Confirmation;
use crate::version::VersionString;

/// Writes one line, ignoring write failures.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Line announcing the start of the check.
pub const SEARCHING: &str = "Searching Atom versions...";

/// Line printed when no update is needed.
pub const UP_TO_DATE: &str = "You're already up-to-date !";

/// Reports the locally installed version.
#[must_use]
pub fn found_local(version: &VersionString) -> String {
    format!("Found local version: {version}")
}

/// Announces a newer published release.
#[must_use]
pub fn found_newer(version: &VersionString) -> String {
    format!("Found newer version: {version}")
}

/// Reports a finished download.
#[must_use]
pub fn download_complete(artifact: &Artifact) -> String {
    format!("Download successfully completed ({})", artifact.path())
}

/// Reports the outcome of the post-install version check.
///
/// # Examples
///
/// ```
/// use atom_updater::installer::Confirmation;
/// use atom_updater::output::confirmation_message;
/// use atom_updater::version::VersionString;
///
/// let confirmed = Confirmation::Confirmed(VersionString::from("1.60.0"));
/// assert_eq!(confirmation_message(&confirmed), "New version 1.60.0 installed !");
/// ```
#[must_use]
pub fn confirmation_message(confirmation: &Confirmation) -> String {
    match confirmation {
        Confirmation::Confirmed(version) => format!("New version {version} installed !"),
        Confirmation::Unconfirmed { reason } => {
            format!("Package installed, but the new version could not be confirmed: {reason}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_line_appends_newline() {
        let mut out = Vec::new();
        write_line(&mut out, found_local(&VersionString::from("1.59.0")));
        assert_eq!(out, b"Found local version: 1.59.0\n");
    }

    #[test]
    fn unconfirmed_message_carries_reason() {
        let message = confirmation_message(&Confirmation::Unconfirmed {
            reason: "atom not on PATH".to_owned(),
        });
        assert!(message.contains("could not be confirmed"));
        assert!(message.contains("atom not on PATH"));
    }

    #[test]
    fn download_complete_names_artifact() {
        let artifact = Artifact::new("/tmp/atom_latest.deb", 3, Some(3));
        assert_eq!(
            download_complete(&artifact),
            "Download successfully completed (/tmp/atom_latest.deb)"
        );
    }
}
