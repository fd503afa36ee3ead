//! Well-known locations and commands used by the updater.
//!
//! There is no configuration file; [`UpdaterConfig::default`] describes the
//! Atom editor on a Debian-based amd64 host. Tests build their own values to
//! redirect the artifact into a temporary directory.

use camino::Utf8PathBuf;
use std::time::Duration;

use crate::progress::ProgressMode;

/// Upstream "latest release" page.
pub const RELEASE_URL: &str = "https://github.com/atom/atom/releases/latest";

/// Origin prefixed to relative download links found on the release page.
pub const BASE_ORIGIN: &str = "https://github.com";

/// Class token carried by the release title heading.
pub const TITLE_CLASS: &str = "release-title";

/// Suffix identifying the amd64 Debian package link.
pub const PACKAGE_SUFFIX: &str = "/atom-amd64.deb";

/// Fixed location the artifact is downloaded to.
pub const ARTIFACT_PATH: &str = "/tmp/atom_latest.deb";

/// Everything the update pipeline needs to know about its surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// Program queried for the local version.
    pub application: String,
    /// Arguments making `application` print its version.
    pub version_args: Vec<String>,
    /// Page advertising the latest release.
    pub release_url: String,
    /// Origin used to absolutise relative download links.
    pub base_origin: String,
    /// Class token identifying the release title `h1`.
    pub title_class: String,
    /// Suffix the download link must end with.
    pub package_suffix: String,
    /// Where the artifact is written.
    pub artifact_path: Utf8PathBuf,
    /// Privileged install command; the artifact path is appended.
    pub install_command: Vec<String>,
    /// Interval between progress indicator frames.
    pub tick_interval: Duration,
    /// Whether the progress indicator draws on the terminal.
    pub progress: ProgressMode,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            application: "atom".to_owned(),
            version_args: vec!["--version".to_owned()],
            release_url: RELEASE_URL.to_owned(),
            base_origin: BASE_ORIGIN.to_owned(),
            title_class: TITLE_CLASS.to_owned(),
            package_suffix: PACKAGE_SUFFIX.to_owned(),
            artifact_path: Utf8PathBuf::from(ARTIFACT_PATH),
            install_command: vec!["sudo".to_owned(), "dpkg".to_owned(), "--install".to_owned()],
            tick_interval: Duration::from_secs(1),
            progress: ProgressMode::Terminal,
        }
    }
}

impl UpdaterConfig {
    /// Returns a copy of the configuration writing its artifact to `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use atom_updater::config::UpdaterConfig;
    ///
    /// let config = UpdaterConfig::default().with_artifact_path("/var/tmp/atom.deb");
    /// assert_eq!(config.artifact_path.as_str(), "/var/tmp/atom.deb");
    /// ```
    #[must_use]
    pub fn with_artifact_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_atom_debian_package() {
        let config = UpdaterConfig::default();
        assert_eq!(config.application, "atom");
        assert_eq!(config.version_args, ["--version"]);
        assert_eq!(config.release_url, RELEASE_URL);
        assert!(config.package_suffix.ends_with("-amd64.deb"));
        assert_eq!(config.artifact_path.as_str(), "/tmp/atom_latest.deb");
    }

    #[test]
    fn default_install_command_is_privileged_dpkg() {
        let config = UpdaterConfig::default();
        assert_eq!(config.install_command, ["sudo", "dpkg", "--install"]);
    }
}
