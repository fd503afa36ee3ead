//! Opaque version identifiers and the update decision.
//!
//! Versions are compared as exact strings. There is no semantic ordering:
//! any difference between the local and the published version, including a
//! local build that is newer than the release, means "update available".

use std::fmt;

/// An exact-match textual version identifier such as `1.60.0`.
///
/// # Examples
///
/// ```
/// use atom_updater::version::VersionString;
///
/// let version = VersionString::from("1.60.0");
/// assert_eq!(version.as_str(), "1.60.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionString(String);

impl VersionString {
    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VersionString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for VersionString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for VersionString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` when the local version is exactly the latest version.
///
/// # Examples
///
/// ```
/// use atom_updater::version::{VersionString, is_up_to_date};
///
/// let local = VersionString::from("1.60.0");
/// assert!(is_up_to_date(&local, &VersionString::from("1.60.0")));
/// // A lexically greater local version still counts as out of date.
/// assert!(!is_up_to_date(&VersionString::from("1.61.0"), &local));
/// ```
#[must_use]
pub fn is_up_to_date(local: &VersionString, latest: &VersionString) -> bool {
    local == latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.60.0")]
    #[case("")]
    #[case("1.60.0-beta1")]
    fn identical_versions_are_up_to_date(#[case] version: &str) {
        let v = VersionString::from(version);
        assert!(is_up_to_date(&v, &v.clone()));
    }

    #[rstest]
    #[case::older_local("1.59.0", "1.60.0")]
    #[case::newer_local("1.61.0", "1.60.0")]
    #[case::whitespace("1.60.0 ", "1.60.0")]
    #[case::prefixed("v1.60.0", "1.60.0")]
    fn any_difference_means_update_available(#[case] local: &str, #[case] latest: &str) {
        assert!(!is_up_to_date(
            &VersionString::from(local),
            &VersionString::from(latest)
        ));
    }
}
