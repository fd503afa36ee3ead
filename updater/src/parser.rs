//! Release page parsing.
//!
//! The page is walked depth-first, in document order, looking for two
//! elements:
//!
//! - the release title, which must have this shape:
//!
//!   ```text
//!   <h1 class="... release-title ...">
//!     <a|span> VERSION </a|span>
//!   </h1>
//!   ```
//!
//!   The version is the first non-blank text beneath the first element child
//!   of the heading, and that child must be an `a` or a `span`;
//! - a download anchor, `<a href="...">`, whose `href` ends with the package
//!   suffix (for example `/atom-amd64.deb`).
//!
//! The first match wins for each value and the walk stops once both are
//! known. Both values are required: a page yielding only one of them no longer
//! matches the structure above, and parsing fails with
//! [`UpdaterError::FormatChanged`].

use scraper::{ElementRef, Html};

use crate::config::UpdaterConfig;
use crate::error::{Result, UpdaterError};
use crate::fetcher::ReleaseDocument;
use crate::version::VersionString;

/// Absolute URL of a platform-specific installable artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink(String);

impl DownloadLink {
    /// Wraps an absolute URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the link as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DownloadLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the release page advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// The latest published version.
    pub version: VersionString,
    /// Where to download the package for this platform.
    pub link: DownloadLink,
}

/// Element predicates derived from the configuration.
struct Matchers<'c> {
    title_class: &'c str,
    package_suffix: &'c str,
    base_origin: &'c str,
}

impl Matchers<'_> {
    fn is_release_title(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        value.name() == "h1" && value.classes().any(|class| class == self.title_class)
    }

    fn package_href<'a>(&self, element: &ElementRef<'a>) -> Option<&'a str> {
        let value = element.value();
        if value.name() != "a" {
            return None;
        }
        value
            .attr("href")
            .filter(|href| href.ends_with(self.package_suffix))
    }

    fn absolutise(&self, href: &str) -> DownloadLink {
        if href.starts_with("https://") || href.starts_with("http://") {
            return DownloadLink(href.to_owned());
        }
        let origin = self.base_origin.trim_end_matches('/');
        let path = href.trim_start_matches('/');
        DownloadLink(format!("{origin}/{path}"))
    }
}

/// Extracts the latest version and the matching download link.
///
/// # Errors
///
/// Returns [`UpdaterError::FormatChanged`] if either value is absent.
///
/// # Examples
///
/// ```
/// use atom_updater::config::UpdaterConfig;
/// use atom_updater::fetcher::ReleaseDocument;
/// use atom_updater::parser::parse_release;
///
/// let doc = ReleaseDocument::new(concat!(
///     r#"<h1 class="release-title"><a href="/atom/atom/releases/tag/v1.60.0">1.60.0</a></h1>"#,
///     r#"<a href="/atom/atom/releases/download/v1.60.0/atom-amd64.deb">deb</a>"#,
/// ));
/// let release = parse_release(doc, &UpdaterConfig::default())?;
/// assert_eq!(release.version.as_str(), "1.60.0");
/// assert_eq!(
///     release.link.as_str(),
///     "https://github.com/atom/atom/releases/download/v1.60.0/atom-amd64.deb"
/// );
/// # Ok::<(), atom_updater::error::UpdaterError>(())
/// ```
pub fn parse_release(doc: ReleaseDocument, config: &UpdaterConfig) -> Result<Release> {
    let html = Html::parse_document(&doc.into_html());
    let matchers = Matchers {
        title_class: &config.title_class,
        package_suffix: &config.package_suffix,
        base_origin: &config.base_origin,
    };

    let mut version = None;
    let mut link = None;

    for element in html.root_element().descendants().filter_map(ElementRef::wrap) {
        if version.is_none() && matchers.is_release_title(&element) {
            version = title_version(&element);
            if let Some(found) = &version {
                log::debug!("release title advertises {found}");
            }
        }
        if link.is_none() {
            link = matchers.package_href(&element).map(|href| {
                log::debug!("package link {href}");
                matchers.absolutise(href)
            });
        }
        if version.is_some() && link.is_some() {
            break;
        }
    }

    match (version, link) {
        (Some(latest), Some(package)) => Ok(Release {
            version: latest,
            link: package,
        }),
        (None, Some(_)) => Err(UpdaterError::FormatChanged { missing: "version" }),
        (Some(_), None) => Err(UpdaterError::FormatChanged {
            missing: "download link",
        }),
        (None, None) => Err(UpdaterError::FormatChanged {
            missing: "version and download link",
        }),
    }
}

/// Reads `VERSION` from `<h1> <a|span> VERSION </a|span> </h1>`.
fn title_version(title: &ElementRef<'_>) -> Option<VersionString> {
    let inner = title.children().find_map(ElementRef::wrap)?;
    if !matches!(inner.value().name(), "a" | "span") {
        return None;
    }
    inner
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(VersionString::from)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "parse results are unwrapped to assert on the extracted values"
)]
#[path = "parser_tests.rs"]
mod tests;
