//! Atom updater library.
//!
//! This crate checks whether the locally installed Atom editor matches the
//! latest upstream release and, if not, downloads and installs the new
//! package. It is used by the `atom-updater` CLI binary and can be driven
//! programmatically with stubbed commands and HTTP for testing.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - External command execution abstraction
//! - [`config`] - Well-known URLs, paths, and commands
//! - [`download`] - Artifact download with a progress indicator
//! - [`error`] - Error types for the update pipeline
//! - [`fetcher`] - Release page retrieval
//! - [`http`] - HTTP transport abstraction over `ureq`
//! - [`inspector`] - Local version inspection
//! - [`installer`] - Package installation and confirmation
//! - [`output`] - User-facing messages
//! - [`parser`] - Release page parsing
//! - [`progress`] - Timer-driven progress indicator
//! - [`updater`] - Check-then-update orchestration
//! - [`version`] - Version identifiers and the update decision

pub mod cli;
pub mod command;
pub mod config;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod inspector;
pub mod installer;
pub mod output;
pub mod parser;
pub mod progress;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod updater;
pub mod version;
