//! CLI argument definitions for the Atom updater.
//!
//! The updater takes no operational flags: running it always performs the
//! full check-then-update flow. clap still provides `--help` and `--version`.

use clap::Parser;

/// Update the Atom editor to the latest published release.
#[derive(Parser, Debug, Default)]
#[command(name = "atom-updater")]
#[command(version, about)]
#[command(long_about = concat!(
    "Update the Atom editor to the latest published release.\n\n",
    "The updater reads the version reported by `atom --version`, compares it ",
    "with the version advertised on the upstream release page, and, when they ",
    "differ, downloads the amd64 Debian package to /tmp/atom_latest.deb and ",
    "installs it with `sudo dpkg --install`.",
))]
#[command(after_help = concat!(
    "EXIT STATUS:\n",
    "  0  Atom is up to date, or was updated successfully\n",
    "  1  Any failure (network, missing install, page format, download, install)\n\n",
    "Set RUST_LOG=debug for diagnostic logging.",
))]
pub struct Cli {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_without_arguments() {
        assert!(Cli::try_parse_from(["atom-updater"]).is_ok());
    }

    #[test]
    fn cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["atom-updater", "--force"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
