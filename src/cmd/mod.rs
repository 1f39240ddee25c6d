// SPDX-License-Identifier: GPL-2.0-only

//! pkgpatch subcommand implementations.
//!
//! Each subcommand is in its own module. The [`COMMANDS`] slice constant
//! contains a [`PkgpatchCommand`] instance for each subcommand.

pub(crate) mod resolve;
pub(crate) mod show;

/// Entry point for a pkgpatch subcommand.
pub(crate) struct PkgpatchCommand {
    /// Name of command.
    pub name: &'static str,

    /// Function pointer for making the [`clap::Command`] for the subcommand.
    pub make: fn() -> clap::Command,

    /// Function pointer for running the subcommand.
    pub run: fn(&clap::ArgMatches) -> anyhow::Result<()>,
}

/// Builtin [`PkgpatchCommand`]'s.
///
/// This is used in [`crate::main`] for command line argument parsing and
/// eventual dispatch of a subcommand.
pub(crate) const COMMANDS: &[PkgpatchCommand] = &[resolve::COMMAND, show::COMMAND];
