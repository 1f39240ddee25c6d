// SPDX-License-Identifier: GPL-2.0-only

//! [`clap::Arg`] definitions common to several pkgpatch commands.

use clap::Arg;

/// The `--app-root` option for resolving install locations on disk.
pub(crate) fn app_root_arg() -> Arg {
    Arg::new("app-root")
        .long("app-root")
        .help("Resolve install locations beneath DIR")
        .value_name("dir")
        .value_hint(clap::ValueHint::DirPath)
        .value_parser(clap::value_parser!(std::path::PathBuf))
}

/// The `--json` option for machine-readable output.
pub(crate) fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print descriptors as JSON")
        .action(clap::ArgAction::SetTrue)
}

/// Get a `&str` from a `clap::ArgMatches` instance for the given `id`.
///
/// This function may be cleaner than calling `ArgMatches::get_one::<String>()`
/// directly since that function returns `Option<&String>` which often needs
/// to be mapped to `Option<&str>`.
pub(crate) fn get_one_str<'a>(matches: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    matches.get_one::<String>(id).map(|s| s.as_str())
}
