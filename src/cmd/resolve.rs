// SPDX-License-Identifier: GPL-2.0-only

//! `pkgpatch resolve` implementation.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches};

use crate::{argset, descriptor::PackageDescriptor};

pub(super) const COMMAND: super::PkgpatchCommand = super::PkgpatchCommand {
    name: "resolve",
    make,
    run,
};

fn make() -> clap::Command {
    clap::Command::new(COMMAND.name)
        .about("Resolve a package path specifier to its install location")
        .long_about(
            "Resolve a package path specifier to its install location.\n\
             \n\
             A specifier names a package by its path within node_modules, \
             with '/' separating nesting levels, e.g. 'foo' or \
             '@scope/name/nested-pkg' for 'nested-pkg' installed inside \
             '@scope/name'.",
        )
        .arg(argset::app_root_arg())
        .arg(argset::json_arg())
        .arg(
            Arg::new("specifier")
                .value_name("specifier")
                .required(true)
                .help("Package path specifier"),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let app_root = matches.get_one::<PathBuf>("app-root").map(PathBuf::as_path);
    let as_json = matches.get_flag("json");
    let specifier = argset::get_one_str(matches, "specifier").unwrap_or_default();

    let details = PackageDescriptor::from_specifier(specifier, app_root)?
        .ok_or_else(|| anyhow!("`{specifier}` is not a package path specifier"))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{}", details.human_readable_path_specifier);
    println!("  name:     {}", details.name);
    println!("  path:     {}", details.path);
    if let Some(realpath) = &details.realpath {
        println!("  realpath: {}", realpath.display());
    }
    if let Some(repo_root) = &details.repo_root {
        println!("  repo:     {}", repo_root.display());
    }
    Ok(())
}
