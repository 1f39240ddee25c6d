// SPDX-License-Identifier: GPL-2.0-only

//! `pkgpatch show` implementation.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Arg, ArgMatches};

use crate::{argset, descriptor::PatchDescriptor};

pub(super) const COMMAND: super::PkgpatchCommand = super::PkgpatchCommand {
    name: "show",
    make,
    run,
};

fn make() -> clap::Command {
    clap::Command::new(COMMAND.name)
        .about("Print the package details encoded in patch filenames")
        .long_about(
            "Print the package details encoded in patch filenames.\n\
             \n\
             A patch filename names the patched package and its version, \
             e.g. 'left-pad+1.2.3.patch'. Scoped packages separate scope and \
             name with '+' ('@babel+core+7.0.0.patch'); a package nested \
             inside another package's node_modules joins the segments with \
             '++' ('outer++inner+1.0.0.patch'); and an ordinal with an \
             optional label may follow the version when several patches \
             apply to the same version ('foo+1.0.0+001+hotfix.patch').",
        )
        .arg(argset::app_root_arg())
        .arg(argset::json_arg())
        .arg(
            Arg::new("patch-filename")
                .value_name("filename")
                .required(true)
                .num_args(1..)
                .help("Patch filename to inspect"),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let app_root = matches.get_one::<PathBuf>("app-root").map(PathBuf::as_path);
    let as_json = matches.get_flag("json");
    let filenames: Vec<&String> = matches
        .get_many::<String>("patch-filename")
        .map(|filenames| filenames.collect())
        .unwrap_or_default();

    let mut parsed = 0;
    for filename in &filenames {
        match PatchDescriptor::from_patch_filename(filename, app_root)? {
            Some(details) => {
                print_patch(&details, as_json)?;
                parsed += 1;
            }
            None => eprintln!("`{filename}` is not a patch filename"),
        }
    }

    if parsed == 0 {
        Err(anyhow!(
            "no valid patch filename among {} argument(s)",
            filenames.len()
        ))
    } else {
        Ok(())
    }
}

fn print_patch(details: &PatchDescriptor, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(details)?);
        return Ok(());
    }

    let package = &details.package;
    println!("{}", details.patch_filename);
    println!("  target:   {} {}", package.name, details.version);
    if package.is_nested {
        println!("  within:   {}", package.human_readable_path_specifier);
    }
    if let Some(sequence_number) = details.sequence_number {
        match details.sequence_name.as_deref() {
            Some(sequence_name) => println!("  sequence: {sequence_number} ({sequence_name})"),
            None => println!("  sequence: {sequence_number}"),
        }
    }
    if details.is_dev_only {
        println!("  dev only");
    }
    println!("  path:     {}", package.path);
    if let Some(realpath) = &package.realpath {
        println!("  realpath: {}", realpath.display());
    }
    if let Some(repo_root) = &package.repo_root {
        println!("  repo:     {}", repo_root.display());
    }
    Ok(())
}
