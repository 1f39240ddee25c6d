// SPDX-License-Identifier: GPL-2.0-only

//! Locate the repository enclosing an application root.

use std::path::{Path, PathBuf};

use crate::spawn::{spawn_safe, SpawnOptions};

/// Find the top-level directory of the repository containing `cwd`.
///
/// Lookup failure is not an error condition; an application outside any
/// repository simply has no repository root.
pub(crate) fn find_repo_root(cwd: &Path) -> Option<PathBuf> {
    let output = spawn_safe(
        "git",
        ["rev-parse", "--show-toplevel"],
        SpawnOptions {
            cwd: Some(cwd),
            ..Default::default()
        },
    )
    .ok()?;

    let stdout = String::from_utf8(output.stdout).ok()?;
    let toplevel = stdout.trim();
    if toplevel.is_empty() {
        None
    } else {
        Some(PathBuf::from(toplevel))
    }
}
