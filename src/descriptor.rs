// SPDX-License-Identifier: GPL-2.0-only

//! Locate patched packages within an application's install tree.
//!
//! A patch filename such as `foo++@scope+bar+1.2.3.patch` and a user-typed
//! path specifier such as `foo/@scope/bar` both reduce to a descriptor naming
//! the chain of packages from the top of `node_modules` down to the patch
//! target. The descriptor is assembled once per parse and never mutated;
//! everything downstream keys off its fields.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{nameversion::NameVersion, reporoot};

pub(crate) const PATCH_SUFFIX: &str = ".patch";
pub(crate) const DEV_PATCH_SUFFIX: &str = ".dev.patch";

/// Separator joining nested package segments in a patch filename.
const NESTING_SEPARATOR: &str = "++";

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("could not resolve install location `{path}`: {source}")]
    ResolveInstall {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A package install target, possibly nested in another package's
/// `node_modules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PackageDescriptor {
    /// Package names from the outermost package down to the target.
    pub package_names: Vec<String>,

    /// Canonical `/`-joined identification of the target, e.g. `a/b` for `b`
    /// nested inside `a`. For specifiers parsed from the command line this
    /// echoes the user's input verbatim.
    pub path_specifier: String,

    /// The same chain joined with `" => "` for display.
    pub human_readable_path_specifier: String,

    /// Install path relative to the application root, e.g.
    /// `node_modules/a/node_modules/b`.
    pub path: String,

    /// The target package name.
    pub name: String,

    pub is_nested: bool,

    /// Actual install location relative to the application root, with
    /// symlinks resolved. Only present when an application root was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realpath: Option<PathBuf>,

    /// Top-level directory of the repository containing the application
    /// root, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_root: Option<PathBuf>,
}

/// A [`PackageDescriptor`] recovered from a patch filename, which always
/// pins the target package to a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatchDescriptor {
    #[serde(flatten)]
    pub package: PackageDescriptor,

    pub version: String,

    pub patch_filename: String,

    /// The patch only applies in development installs.
    pub is_dev_only: bool,

    /// Ordinal distinguishing multiple patches for the same package version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_name: Option<String>,
}

impl PackageDescriptor {
    /// Parse a user-typed package path specifier such as `@scope/name/nested`.
    ///
    /// Returns `Ok(None)` when the specifier does not name a package: a scope
    /// marker followed by another scope marker, or a specifier with no
    /// package name at all. With an application root the descriptor is
    /// enriched with the resolved install location and enclosing repository
    /// root; only the former can fail.
    pub(crate) fn from_specifier(
        specifier: &str,
        app_root: Option<&Path>,
    ) -> Result<Option<Self>, Error> {
        if specifier.is_empty() {
            return Ok(None);
        }

        let mut package_names: Vec<String> = Vec::new();
        let mut pending_scope: Option<&str> = None;

        for part in specifier.split('/') {
            if part.starts_with('@') {
                if pending_scope.is_some() {
                    return Ok(None);
                }
                pending_scope = Some(part);
            } else if let Some(scope) = pending_scope.take() {
                package_names.push(format!("{scope}/{part}"));
            } else {
                package_names.push(part.to_string());
            }
        }

        // A trailing unconsumed scope marker is dropped; if nothing else was
        // named there is no target package.
        if package_names.is_empty() {
            return Ok(None);
        }

        Self::assemble(package_names, specifier.to_string(), app_root).map(Some)
    }

    /// Build the descriptor from the resolved package name chain.
    fn assemble(
        package_names: Vec<String>,
        path_specifier: String,
        app_root: Option<&Path>,
    ) -> Result<Self, Error> {
        let path = install_path(&package_names);
        let (realpath, repo_root) = match app_root {
            Some(app_root) => (
                Some(resolve_install(app_root, &path)?),
                reporoot::find_repo_root(app_root),
            ),
            None => (None, None),
        };
        let name = package_names
            .last()
            .expect("package name chain is non-empty")
            .clone();
        let human_readable_path_specifier = package_names.join(" => ");
        let is_nested = package_names.len() > 1;

        Ok(PackageDescriptor {
            package_names,
            path_specifier,
            human_readable_path_specifier,
            path,
            name,
            is_nested,
            realpath,
            repo_root,
        })
    }
}

impl PatchDescriptor {
    /// Parse a patch filename such as `@scope+name+1.2.3.patch` or the
    /// nested form `outer++inner+1.0.0.patch`.
    ///
    /// Segments that do not resolve are skipped rather than failing the
    /// whole parse; only the innermost (target) segment must carry a
    /// version. Returns `Ok(None)` when no target with a version remains.
    pub(crate) fn from_patch_filename(
        patch_filename: &str,
        app_root: Option<&Path>,
    ) -> Result<Option<Self>, Error> {
        let is_dev_only = patch_filename.ends_with(DEV_PATCH_SUFFIX);

        let segments: Vec<NameVersion> = strip_patch_suffix(patch_filename)
            .split(NESTING_SEPARATOR)
            .filter_map(|segment| segment.parse::<NameVersion>().ok())
            .collect();

        let target = match segments.last() {
            Some(target) => target,
            None => return Ok(None),
        };

        let version = match &target.version {
            Some(version) => version.clone(),
            None => return Ok(None),
        };
        let sequence_number = target.sequence_number;
        let sequence_name = target.sequence_name.clone();

        let package_names: Vec<String> = segments
            .into_iter()
            .map(|segment| segment.package_name)
            .collect();
        let path_specifier = package_names.join("/");

        let package = PackageDescriptor::assemble(package_names, path_specifier, app_root)?;

        Ok(Some(PatchDescriptor {
            package,
            version,
            patch_filename: patch_filename.to_string(),
            is_dev_only,
            sequence_number,
            sequence_name,
        }))
    }
}

fn strip_patch_suffix(patch_filename: &str) -> &str {
    match patch_filename.strip_suffix(PATCH_SUFFIX) {
        Some(stem) => stem.strip_suffix(".dev").unwrap_or(stem),
        None => patch_filename,
    }
}

fn install_path(package_names: &[String]) -> String {
    format!("node_modules/{}", package_names.join("/node_modules/"))
}

/// Resolve the actual install location of `path` under `app_root`, expressed
/// relative to `app_root`.
///
/// The install may be a symlink pointing elsewhere (as left by linking
/// package managers), so the canonical location is recovered first. A
/// missing install is a fault the caller must see, not a parse failure.
fn resolve_install(app_root: &Path, path: &str) -> Result<PathBuf, Error> {
    let install = std::fs::canonicalize(app_root.join(path)).map_err(|source| {
        Error::ResolveInstall {
            path: app_root.join(path),
            source,
        }
    })?;
    let root = std::fs::canonicalize(app_root).map_err(|source| Error::ResolveInstall {
        path: app_root.to_path_buf(),
        source,
    })?;
    Ok(relative_to(&root, &install))
}

/// Express `target` relative to `base`, inserting parent-dir components when
/// `target` lies outside `base`. Both paths must be absolute.
fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let mut base_iter = base.components();
    let mut target_iter = target.components();

    loop {
        match (base_iter.clone().next(), target_iter.clone().next()) {
            (Some(b), Some(t)) if b == t => {
                base_iter.next();
                target_iter.next();
            }
            _ => break,
        }
    }

    let mut relative = PathBuf::new();
    for _ in base_iter {
        relative.push(Component::ParentDir);
    }
    for component in target_iter {
        relative.push(component);
    }
    relative
}
