// SPDX-License-Identifier: GPL-2.0-only

//! Parse `+`-delimited package name and version tokens.
//!
//! A token names one package along the nesting chain of a patch filename. It
//! carries an optional version and, after the version, an optional patch
//! sequence ordinal with an optional label, e.g. `@scope+name+1.2.3+001+hotfix`.
//!
//! The grammar has no delimiter distinguishing a scope from a name part or a
//! version from a sequence label; disambiguation is purely positional. The
//! position of the first version-shaped part decides everything before it
//! (name parts) and everything after it (sequence parts).

use std::str::FromStr;

use regex::Regex;

lazy_static! {
    static ref VERSION_SHAPE: Regex = Regex::new(r"^\d+\.\d+\.\d+").unwrap();
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("empty package token")]
    EmptyToken,

    #[error("no package name before version in `{0}`")]
    MissingName(String),

    #[error("too many name parts in `{0}`")]
    AmbiguousName(String),

    #[error("invalid sequence number `{number}` in `{token}`")]
    InvalidSequenceNumber { token: String, number: String },

    #[error("unexpected parts after sequence name in `{0}`")]
    TrailingParts(String),
}

/// One resolved package token from a patch filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NameVersion {
    pub package_name: String,
    pub version: Option<String>,
    pub sequence_number: Option<usize>,
    pub sequence_name: Option<String>,
}

impl NameVersion {
    fn bare(package_name: String) -> Self {
        Self {
            package_name,
            version: None,
            sequence_number: None,
            sequence_name: None,
        }
    }
}

impl FromStr for NameVersion {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = token
            .split('+')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            return Err(Error::EmptyToken);
        }

        if parts.len() == 1 {
            return Ok(NameVersion::bare(parts[0].to_string()));
        }

        let version_index = match parts.iter().position(|part| VERSION_SHAPE.is_match(part)) {
            Some(index) => index,
            None => {
                // An unversioned multi-part token is taken to be a scoped
                // name. Parts beyond scope and name are dropped.
                let (scope, name) = (parts[0], parts[1]);
                return Ok(NameVersion::bare(format!("{scope}/{name}")));
            }
        };

        let name_parts = &parts[..version_index];
        let package_name = match name_parts.len() {
            0 => return Err(Error::MissingName(token.to_string())),
            1 => name_parts[0].to_string(),
            2 => format!("{}/{}", name_parts[0], name_parts[1]),
            _ => return Err(Error::AmbiguousName(token.to_string())),
        };

        let version = Some(parts[version_index].to_string());
        let sequence_parts = &parts[version_index + 1..];

        if sequence_parts.is_empty() {
            return Ok(NameVersion {
                package_name,
                version,
                sequence_number: None,
                sequence_name: None,
            });
        }

        let sequence_number = sequence_parts[0]
            .trim_start_matches('0')
            .parse::<usize>()
            .map_err(|_| Error::InvalidSequenceNumber {
                token: token.to_string(),
                number: sequence_parts[0].to_string(),
            })?;

        match sequence_parts.len() {
            1 => Ok(NameVersion {
                package_name,
                version,
                sequence_number: Some(sequence_number),
                sequence_name: None,
            }),
            2 => Ok(NameVersion {
                package_name,
                version,
                sequence_number: Some(sequence_number),
                sequence_name: Some(sequence_parts[1].to_string()),
            }),
            _ => Err(Error::TrailingParts(token.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(token: &str) -> NameVersion {
        token.parse().unwrap()
    }

    #[test]
    fn bare_name() {
        let nv = resolve("left-pad");
        assert_eq!(nv.package_name, "left-pad");
        assert_eq!(nv.version, None);
        assert_eq!(nv.sequence_number, None);
        assert_eq!(nv.sequence_name, None);
    }

    #[test]
    fn name_and_version() {
        let cases = [
            ("lodash+4.17.21", "lodash", "4.17.21"),
            ("left-pad+1.2.3", "left-pad", "1.2.3"),
            ("react+16.8.0-alpha.1", "react", "16.8.0-alpha.1"),
        ];

        for (token, name, version) in cases.iter() {
            let nv = resolve(token);
            assert_eq!(&nv.package_name, name);
            assert_eq!(nv.version.as_deref(), Some(*version));
        }
    }

    #[test]
    fn scoped_name_and_version() {
        let nv = resolve("@babel+core+7.0.0");
        assert_eq!(nv.package_name, "@babel/core");
        assert_eq!(nv.version.as_deref(), Some("7.0.0"));
    }

    #[test]
    fn scoped_name_without_version() {
        let nv = resolve("@types+node");
        assert_eq!(nv.package_name, "@types/node");
        assert_eq!(nv.version, None);
    }

    #[test]
    fn unversioned_extra_parts_dropped() {
        // Only the first two parts of an unversioned token are kept.
        let nv = resolve("@scope+name+extra");
        assert_eq!(nv.package_name, "@scope/name");
        assert_eq!(nv.version, None);
    }

    #[test]
    fn sequence_number() {
        let nv = resolve("typescript+3.0.1+2");
        assert_eq!(nv.package_name, "typescript");
        assert_eq!(nv.version.as_deref(), Some("3.0.1"));
        assert_eq!(nv.sequence_number, Some(2));
        assert_eq!(nv.sequence_name, None);
    }

    #[test]
    fn sequence_number_and_name() {
        let nv = resolve("typescript+3.0.1+021+initial");
        assert_eq!(nv.sequence_number, Some(21));
        assert_eq!(nv.sequence_name.as_deref(), Some("initial"));
    }

    #[test]
    fn sequence_number_leading_zeros() {
        let nv = resolve("foo+1.0.0+007");
        assert_eq!(nv.sequence_number, Some(7));
    }

    #[test]
    fn whitespace_trimmed() {
        let nv = resolve(" foo + 1.2.3 ");
        assert_eq!(nv.package_name, "foo");
        assert_eq!(nv.version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn empty_parts_dropped() {
        let nv = resolve("foo++1.2.3");
        assert_eq!(nv.package_name, "foo");
        assert_eq!(nv.version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn version_shape_is_a_prefix_match() {
        let nv = resolve("foo+1.2.3rc1");
        assert_eq!(nv.version.as_deref(), Some("1.2.3rc1"));
    }

    #[test]
    fn single_version_shaped_part_is_a_name() {
        // The single-part case wins before any version scan happens.
        let nv = resolve("1.2.3");
        assert_eq!(nv.package_name, "1.2.3");
        assert_eq!(nv.version, None);
    }

    #[test]
    fn badness() {
        let bad_tokens = [
            "",
            "+",
            " + + ",
            "1.2.3+4",
            "@scope+name+extra+1.0.0",
            "foo+1.0.0+abc",
            "foo+1.0.0+12abc",
            "foo+1.0.0+-2",
            "foo+1.0.0+0",
            "foo+1.0.0+000",
            "foo+1.0.0+1+hotfix+extra",
        ];

        for token in bad_tokens.iter() {
            assert!(token.parse::<NameVersion>().is_err(), "token: `{token}`");
        }
    }
}
