use std::path::PathBuf;

use semver::Version;

use crate::error::{DocketError, Result};

/// The entrypoint portion of a module reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Entrypoint {
    /// A filesystem path to a package directory or a Rust source file.
    Path(PathBuf),
    /// A package or module name, optionally pinned to a version.
    Name {
        /// Bare name of the package or module.
        name: String,
        /// Version requested with `name@version`, if any.
        version: Option<Version>,
    },
}

/// A parsed module reference.
///
/// A module reference names a unit of code to document. It consists of an
/// entrypoint and an optional module path, with components separated by `::`:
///
/// ```text
/// entrypoint[::path]
/// ```
///
/// The entrypoint is one of:
///
/// - a path to a package directory or Rust file (`./`, `crates/mylib`),
/// - a workspace member or dependency name (`mylib`),
/// - a registry package name, optionally versioned (`serde`, `serde@1.0.104`).
///
/// The trailing path selects a module within the entrypoint, so
/// `mylib::services` documents only the `services` subtree of `mylib`.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Where documentation generation starts.
    pub entrypoint: Entrypoint,
    /// Module path components scoping the output, possibly empty.
    pub path: Vec<String>,
}

impl Target {
    /// Parse a module reference from its textual form.
    pub fn parse(spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(DocketError::InvalidTarget(
                "empty module reference".to_string(),
            ));
        }

        let mut components = spec.split("::");
        let entry = components.next().unwrap_or_default();
        if entry.is_empty() {
            return Err(DocketError::InvalidTarget(format!(
                "missing entrypoint in {spec:?}"
            )));
        }

        let path: Vec<String> = components
            .map(|component| {
                if component.is_empty() {
                    Err(DocketError::InvalidTarget(format!(
                        "empty path component in {spec:?}"
                    )))
                } else {
                    Ok(component.to_string())
                }
            })
            .collect::<Result<_>>()?;

        let entrypoint = if looks_like_path(entry) {
            Entrypoint::Path(PathBuf::from(entry))
        } else if let Some((name, version)) = entry.split_once('@') {
            if name.is_empty() {
                return Err(DocketError::InvalidTarget(format!(
                    "missing package name in {entry:?}"
                )));
            }
            let version =
                Version::parse(version).map_err(|e| DocketError::InvalidVersion(e.to_string()))?;
            Entrypoint::Name {
                name: name.to_string(),
                version: Some(version),
            }
        } else {
            Entrypoint::Name {
                name: entry.to_string(),
                version: None,
            }
        };

        Ok(Self { entrypoint, path })
    }
}

/// Entrypoints containing separators or dot-relative prefixes are paths.
fn looks_like_path(entry: &str) -> bool {
    entry.contains('/') || entry.contains('\\') || entry == "." || entry == ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name(name: &str) -> Entrypoint {
        Entrypoint::Name {
            name: name.to_string(),
            version: None,
        }
    }

    #[test]
    fn parse_accepts_valid_references() {
        let cases = vec![
            (
                "./",
                Target {
                    entrypoint: Entrypoint::Path(PathBuf::from("./")),
                    path: vec![],
                },
            ),
            (
                ".",
                Target {
                    entrypoint: Entrypoint::Path(PathBuf::from(".")),
                    path: vec![],
                },
            ),
            (
                "crates/mylib",
                Target {
                    entrypoint: Entrypoint::Path(PathBuf::from("crates/mylib")),
                    path: vec![],
                },
            ),
            (
                "crates/mylib::services",
                Target {
                    entrypoint: Entrypoint::Path(PathBuf::from("crates/mylib")),
                    path: vec!["services".to_string()],
                },
            ),
            (
                "mylib",
                Target {
                    entrypoint: name("mylib"),
                    path: vec![],
                },
            ),
            (
                "mylib::services::draw",
                Target {
                    entrypoint: name("mylib"),
                    path: vec!["services".to_string(), "draw".to_string()],
                },
            ),
            (
                "serde@1.0.104",
                Target {
                    entrypoint: Entrypoint::Name {
                        name: "serde".to_string(),
                        version: Some(Version::parse("1.0.104").unwrap()),
                    },
                    path: vec![],
                },
            ),
            (
                "serde@1.0.104::de",
                Target {
                    entrypoint: Entrypoint::Name {
                        name: "serde".to_string(),
                        version: Some(Version::parse("1.0.104").unwrap()),
                    },
                    path: vec!["de".to_string()],
                },
            ),
            (
                "tracing-subscriber",
                Target {
                    entrypoint: name("tracing-subscriber"),
                    path: vec![],
                },
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(Target::parse(input).unwrap(), expected, "input: {input}");
        }
    }

    #[test]
    fn parse_rejects_malformed_references() {
        let cases = vec![
            "",
            "::",
            "::mylib",
            "mylib::",
            "mylib::::services",
            "serde@",
            "serde@not-a-version",
            "@1.0.0",
        ];

        for input in cases {
            let result = Target::parse(input);
            assert!(
                matches!(
                    result,
                    Err(DocketError::InvalidTarget(_) | DocketError::InvalidVersion(_))
                ),
                "expected parse failure for {input:?}, got {result:?}"
            );
        }
    }
}
