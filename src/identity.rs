//! Storage identity: where a map lives on disk and in which format.

use crate::error::{Error, Result};
use crate::format::Format;
use std::path::{Path, PathBuf};

/// The identity of a persistent map: its logical name, serialization format,
/// and resolved backing-file path.
///
/// Derived from an identifier token of the form `"<name>.<format>"`: exactly
/// one `.`, a name matching `[A-Za-z][A-Za-z0-9_-]*`, and a format tag from
/// the supported set (`yaml`, `json`, `binary`/`pickle`, `xml`, `csv`).
/// Unknown tags degrade to YAML with a logged warning; a malformed token is a
/// hard construction failure.
#[derive(Debug, Clone)]
pub struct StorageIdentity {
    name: String,
    format: Format,
    path: PathBuf,
}

impl StorageIdentity {
    /// Parse `token` and resolve the backing path. An explicit path wins;
    /// otherwise the path is `<working dir>/<name>.<canonical extension>`.
    /// No file I/O happens here, so validation failures occur before the
    /// backing file is ever touched.
    pub fn resolve(token: &str, explicit_path: Option<PathBuf>) -> Result<Self> {
        let (name, tag) = split_token(token)?;
        validate_name(name)?;
        let format = match Format::from_tag(tag) {
            Some(format) => format,
            None => {
                log::warn!("unsupported format {tag:?}, falling back to {}", Format::Yaml);
                Format::Yaml
            }
        };
        let path = match explicit_path {
            Some(path) => path,
            None => {
                let dir = std::env::current_dir().map_err(|e| {
                    Error::Construction(format!("cannot resolve working directory: {e}"))
                })?;
                dir.join(format!("{name}.{format}"))
            }
        };
        Ok(Self {
            name: name.to_string(),
            format,
            path,
        })
    }

    /// The logical name from the identifier token.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The serialization format in effect (after any fallback).
    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    /// The resolved backing-file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Split the token on its single `.` separator.
fn split_token(token: &str) -> Result<(&str, &str)> {
    match token.split_once('.') {
        Some((name, tag)) if !tag.contains('.') => Ok((name, tag)),
        _ => Err(Error::Construction(format!(
            "identifier {token:?} must contain exactly one '.' between name and format"
        ))),
    }
}

/// The logical name must start with a letter and stick to letters, digits,
/// `_` and `-`.
fn validate_name(name: &str) -> Result<()> {
    match name.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => {
            return Err(Error::Construction(format!(
                "logical name {name:?} must start with a letter"
            )))
        }
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '-')
    {
        return Err(Error::Construction(format!(
            "logical name {name:?} contains unsupported character {bad:?}"
        )));
    }
    Ok(())
}
