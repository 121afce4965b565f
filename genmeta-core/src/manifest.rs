//! `genmeta.toml` parsing.
//!
//! Every key is optional. Absent keys fall back to the layout the engine
//! build has always used, so a project without a manifest behaves exactly
//! like one with an empty manifest.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Default manifest filename, looked up in the project directory.
pub const MANIFEST_FILENAME: &str = "genmeta.toml";

/// Token that expands to the resolved externals root.
pub const EXTERNALS_TOKEN: &str = "{externals}";

/// Generator layout as written in `genmeta.toml`.
///
/// Path values are templates: a leading `{externals}` is replaced by the
/// externals root during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Externals root, lower precedence than the flag and `EXTERNALS`.
    pub externals: Option<PathBuf>,
    /// Generator executable.
    pub tool: String,
    /// Source directories scanned by the generator.
    pub sources: Vec<String>,
    /// Include directories, passed as `-i <dir>` in order.
    pub includes: Vec<String>,
    /// Directory the generator writes into.
    pub output: String,
    /// Files that must exist after generation.
    pub expected: Vec<String>,
    /// Leftover files removed after a successful generation.
    pub cleanup: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            externals: None,
            tool: format!(
                "{EXTERNALS_TOKEN}/GenMetadata/gen-metadata{}",
                std::env::consts::EXE_SUFFIX
            ),
            sources: strings(&["src", "mathlib", "{externals}/GenMetadata/include"]),
            includes: strings(&[
                "generated",
                "{externals}/SDL2-2.0.5/include",
                "{externals}/GLAD/include",
            ]),
            output: "generated".to_string(),
            expected: strings(&["generated/type_db.cpp", "generated/type_db.h"]),
            cleanup: strings(&["main.h"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A genmeta.toml file and the manifest parsed from it.
pub struct GenmetaToml {
    path: PathBuf,
    manifest: Manifest,
}

impl GenmetaToml {
    /// Open and parse a genmeta.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = parse_str_with_filename(&content, &filename)?;

        Ok(Self { path, manifest })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

/// Parse a genmeta.toml from a string (uses "genmeta.toml" as default filename)
pub fn parse_str(content: &str) -> Result<Manifest> {
    parse_str_with_filename(content, MANIFEST_FILENAME)
}

/// Parse a genmeta.toml from a string with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<Manifest> {
    toml::from_str(content).map_err(|e| Error::parse(e, content, filename))
}
