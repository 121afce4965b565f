//! Configuration resolution.
//!
//! Combines command-line overrides, the `EXTERNALS` environment variable and
//! an optional `genmeta.toml` into a fully resolved [`Config`].

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    Result,
    manifest::{EXTERNALS_TOKEN, GenmetaToml, MANIFEST_FILENAME, Manifest},
};

/// Environment variable naming the externals root.
pub const EXTERNALS_ENV: &str = "EXTERNALS";

/// Externals root used when nothing else supplies one.
#[cfg(windows)]
pub const DEFAULT_EXTERNALS_ROOT: &str = r"C:\Home\Workspace\Externals";
#[cfg(not(windows))]
pub const DEFAULT_EXTERNALS_ROOT: &str = "/opt/externals";

/// Where the externals root came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalsSource {
    Flag,
    Environment,
    Manifest,
    Default,
}

impl fmt::Display for ExternalsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalsSource::Flag => write!(f, "--externals"),
            ExternalsSource::Environment => write!(f, "${EXTERNALS_ENV}"),
            ExternalsSource::Manifest => write!(f, "{MANIFEST_FILENAME}"),
            ExternalsSource::Default => write!(f, "default"),
        }
    }
}

/// Pick the externals root.
///
/// Precedence is flag, then environment, then manifest, then the platform
/// default. Empty environment values are treated as unset.
pub fn resolve_externals<F>(
    flag: Option<&Path>,
    lookup: F,
    manifest: Option<&Path>,
) -> (PathBuf, ExternalsSource)
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(path) = flag {
        return (path.to_path_buf(), ExternalsSource::Flag);
    }
    if let Some(value) = lookup(EXTERNALS_ENV).filter(|v| !v.is_empty()) {
        return (PathBuf::from(value), ExternalsSource::Environment);
    }
    if let Some(path) = manifest {
        return (path.to_path_buf(), ExternalsSource::Manifest);
    }
    (
        PathBuf::from(DEFAULT_EXTERNALS_ROOT),
        ExternalsSource::Default,
    )
}

/// Expand a layout template against the externals root.
pub fn expand(template: &str, externals: &Path) -> PathBuf {
    match template.strip_prefix(EXTERNALS_TOKEN) {
        Some(rest) => rest
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .fold(externals.to_path_buf(), |acc, part| acc.join(part)),
        None => PathBuf::from(template),
    }
}

/// Caller-supplied overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Project directory; the generator runs here.
    pub project_dir: Option<PathBuf>,
    /// Explicit manifest path. Unlike the implicit one, it must exist.
    pub manifest: Option<PathBuf>,
    /// Externals root.
    pub externals: Option<PathBuf>,
    /// Maximum time to wait for the generator.
    pub timeout: Option<Duration>,
}

/// Fully resolved configuration for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub externals: PathBuf,
    pub externals_source: ExternalsSource,
    /// Working directory of the generator; relative expected and cleanup
    /// paths are resolved against it.
    pub project_dir: PathBuf,
    /// Manifest the layout was read from, if any.
    pub manifest_path: Option<PathBuf>,
    pub tool: PathBuf,
    pub sources: Vec<PathBuf>,
    pub includes: Vec<PathBuf>,
    pub output: PathBuf,
    pub expected: Vec<PathBuf>,
    pub cleanup: Vec<PathBuf>,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn load(overrides: Overrides) -> Result<Self> {
        Self::load_with(overrides, |key| std::env::var_os(key))
    }

    /// Resolve configuration with an injected environment lookup.
    pub fn load_with<F>(overrides: Overrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let project_dir = overrides
            .project_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));

        let file = match &overrides.manifest {
            Some(path) => Some(GenmetaToml::open(path)?),
            None => {
                let implicit = project_dir.join(MANIFEST_FILENAME);
                if implicit.is_file() {
                    Some(GenmetaToml::open(&implicit)?)
                } else {
                    None
                }
            }
        };
        let manifest = file
            .as_ref()
            .map(|f| f.manifest().clone())
            .unwrap_or_default();
        let manifest_path = file.as_ref().map(|f| f.path().to_path_buf());

        let mut config = Self::from_manifest(&manifest, &overrides, lookup);
        config.manifest_path = manifest_path;
        Ok(config)
    }

    /// Build configuration from an already parsed manifest.
    pub fn from_manifest<F>(manifest: &Manifest, overrides: &Overrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let (externals, externals_source) = resolve_externals(
            overrides.externals.as_deref(),
            lookup,
            manifest.externals.as_deref(),
        );
        let expand_all = |templates: &[String]| -> Vec<PathBuf> {
            templates.iter().map(|t| expand(t, &externals)).collect()
        };

        Self {
            tool: expand(&manifest.tool, &externals),
            sources: expand_all(&manifest.sources),
            includes: expand_all(&manifest.includes),
            output: expand(&manifest.output, &externals),
            expected: expand_all(&manifest.expected),
            cleanup: expand_all(&manifest.cleanup),
            project_dir: overrides
                .project_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            manifest_path: None,
            timeout: overrides.timeout,
            externals,
            externals_source,
        }
    }

    /// Resolve a configured path against the project directory.
    pub fn project_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::Error;

    fn no_env(_: &str) -> Option<OsString> {
        None
    }

    #[test]
    fn test_default_root_when_nothing_set() {
        let (root, source) = resolve_externals(None, no_env, None);
        assert_eq!(root, PathBuf::from(DEFAULT_EXTERNALS_ROOT));
        assert_eq!(source, ExternalsSource::Default);
    }

    #[test]
    fn test_env_beats_manifest() {
        let env = |key: &str| (key == EXTERNALS_ENV).then(|| OsString::from("/opt/tools"));
        let (root, source) = resolve_externals(None, env, Some(Path::new("/from/file")));
        assert_eq!(root, PathBuf::from("/opt/tools"));
        assert_eq!(source, ExternalsSource::Environment);
    }

    #[test]
    fn test_flag_beats_env() {
        let env = |_: &str| Some(OsString::from("/opt/tools"));
        let (root, source) = resolve_externals(Some(Path::new("/flag")), env, None);
        assert_eq!(root, PathBuf::from("/flag"));
        assert_eq!(source, ExternalsSource::Flag);
    }

    #[test]
    fn test_empty_env_is_unset() {
        let env = |_: &str| Some(OsString::new());
        let (_, source) = resolve_externals(None, env, Some(Path::new("/from/file")));
        assert_eq!(source, ExternalsSource::Manifest);
    }

    #[test]
    #[cfg(unix)]
    fn test_expand_joins_onto_root() {
        let root = Path::new("/opt/tools");
        assert_eq!(
            expand("{externals}/SDL2-2.0.5/include", root),
            root.join("SDL2-2.0.5").join("include")
        );
        assert_eq!(expand("generated", root), PathBuf::from("generated"));
        assert_eq!(expand("{externals}", root), root.to_path_buf());
    }

    #[test]
    #[cfg(unix)]
    fn test_from_manifest_expands_defaults() {
        let env = |_: &str| Some(OsString::from("/opt/tools"));
        let config = Config::from_manifest(&Manifest::default(), &Overrides::default(), env);

        assert!(config.tool.starts_with("/opt/tools"));
        assert_eq!(
            config.sources,
            vec![
                PathBuf::from("src"),
                PathBuf::from("mathlib"),
                PathBuf::from("/opt/tools/GenMetadata/include"),
            ]
        );
        assert_eq!(
            config.includes,
            vec![
                PathBuf::from("generated"),
                PathBuf::from("/opt/tools/SDL2-2.0.5/include"),
                PathBuf::from("/opt/tools/GLAD/include"),
            ]
        );
        assert_eq!(config.output, PathBuf::from("generated"));
        assert_eq!(config.cleanup, vec![PathBuf::from("main.h")]);
    }

    #[test]
    fn test_load_reads_implicit_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(MANIFEST_FILENAME),
            "externals = \"/from/file\"\ncleanup = [\"leftover.h\"]\n",
        )
        .unwrap();

        let overrides = Overrides {
            project_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let config = Config::load_with(overrides, no_env).unwrap();

        assert_eq!(config.externals, PathBuf::from("/from/file"));
        assert_eq!(config.externals_source, ExternalsSource::Manifest);
        assert_eq!(config.cleanup, vec![PathBuf::from("leftover.h")]);
        assert_eq!(
            config.manifest_path,
            Some(temp.path().join(MANIFEST_FILENAME))
        );
    }

    #[test]
    fn test_load_without_manifest_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let overrides = Overrides {
            project_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let config = Config::load_with(overrides, no_env).unwrap();

        assert_eq!(config.manifest_path, None);
        assert_eq!(config.externals_source, ExternalsSource::Default);
    }

    #[test]
    fn test_load_explicit_missing_manifest_fails() {
        let temp = TempDir::new().unwrap();
        let overrides = Overrides {
            manifest: Some(temp.path().join("missing.toml")),
            ..Default::default()
        };
        let err = Config::load_with(overrides, no_env).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_project_path_keeps_absolute() {
        let config = Config::from_manifest(
            &Manifest::default(),
            &Overrides {
                project_dir: Some(PathBuf::from("/work")),
                ..Default::default()
            },
            no_env,
        );
        assert_eq!(
            config.project_path(Path::new("main.h")),
            PathBuf::from("/work/main.h")
        );
        assert_eq!(
            config.project_path(Path::new("/tmp/x.h")),
            PathBuf::from("/tmp/x.h")
        );
    }
}
