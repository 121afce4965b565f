use std::{path::PathBuf, time::Duration};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for genmeta operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Exit code when one or more expected outputs are missing.
pub const EXIT_MISSING_OUTPUTS: i32 = -1;
/// Exit code when a cleanup deletion fails, or configuration cannot be loaded.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the generator could not be started or did not finish.
pub const EXIT_GENERATOR: i32 = 2;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(help("pass --config to point at an existing genmeta.toml"))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse genmeta.toml")]
    #[diagnostic(code(genmeta::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to start '{program}': {source}")]
    #[diagnostic(
        code(genmeta::spawn),
        help("check the EXTERNALS environment variable or pass --externals")
    )]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {}s", .timeout.as_secs())]
    #[diagnostic(code(genmeta::timeout))]
    TimedOut { program: PathBuf, timeout: Duration },

    #[error("missing expected output{}: {}", plural(.missing.len()), display_paths(.missing))]
    #[diagnostic(code(genmeta::missing_outputs))]
    MissingOutputs { missing: Vec<PathBuf> },

    #[error("failed to remove '{path}': {source}")]
    #[diagnostic(code(genmeta::cleanup))]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a parse error from a toml error with source context
    pub fn parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Process exit code reported to the calling build script.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingOutputs { .. } => EXIT_MISSING_OUTPUTS,
            Error::Spawn { .. } | Error::TimedOut { .. } => EXIT_GENERATOR,
            Error::Cleanup { .. } | Error::Io { .. } | Error::Parse { .. } => EXIT_FAILURE,
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
