use std::time::Duration;

use clap::Args;
use eyre::Result;
use genmeta_core::{Config, Runner, TerminalReporter};

use super::{GlobalArgs, report_error};

#[derive(Args, Default)]
pub struct RunCommand {
    /// Give up on the generator after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

impl RunCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<i32> {
        let mut overrides = global.overrides();
        overrides.timeout = self.timeout.map(Duration::from_secs);

        let config = match Config::load(overrides) {
            Ok(config) => config,
            Err(e) => return Ok(report_error(e)),
        };
        tracing::debug!(
            externals = %config.externals.display(),
            source = %config.externals_source,
            "resolved externals root"
        );

        let mut reporter = TerminalReporter::stdout(global.color());
        match Runner::new(&config).run(&mut reporter) {
            Ok(summary) => {
                tracing::info!(
                    status = %summary.generator_status,
                    removed = summary.removed.len(),
                    "metadata generated"
                );
                Ok(0)
            }
            // The reporter has already printed the failure.
            Err(e) => Ok(e.exit_code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::commands::Cli;

    fn global_for(dir: &Path, extra: &[&str]) -> GlobalArgs {
        let mut args = vec!["genmeta", "-C", dir.to_str().unwrap(), "--no-color"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap().global
    }

    #[test]
    fn test_broken_manifest_exits_with_failure() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("genmeta.toml"), "sources = [").unwrap();
        std::fs::write(temp.path().join("main.h"), "").unwrap();

        let code = RunCommand::default()
            .run(&global_for(temp.path(), &[]))
            .unwrap();

        assert_eq!(code, genmeta_core::EXIT_FAILURE);
        assert!(temp.path().join("main.h").exists());
    }

    #[test]
    fn test_missing_explicit_manifest_exits_with_failure() {
        let temp = TempDir::new().unwrap();
        let global = global_for(temp.path(), &["--config", "nope.toml"]);

        assert_eq!(
            RunCommand::default().run(&global).unwrap(),
            genmeta_core::EXIT_FAILURE
        );
    }

    #[test]
    fn test_unreachable_generator_exits_with_generator_code() {
        let temp = TempDir::new().unwrap();
        let externals = TempDir::new().unwrap();
        let global = global_for(
            temp.path(),
            &["--externals", externals.path().to_str().unwrap()],
        );

        assert_eq!(
            RunCommand::default().run(&global).unwrap(),
            genmeta_core::EXIT_GENERATOR
        );
    }
}
