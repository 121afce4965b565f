//! Generator runner.
//!
//! One run is strictly sequential: run the generator, check the expected
//! outputs, remove the cleanup set. Either check failing ends the run with an
//! error whose [`Error::exit_code`](crate::Error::exit_code) the caller turns
//! into the process exit status.

use std::{path::PathBuf, process::ExitStatus};

use crate::{
    Config, Error, Result,
    command::GeneratorCommand,
    process::{self, ProcessOutput},
    reporter::Reporter,
};

/// What a successful run did.
#[derive(Debug)]
pub struct RunSummary {
    /// The command line shown on the status line.
    pub command: String,
    /// The generator's own exit status. It does not decide success.
    pub generator_status: ExitStatus,
    /// Files removed during cleanup, in order.
    pub removed: Vec<PathBuf>,
}

pub struct Runner<'a> {
    config: &'a Config,
    command: GeneratorCommand,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            command: GeneratorCommand::from_config(config),
        }
    }

    pub fn command(&self) -> &GeneratorCommand {
        &self.command
    }

    /// Run the generator, verify its outputs and clean up.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<RunSummary> {
        let command = self.command.to_string();
        tracing::debug!(%command, cwd = %self.config.project_dir.display(), "running generator");

        reporter.begin(&format!("Generating metadata ({})... ", command));
        let output = match process::execute(
            &self.command,
            &self.config.project_dir,
            self.config.timeout,
        ) {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(error = %e, "generator did not run");
                reporter.failure();
                reporter.detail(&e.to_string());
                return Err(e);
            }
        };
        log_output(&output);

        // Only the indicator goes to the console; the paths are logged.
        if let Err(e) = self.verify_outputs() {
            tracing::error!(error = %e, "generation failed");
            reporter.failure();
            return Err(e);
        }
        reporter.success();

        reporter.begin("Cleaning up... ");
        let removed = match self.cleanup() {
            Ok(removed) => removed,
            Err(e) => {
                reporter.failure();
                reporter.detail(&e.to_string());
                return Err(e);
            }
        };
        reporter.success();

        Ok(RunSummary {
            command,
            generator_status: output.status,
            removed,
        })
    }

    /// Check that every expected output exists.
    pub fn verify_outputs(&self) -> Result<()> {
        let missing: Vec<PathBuf> = self
            .config
            .expected
            .iter()
            .filter(|path| !self.config.project_path(path).exists())
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?missing, "expected outputs missing");
            Err(Box::new(Error::MissingOutputs { missing }))
        }
    }

    /// Remove the cleanup set in order, stopping at the first failure.
    pub fn cleanup(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::with_capacity(self.config.cleanup.len());
        for path in &self.config.cleanup {
            std::fs::remove_file(self.config.project_path(path)).map_err(|source| {
                Box::new(Error::Cleanup {
                    path: path.clone(),
                    source,
                })
            })?;
            tracing::debug!(path = %path.display(), "removed");
            removed.push(path.clone());
        }
        Ok(removed)
    }
}

fn log_output(output: &ProcessOutput) {
    if !output.status.success() {
        tracing::warn!(status = %output.status, "generator exited unsuccessfully");
    }
    if !output.stdout.is_empty() {
        tracing::debug!(target: "genmeta::generator", stdout = %output.stdout.trim_end());
    }
    if !output.stderr.is_empty() {
        tracing::debug!(target: "genmeta::generator", stderr = %output.stderr.trim_end());
    }
}
