//! Info operation - resolved configuration.

use std::path::Path;

use genmeta_core::{Config, Runner};

use crate::reports::{InfoReport, PathStatus};

/// Execute the info operation.
///
/// Collects the resolved configuration and checks which files exist. Never
/// starts the generator.
pub fn info(config: &Config) -> InfoReport {
    let runner = Runner::new(config);

    InfoReport {
        externals: config.externals.clone(),
        externals_source: config.externals_source.to_string(),
        manifest_path: config.manifest_path.clone(),
        project_dir: config.project_dir.clone(),
        tool: status_of(config, &config.tool),
        command: runner.command().to_string(),
        expected: config
            .expected
            .iter()
            .map(|p| status_of(config, p))
            .collect(),
        cleanup: config
            .cleanup
            .iter()
            .map(|p| status_of(config, p))
            .collect(),
    }
}

fn status_of(config: &Config, path: &Path) -> PathStatus {
    PathStatus {
        path: path.to_path_buf(),
        exists: config.project_path(path).exists(),
    }
}
