//! Info command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data for the resolved configuration.
#[derive(Debug)]
pub struct InfoReport {
    /// Externals root.
    pub externals: PathBuf,
    /// Where the externals root came from.
    pub externals_source: String,
    /// Manifest the layout was read from.
    pub manifest_path: Option<PathBuf>,
    /// Generator working directory.
    pub project_dir: PathBuf,
    /// Generator executable.
    pub tool: PathStatus,
    /// Full command line.
    pub command: String,
    /// Expected outputs.
    pub expected: Vec<PathStatus>,
    /// Cleanup set.
    pub cleanup: Vec<PathStatus>,
}

/// A configured path and whether it currently exists.
#[derive(Debug)]
pub struct PathStatus {
    pub path: PathBuf,
    pub exists: bool,
}

impl PathStatus {
    fn describe(&self) -> String {
        let state = if self.exists { "present" } else { "missing" };
        format!("{} ({})", self.path.display(), state)
    }
}

impl Report for InfoReport {
    fn render(&self, out: &mut dyn Output) {
        out.title("gen-metadata");
        out.key_value(
            "Externals",
            &format!("{} [{}]", self.externals.display(), self.externals_source),
        );
        let manifest = self
            .manifest_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string());
        out.key_value("Manifest", &manifest);
        out.key_value("Project", &self.project_dir.display().to_string());
        out.key_value("Tool", &self.tool.describe());
        out.newline();

        out.section("Command");
        out.list_item(&self.command);
        out.newline();

        out.section("Expected outputs");
        for status in &self.expected {
            out.list_item(&status.describe());
        }
        out.newline();

        out.section("Cleanup");
        if self.cleanup.is_empty() {
            out.list_item("(none)");
        }
        for status in &self.cleanup {
            out.list_item(&status.describe());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::StringOutput;

    #[test]
    fn test_render() {
        let report = InfoReport {
            externals: PathBuf::from("/opt/tools"),
            externals_source: "$EXTERNALS".to_string(),
            manifest_path: None,
            project_dir: PathBuf::from("."),
            tool: PathStatus {
                path: PathBuf::from("/opt/tools/GenMetadata/gen-metadata"),
                exists: true,
            },
            command: "/opt/tools/GenMetadata/gen-metadata --no-report src --output generated"
                .to_string(),
            expected: vec![
                PathStatus {
                    path: PathBuf::from("generated/type_db.cpp"),
                    exists: true,
                },
                PathStatus {
                    path: PathBuf::from("generated/type_db.h"),
                    exists: false,
                },
            ],
            cleanup: vec![],
        };

        let mut out = StringOutput::default();
        report.render(&mut out);

        insta::assert_snapshot!(out.0, @r"
        gen-metadata
        ============
        Externals: /opt/tools [$EXTERNALS]
        Manifest: (defaults)
        Project: .
        Tool: /opt/tools/GenMetadata/gen-metadata (present)

        Command:
          - /opt/tools/GenMetadata/gen-metadata --no-report src --output generated

        Expected outputs:
          - generated/type_db.cpp (present)
          - generated/type_db.h (missing)

        Cleanup:
          - (none)
        ");
    }
}
