//! Generator command line.

use std::{
    ffi::OsString,
    fmt,
    path::{Path, PathBuf},
};

use crate::Config;

/// Disables the generator's own report file.
pub const NO_REPORT_FLAG: &str = "--no-report";
pub const INCLUDE_FLAG: &str = "-i";
pub const OUTPUT_FLAG: &str = "--output";

/// Program and argument vector for one generator invocation.
///
/// Shape: `<tool> --no-report <source>... (-i <include>)... --output <output>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl GeneratorCommand {
    pub fn from_config(config: &Config) -> Self {
        let mut args: Vec<OsString> = vec![NO_REPORT_FLAG.into()];
        args.extend(config.sources.iter().map(|s| s.as_os_str().to_owned()));
        for include in &config.includes {
            args.push(INCLUDE_FLAG.into());
            args.push(include.as_os_str().to_owned());
        }
        args.push(OUTPUT_FLAG.into());
        args.push(config.output.as_os_str().to_owned());

        Self {
            program: config.tool.clone(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Create a `std::process::Command` for this invocation.
    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for GeneratorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_arg(f, &self.program.to_string_lossy())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_arg(f, &arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn write_arg(f: &mut fmt::Formatter<'_>, arg: &str) -> fmt::Result {
    if arg.chars().any(char::is_whitespace) {
        write!(f, "\"{}\"", arg)
    } else {
        f.write_str(arg)
    }
}
