mod completions;
mod info;
mod run;

use std::{io::IsTerminal, path::PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use genmeta_core::Overrides;
use info::InfoCommand;
use run::RunCommand;

/// Print a configuration error with pretty formatting and return its exit code.
pub(crate) fn report_error(err: Box<genmeta_core::Error>) -> i32 {
    let code = err.exit_code();
    eprintln!("{:?}", miette::Report::new(*err));
    code
}

#[derive(Parser)]
#[command(name = "genmeta")]
#[command(version)]
#[command(about = "Run the gen-metadata reflection generator and tidy up after it")]
pub(crate) struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.global.verbose
    }

    /// Run the selected command and return the process exit code.
    pub fn run(&self) -> Result<i32> {
        match &self.command {
            Some(Commands::Run(cmd)) => cmd.run(&self.global),
            Some(Commands::Info(cmd)) => cmd.run(&self.global),
            Some(Commands::Completions(cmd)) => cmd.run(),
            None => RunCommand::default().run(&self.global),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the generator, verify its outputs and remove leftovers (default)
    Run(RunCommand),

    /// Show the resolved configuration without running anything
    Info(InfoCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Project directory the generator runs in
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Path to genmeta.toml (defaults to <DIR>/genmeta.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Externals root (overrides $EXTERNALS and genmeta.toml)
    #[arg(long, global = true, value_name = "DIR")]
    pub externals: Option<PathBuf>,

    /// Disable coloured status output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl GlobalArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            project_dir: self.dir.clone(),
            manifest: self.config.clone(),
            externals: self.externals.clone(),
            timeout: None,
        }
    }

    /// Whether status indicators should be coloured.
    pub fn color(&self) -> bool {
        !self.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal()
    }
}
