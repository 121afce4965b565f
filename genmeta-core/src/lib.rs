//! Core of the gen-metadata build step.
//!
//! Resolves where the external generator lives, runs it, checks that the
//! type database it produces is in place and removes the header it leaves
//! behind.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod command;
pub mod config;
mod error;
pub mod manifest;
pub mod process;
pub mod reporter;
pub mod runner;

pub use command::GeneratorCommand;
pub use config::{Config, ExternalsSource, Overrides};
pub use error::{EXIT_FAILURE, EXIT_GENERATOR, EXIT_MISSING_OUTPUTS, Error, Result};
pub use manifest::{GenmetaToml, Manifest};
pub use reporter::{RecordingReporter, Reporter, TerminalReporter};
pub use runner::{RunSummary, Runner};
