//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod info;
mod output;

pub use info::{InfoReport, PathStatus};
pub use output::{Report, TerminalOutput};
