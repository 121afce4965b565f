use clap::Args;
use eyre::Result;
use genmeta_core::Config;

use super::{GlobalArgs, report_error};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct InfoCommand {}

impl InfoCommand {
    pub fn run(&self, global: &GlobalArgs) -> Result<i32> {
        let config = match Config::load(global.overrides()) {
            Ok(config) => config,
            Err(e) => return Ok(report_error(e)),
        };

        let report = ops::info(&config);
        report.render(&mut TerminalOutput::new());

        Ok(0)
    }
}
