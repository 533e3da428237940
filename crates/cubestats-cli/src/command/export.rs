use std::path::PathBuf;

use clap::Args;

use crate::{command::input::InputArg, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct ExportArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExportArg) -> anyhow::Result<()> {
    let input = arg.input.load()?;
    let report = input.report()?;
    util::write_json(&report, arg.output.as_deref())?;
    Ok(())
}
