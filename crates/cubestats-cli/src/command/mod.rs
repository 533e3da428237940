use clap::{Parser, Subcommand};

use self::{
    export::ExportArg, sessions::SessionsArg, structure::StructureArg, sub_x::SubXArg,
    summary::SummaryArg, weekly::WeeklyArg,
};

mod export;
mod input;
mod sessions;
mod structure;
mod sub_x;
mod summary;
mod weekly;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to report
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Headline metrics, hourly and weekday means, time distribution
    Summary(#[clap(flatten)] SummaryArg),
    /// Per-session statistics and session trends
    Sessions(#[clap(flatten)] SessionsArg),
    /// Weekly volume, median and week-over-week change
    Weekly(#[clap(flatten)] WeeklyArg),
    /// Weekly volume and fragmentation tiers
    Structure(#[clap(flatten)] StructureArg),
    /// Sub-X counts and rolling sub-X probability
    SubX(#[clap(flatten)] SubXArg),
    /// Write every derived output as JSON
    Export(#[clap(flatten)] ExportArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Sessions(arg) => sessions::run(&arg)?,
        Mode::Weekly(arg) => weekly::run(&arg)?,
        Mode::Structure(arg) => structure::run(&arg)?,
        Mode::SubX(arg) => sub_x::run(&arg)?,
        Mode::Export(arg) => export::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_cli_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_shared_flags() {
        let args = CommandArgs::try_parse_from([
            "cubestats",
            "weekly",
            "log.csv",
            "--from",
            "01/02/2024",
            "--to",
            "2024-03-31",
            "--gap",
            "600",
            "--exclude-unparsed",
        ])
        .unwrap();
        let Mode::Weekly(arg) = args.mode else {
            panic!("expected weekly mode");
        };
        assert_eq!(arg.input.from.unwrap().to_string(), "2024-02-01");
        assert_eq!(arg.input.to.unwrap().to_string(), "2024-03-31");
        assert_eq!(arg.input.gap, Some(600.0));
        assert!(arg.input.exclude_unparsed);
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result =
            CommandArgs::try_parse_from(["cubestats", "summary", "log.csv", "--from", "yesterday"]);
        assert!(result.is_err());
    }
}
