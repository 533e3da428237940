use clap::Args;

use crate::{command::input::InputArg, util::fmt_opt};

#[derive(Debug, Clone, Args)]
pub(crate) struct StructureArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Number of weekly volume tiers
    #[arg(long)]
    pub volume_q: Option<usize>,

    /// Number of weekly fragmentation tiers (at most 3)
    #[arg(long)]
    pub session_q: Option<usize>,
}

pub(crate) fn run(arg: &StructureArg) -> anyhow::Result<()> {
    let input = arg.input.load_with(|config| {
        if let Some(volume_q) = arg.volume_q {
            config.volume_q = volume_q;
        }
        if let Some(session_q) = arg.session_q {
            config.session_q = session_q;
        }
    })?;
    let report = input.report()?;
    let structure = &report.structure;

    println!("Training Structure");
    println!("==================\n");
    if structure.weeks.is_empty() {
        println!("  Not enough weeks (need at least two weeks with solves)");
        return Ok(());
    }

    println!(
        "  {:<10} {:>8} {:>9} {:>8}  {:<14} {:<16}",
        "Week", "Solves", "Sessions", "Change", "Volume", "Fragmentation"
    );
    println!("  {}", "-".repeat(70));
    for week in &structure.weeks {
        println!(
            "  {:<10} {:>8} {:>9} {:>7}%  {:<14} {:<16}",
            week.week.week_start.to_string(),
            week.week.volume,
            week.week.n_sessions,
            fmt_opt(week.week.delta_pct, 1),
            week.volume_bin.to_string(),
            week.session_bin.to_string()
        );
    }
    println!();

    println!("Mean weekly change by volume and fragmentation");
    let header = structure
        .session_bins
        .iter()
        .map(|bin| format!("{:>18}", bin.to_string()))
        .collect::<String>();
    println!("  {:<14}{header}", "");
    let cells = report.cross_tab.as_slice();
    for volume_bin in &structure.volume_bins {
        let row = cells
            .iter()
            .filter(|cell| cell.volume_bin == *volume_bin)
            .map(|cell| {
                let value = format!("{}% (n={})", fmt_opt(cell.mean_delta_pct, 1), cell.weeks);
                format!("{value:>18}")
            })
            .collect::<String>();
        println!("  {:<14}{row}", volume_bin.to_string());
    }
    Ok(())
}
