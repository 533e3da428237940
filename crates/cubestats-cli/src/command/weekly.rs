use clap::Args;

use crate::{command::input::InputArg, util::fmt_opt};

#[derive(Debug, Clone, Args)]
pub(crate) struct WeeklyArg {
    #[clap(flatten)]
    pub input: InputArg,
}

pub(crate) fn run(arg: &WeeklyArg) -> anyhow::Result<()> {
    let input = arg.input.load()?;
    let report = input.report()?;

    println!("Weekly Performance");
    println!("==================\n");
    println!(
        "  {:<10} {:>8} {:>10} {:>9} {:>10} {:>9}",
        "Week", "Solves", "Median", "Sessions", "Prev", "Change"
    );
    println!("  {}", "-".repeat(61));
    for week in &report.weekly.weeks {
        let delta = week
            .prev_week_median
            .and_then(|prev| cubestats_analysis::weekly::delta_pct(prev, week.median_time_sec));
        println!(
            "  {:<10} {:>8} {:>10.2} {:>9} {:>10} {:>8}%",
            week.week_start.to_string(),
            week.volume,
            week.median_time_sec,
            week.n_sessions,
            fmt_opt(week.prev_week_median, 2),
            fmt_opt(delta, 1)
        );
    }
    println!();
    println!(
        "  {} weeks, {} solves, {} weeks with a previous week",
        report.weekly.weeks.len(),
        report.weekly.total_volume(),
        report.weekly_valid.len()
    );

    match &report.weekly_delta_trend {
        Some(trend) => println!(
            "  Improvement vs volume (weighted): {:+.3}% per 100 solves",
            trend.slope * 100.0
        ),
        None => println!("  Improvement vs volume: not enough data"),
    }
    Ok(())
}
