use clap::Args;
use cubestats_analysis::trend::TrendLine;

use crate::{
    command::input::InputArg,
    util::{fmt_opt, fmt_pct},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SessionsArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Sub-X threshold in seconds for session probabilities
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Smallest session size used for trends
    #[arg(long)]
    pub min_size: Option<usize>,

    /// Only list the most recent sessions
    #[arg(long)]
    pub last: Option<usize>,
}

pub(crate) fn run(arg: &SessionsArg) -> anyhow::Result<()> {
    let input = arg.input.load_with(|config| {
        if let Some(threshold) = arg.threshold {
            config.sub_x_threshold = threshold;
        }
        if let Some(min_size) = arg.min_size {
            config.min_session_size = min_size;
        }
    })?;
    let report = input.report()?;
    let threshold = input.config.sub_x_threshold;

    let skip = arg
        .last
        .map_or(0, |last| report.sessions.len().saturating_sub(last));

    println!("Sessions ({} total)", report.sessions.len());
    println!(
        "  {:>6} {:<19} {:<19} {:>6} {:>9} {:>9}",
        "ID",
        "Start",
        "End",
        "Size",
        "Mean",
        format!("Sub {threshold}s")
    );
    println!("  {}", "-".repeat(73));
    for session in report.sessions.iter().skip(skip) {
        println!(
            "  {:>6} {:<19} {:<19} {:>6} {:>9.2} {:>9}",
            session.session_id,
            session.start.format("%Y-%m-%d %H:%M:%S").to_string(),
            session.end.format("%Y-%m-%d %H:%M:%S").to_string(),
            session.size,
            session.mean_time_sec,
            fmt_pct(session.subx_probability)
        );
    }
    println!();

    println!(
        "Trends over {} sessions with at least {} solves",
        report.sized_sessions.len(),
        input.config.min_session_size
    );
    print_trend("Mean time vs size", report.size_vs_mean_trend.as_ref(), "s");
    print_trend(
        &format!("Sub {threshold}s probability vs size (weighted)"),
        report.size_vs_sub_x_trend.as_ref(),
        "",
    );
    Ok(())
}

fn print_trend(name: &str, trend: Option<&TrendLine>, unit: &str) {
    let Some(trend) = trend else {
        println!("  {name}: not enough data");
        return;
    };
    let first = trend.samples.first().map(|s| s.y);
    let last = trend.samples.last().map(|s| s.y);
    println!(
        "  {name}: slope {:+.4}{unit} per solve ({}{unit} -> {}{unit})",
        trend.slope,
        fmt_opt(first, 3),
        fmt_opt(last, 3)
    );
}
