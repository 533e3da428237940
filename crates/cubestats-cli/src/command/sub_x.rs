use clap::Args;

use crate::{command::input::InputArg, util::fmt_pct};

#[derive(Debug, Clone, Args)]
pub(crate) struct SubXArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Thresholds in seconds to count (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub thresholds: Option<Vec<f64>>,

    /// Threshold in seconds for the rolling probability
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Window of the rolling probability
    #[arg(long)]
    pub window: Option<usize>,
}

pub(crate) fn run(arg: &SubXArg) -> anyhow::Result<()> {
    let input = arg.input.load_with(|config| {
        if let Some(thresholds) = &arg.thresholds {
            config.sub_x_thresholds.clone_from(thresholds);
        }
        if let Some(threshold) = arg.threshold {
            config.sub_x_threshold = threshold;
        }
        if let Some(window) = arg.window {
            config.rolling_window = window;
        }
    })?;
    let report = input.report()?;

    println!("Sub-X Solves");
    println!("============\n");
    println!("  {:<10} {:>8} {:>8}", "Threshold", "Solves", "Share");
    println!("  {}", "-".repeat(28));
    for count in &report.sub_x_counts {
        println!(
            "  {:<10} {:>8} {:>8}",
            count.label(),
            count.count,
            fmt_pct(count.proportion)
        );
    }
    println!();

    let threshold = input.config.sub_x_threshold;
    let window = input.config.rolling_window;
    let filled = report.rolling_sub_x.iter().flatten().copied().collect::<Vec<_>>();
    match (filled.first(), filled.last()) {
        (Some(&first), Some(&last)) => {
            let best = filled.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            println!("Rolling sub {threshold}s probability over {window} solves");
            println!("  First: {}", fmt_pct(Some(first)));
            println!("  Best:  {}", fmt_pct(Some(best)));
            println!("  Last:  {}", fmt_pct(Some(last)));
        }
        _ => println!("Rolling sub {threshold}s probability: fewer than {window} solves"),
    }
    Ok(())
}
