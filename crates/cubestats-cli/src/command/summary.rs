use clap::Args;
use cubestats_analysis::{event, pipeline::Report};

use crate::{command::input::InputArg, util::fmt_opt};

const BAR_WIDTH: u64 = 40;

#[derive(Debug, Clone, Args)]
pub(crate) struct SummaryArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Window of the solve-time moving average
    #[arg(long)]
    pub window: Option<usize>,

    /// Number of main histogram bins
    #[arg(long)]
    pub bins: Option<usize>,
}

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let input = arg.input.load_with(|config| {
        if let Some(window) = arg.window {
            config.moving_average_window = window;
        }
        if let Some(bins) = arg.bins {
            config.histogram_bins = bins;
        }
    })?;
    let report = input.report()?;

    print_headline(&report, input.config.moving_average_window);
    println!();
    print_hourly(&report);
    println!();
    print_weekdays(&report);
    println!();
    print_histogram(&report);
    Ok(())
}

fn print_headline(report: &Report<'_>, window: usize) {
    let summary = &report.summary;
    println!("Summary");
    println!("=======");
    println!("  Total solves:       {}", summary.total);
    println!("  Mean time:          {} s", fmt_opt(summary.mean, 2));
    println!("  Best time:          {} s", fmt_opt(summary.best, 2));
    println!("  Worst time:         {} s", fmt_opt(summary.worst, 2));
    println!("  Median time:        {} s", fmt_opt(summary.median, 2));
    println!("  Standard deviation: {}", fmt_opt(summary.std_dev, 2));
    println!(
        "  Latest MA{window}:        {} s",
        fmt_opt(report.moving_average.last().copied().flatten(), 2)
    );
}

fn print_hourly(report: &Report<'_>) {
    println!("Average Time by Hour");
    println!("  {:>4} {:>8} {:>10}", "Hour", "Solves", "Mean");
    println!("  {}", "-".repeat(24));
    for hour in &report.hourly {
        println!(
            "  {:>4} {:>8} {:>10.2}",
            hour.hour, hour.count, hour.mean_time_sec
        );
    }
}

fn print_weekdays(report: &Report<'_>) {
    println!("Average Time by Weekday");
    println!("  {:<10} {:>8} {:>10}", "Weekday", "Solves", "Mean");
    println!("  {}", "-".repeat(30));
    for day in &report.weekdays {
        println!(
            "  {:<10} {:>8} {:>10.2}",
            event::weekday_name(day.weekday),
            day.count,
            day.mean_time_sec
        );
    }
}

fn print_histogram(report: &Report<'_>) {
    println!("Time Distribution");
    let Some(max_count) = report.histogram.iter().map(|b| b.count).max() else {
        println!("  (no solves)");
        return;
    };
    for bucket in &report.histogram {
        let bar_len = (bucket.count * BAR_WIDTH).div_ceil(max_count.max(1));
        println!(
            "  {:>7.2} - {:>7.2} {:>7} {}",
            bucket.start,
            bucket.end,
            bucket.count,
            "#".repeat(usize::try_from(bar_len).unwrap_or(0))
        );
    }
}
