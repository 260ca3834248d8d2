use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

mod ingest;
mod models;
mod report;
mod risk;
mod summary;

#[derive(Parser)]
#[command(name = "retention-watch")]
#[command(about = "Group Scholar Retention Watch", long_about = None)]
struct Cli {
    /// Roster CSV:
    /// scholar_id,name,cohort,days_inactive,attendance_rate,engagement_score,gpa,last_contact_days,survey_score,open_flags
    input: PathBuf,
    /// Max records in the action queue and roster export
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Exclude records below this score from the action queue and export
    #[arg(long, default_value_t = 0.0)]
    min_risk: f64,
    /// Restrict ingestion to one cohort (exact match)
    #[arg(long)]
    cohort: Option<String>,
    /// Write the filtered roster as CSV
    #[arg(long)]
    export: Option<PathBuf>,
    /// Write the cohort aggregate table as CSV
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Emit JSON to stdout instead of text
    #[arg(long)]
    json: bool,
    /// Like --json, plus an unfiltered full record dump
    #[arg(long)]
    json_full: bool,
    /// Include top-3 risk-driver text per record
    #[arg(long)]
    drivers: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let outcome = ingest::load_roster(&cli.input, cli.cohort.as_deref())?;
    let mut scholars = outcome.scholars;
    if scholars.is_empty() {
        bail!("no records loaded from {}", cli.input.display());
    }

    summary::sort_by_risk(&mut scholars);

    let queue = summary::action_queue(&scholars, cli.min_risk, cli.limit);
    if let Some(path) = &cli.export {
        report::export_roster(path, &queue, cli.drivers)?;
    }

    let (stats, cohorts) = summary::summarize(&scholars);
    let focus = summary::cohort_focus(&cohorts);

    if let Some(path) = &cli.summary {
        report::export_summary(path, &cohorts)?;
    }

    if cli.json || cli.json_full {
        let records = cli.json_full.then_some(scholars.as_slice());
        let document = report::build_json(
            &stats,
            &cohorts,
            &focus,
            &queue,
            records,
            cli.min_risk,
            cli.drivers,
        )?;
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print!(
            "{}",
            report::render_text(
                &stats,
                &cohorts,
                &focus,
                &queue,
                outcome.skipped,
                cli.limit,
                cli.min_risk,
                cli.drivers,
            )
        );
    }

    Ok(())
}
