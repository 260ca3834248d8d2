use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde_json::{json, Value};

use crate::models::{CohortSummary, Scholar};
use crate::risk;
use crate::summary::RosterStats;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn render_text(
    stats: &RosterStats,
    cohorts: &[CohortSummary],
    focus: &[CohortSummary],
    queue: &[&Scholar],
    skipped: usize,
    limit: usize,
    min_risk: f64,
    with_drivers: bool,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Group Scholar Retention Watch");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Records: {}  Average risk: {:.1}  Skipped rows: {}",
        stats.total, stats.average_risk, skipped
    );
    let _ = writeln!(
        output,
        "Risk tiers: high {} | medium {} | low {}",
        stats.high, stats.medium, stats.low
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "Cohort summary:");
    for cohort in cohorts {
        let _ = writeln!(
            output,
            "- {}: total {}, avg risk {:.1}, high {}, medium {}, low {}",
            cohort.cohort,
            cohort.total,
            cohort.avg_risk(),
            cohort.high,
            cohort.medium,
            cohort.low
        );
    }

    if !focus.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Cohort focus (top {} by avg risk):", focus.len());
        for cohort in focus {
            let _ = writeln!(
                output,
                "- {}: avg risk {:.1} (high {}, medium {}, low {})",
                cohort.cohort,
                cohort.avg_risk(),
                cohort.high,
                cohort.medium,
                cohort.low
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Action queue (top {limit}, min risk {min_risk:.1}):");
    for (idx, scholar) in queue.iter().enumerate() {
        let tier = risk::risk_tier(scholar.risk_score);
        let line = format!(
            "{:2}. {:<14} {:<18} cohort {:<10} risk {:.1} ({}) -> {}",
            idx + 1,
            scholar.scholar_id,
            scholar.name,
            scholar.cohort,
            scholar.risk_score,
            tier.as_str(),
            risk::action_hint(scholar)
        );
        if with_drivers {
            let _ = writeln!(output, "{line} | drivers: {}", risk::format_drivers(scholar));
        } else {
            let _ = writeln!(output, "{line}");
        }
    }
    if queue.is_empty() {
        let _ = writeln!(output, "No scholars met the minimum risk threshold.");
    }

    output
}

/// Writes the action-queue view (already filtered and limited) as the
/// roster export.
pub fn write_roster_csv<W: Write>(
    writer: W,
    queue: &[&Scholar],
    with_drivers: bool,
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["scholar_id", "name", "cohort", "risk_score", "tier", "action"];
    if with_drivers {
        header.push("drivers");
    }
    header.extend([
        "days_inactive",
        "attendance_rate",
        "engagement_score",
        "gpa",
        "last_contact_days",
        "survey_score",
        "open_flags",
    ]);
    csv_writer.write_record(&header)?;

    for scholar in queue {
        let tier = risk::risk_tier(scholar.risk_score);
        let mut row = vec![
            scholar.scholar_id.clone(),
            scholar.name.clone(),
            scholar.cohort.clone(),
            format!("{:.1}", scholar.risk_score),
            tier.as_str().to_string(),
            risk::action_hint(scholar).to_string(),
        ];
        if with_drivers {
            row.push(risk::format_drivers(scholar));
        }
        row.extend([
            format!("{:.1}", scholar.days_inactive),
            format!("{:.1}", scholar.attendance_rate),
            format!("{:.1}", scholar.engagement_score),
            format!("{:.2}", scholar.gpa),
            format!("{:.1}", scholar.last_contact_days),
            format!("{:.1}", scholar.survey_score),
            scholar.open_flags.to_string(),
        ]);
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Cohort aggregate table, never subject to the min-risk filter.
pub fn write_summary_csv<W: Write>(
    writer: W,
    cohorts: &[CohortSummary],
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["cohort", "total", "avg_risk", "high", "medium", "low"])?;
    for cohort in cohorts {
        csv_writer.write_record(&[
            cohort.cohort.clone(),
            cohort.total.to_string(),
            format!("{:.1}", cohort.avg_risk()),
            cohort.high.to_string(),
            cohort.medium.to_string(),
            cohort.low.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_roster(path: &Path, queue: &[&Scholar], with_drivers: bool) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to write export {}", path.display()))?;
    write_roster_csv(file, queue, with_drivers)
}

pub fn export_summary(path: &Path, cohorts: &[CohortSummary]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to write summary {}", path.display()))?;
    write_summary_csv(file, cohorts)
}

fn cohort_value(cohort: &CohortSummary) -> Value {
    json!({
        "cohort": cohort.cohort,
        "total": cohort.total,
        "avg_risk": round1(cohort.avg_risk()),
        "high": cohort.high,
        "medium": cohort.medium,
        "low": cohort.low,
    })
}

fn queue_entry(scholar: &Scholar, with_drivers: bool) -> Value {
    let mut entry = json!({
        "scholar_id": scholar.scholar_id,
        "name": scholar.name,
        "cohort": scholar.cohort,
        "risk": round1(scholar.risk_score),
        "tier": risk::risk_tier(scholar.risk_score).as_str(),
        "action": risk::action_hint(scholar),
    });
    if with_drivers {
        entry["drivers"] = Value::String(risk::format_drivers(scholar));
    }
    entry
}

fn record_entry(scholar: &Scholar, with_drivers: bool) -> serde_json::Result<Value> {
    let mut entry = serde_json::to_value(scholar)?;
    entry["tier"] = Value::String(risk::risk_tier(scholar.risk_score).as_str().to_string());
    entry["action"] = Value::String(risk::action_hint(scholar).to_string());
    if with_drivers {
        entry["drivers"] = Value::String(risk::format_drivers(scholar));
    }
    Ok(entry)
}

/// Full JSON document. `records` is the unfiltered dump and appears
/// only in json-full mode.
pub fn build_json(
    stats: &RosterStats,
    cohorts: &[CohortSummary],
    focus: &[CohortSummary],
    queue: &[&Scholar],
    records: Option<&[Scholar]>,
    min_risk: f64,
    with_drivers: bool,
) -> anyhow::Result<Value> {
    let mut document = json!({
        "total": stats.total,
        "average_risk": round1(stats.average_risk),
        "tiers": {
            "high": stats.high,
            "medium": stats.medium,
            "low": stats.low,
        },
        "action_queue_min_risk": round1(min_risk),
        "cohorts": cohorts.iter().map(cohort_value).collect::<Vec<_>>(),
        "cohort_focus": focus.iter().map(cohort_value).collect::<Vec<_>>(),
        "action_queue": queue
            .iter()
            .map(|s| queue_entry(s, with_drivers))
            .collect::<Vec<_>>(),
    });
    if let Some(records) = records {
        let entries = records
            .iter()
            .map(|s| record_entry(s, with_drivers))
            .collect::<serde_json::Result<Vec<_>>>()?;
        document["records"] = Value::Array(entries);
    }
    Ok(document)
}
