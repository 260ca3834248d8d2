use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use csv::StringRecord;

use crate::models::Scholar;
use crate::risk;

// scholar_id,name,cohort,days_inactive,attendance_rate,engagement_score,
// gpa,last_contact_days,survey_score,open_flags
const REQUIRED_FIELDS: usize = 10;
const HEADER_MARKER: &str = "scholar_id";

pub struct LoadOutcome {
    pub scholars: Vec<Scholar>,
    pub skipped: usize,
}

/// Loads the roster CSV. Rows with fewer than ten fields are counted
/// as skipped; rows not matching `cohort_filter` are dropped before
/// scoring. Opening the file is the only fatal failure here.
pub fn load_roster(path: &Path, cohort_filter: Option<&str>) -> anyhow::Result<LoadOutcome> {
    let file = File::open(path)
        .with_context(|| format!("failed to open roster CSV {}", path.display()))?;
    Ok(load_from_reader(file, cohort_filter))
}

pub fn load_from_reader<R: Read>(reader: R, cohort_filter: Option<&str>) -> LoadOutcome {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut scholars = Vec::new();
    let mut skipped = 0usize;
    let mut first = true;

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        if first {
            first = false;
            if record
                .get(0)
                .map(|field| field.contains(HEADER_MARKER))
                .unwrap_or(false)
            {
                continue;
            }
        }

        let Some(scholar) = parse_row(&record) else {
            skipped += 1;
            continue;
        };

        if let Some(wanted) = cohort_filter {
            if scholar.cohort != wanted {
                continue;
            }
        }

        scholars.push(scholar);
    }

    LoadOutcome { scholars, skipped }
}

/// Best-effort row parse: short rows are rejected, but unparseable
/// numeric fields coerce to zero rather than failing the record.
pub fn parse_row(record: &StringRecord) -> Option<Scholar> {
    if record.len() < REQUIRED_FIELDS {
        return None;
    }

    let field = |idx: usize| record.get(idx).unwrap_or("");

    let mut scholar = Scholar {
        scholar_id: field(0).to_string(),
        name: field(1).to_string(),
        cohort: field(2).to_string(),
        days_inactive: parse_float(field(3)),
        attendance_rate: parse_float(field(4)),
        engagement_score: parse_float(field(5)),
        gpa: parse_float(field(6)),
        last_contact_days: parse_float(field(7)),
        survey_score: parse_float(field(8)),
        open_flags: parse_int(field(9)),
        risk_score: 0.0,
    };
    scholar.risk_score = risk::compute_risk(&scholar);
    Some(scholar)
}

fn parse_float(value: &str) -> f64 {
    value.trim().parse().unwrap_or(0.0)
}

fn parse_int(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}
