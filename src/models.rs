use serde::Serialize;

/// One scholar row from the roster CSV, with the derived risk score
/// attached after parsing. Owns all of its fields.
#[derive(Debug, Clone, Serialize)]
pub struct Scholar {
    pub scholar_id: String,
    pub name: String,
    pub cohort: String,
    pub days_inactive: f64,
    pub attendance_rate: f64,
    pub engagement_score: f64,
    pub gpa: f64,
    pub last_contact_days: f64,
    pub survey_score: f64,
    pub open_flags: i32,
    pub risk_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    High,
    Medium,
    Low,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::High => "high",
            Tier::Medium => "medium",
            Tier::Low => "low",
        }
    }
}

/// Per-cohort accumulator. The average is derived lazily from the
/// running sum so the aggregation pass stays a single linear scan.
#[derive(Debug, Clone)]
pub struct CohortSummary {
    pub cohort: String,
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub risk_sum: f64,
}

impl CohortSummary {
    pub fn new(cohort: &str) -> Self {
        CohortSummary {
            cohort: cohort.to_string(),
            total: 0,
            high: 0,
            medium: 0,
            low: 0,
            risk_sum: 0.0,
        }
    }

    pub fn avg_risk(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.risk_sum / self.total as f64
        }
    }
}

/// A single weighted term of the risk formula, kept only while
/// rendering driver text.
#[derive(Debug, Clone)]
pub struct Driver {
    pub label: &'static str,
    pub value: f64,
}
