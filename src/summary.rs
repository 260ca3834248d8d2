use std::cmp::Ordering;

use crate::models::{CohortSummary, Scholar, Tier};
use crate::risk;

#[derive(Debug, Clone)]
pub struct RosterStats {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub average_risk: f64,
}

/// Non-increasing by risk score; equal scores compare equal, no
/// secondary key.
pub fn sort_by_risk(scholars: &mut [Scholar]) {
    scholars.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Single pass over the roster: overall tier counts plus one
/// accumulator per cohort, created on first encounter.
pub fn summarize(scholars: &[Scholar]) -> (RosterStats, Vec<CohortSummary>) {
    let mut stats = RosterStats {
        total: scholars.len(),
        high: 0,
        medium: 0,
        low: 0,
        average_risk: 0.0,
    };
    let mut cohorts: Vec<CohortSummary> = Vec::new();
    let mut risk_sum = 0.0;

    for scholar in scholars {
        risk_sum += scholar.risk_score;
        let tier = risk::risk_tier(scholar.risk_score);
        match tier {
            Tier::High => stats.high += 1,
            Tier::Medium => stats.medium += 1,
            Tier::Low => stats.low += 1,
        }

        let idx = match cohorts.iter().position(|c| c.cohort == scholar.cohort) {
            Some(idx) => idx,
            None => {
                cohorts.push(CohortSummary::new(&scholar.cohort));
                cohorts.len() - 1
            }
        };
        let summary = &mut cohorts[idx];
        summary.total += 1;
        summary.risk_sum += scholar.risk_score;
        match tier {
            Tier::High => summary.high += 1,
            Tier::Medium => summary.medium += 1,
            Tier::Low => summary.low += 1,
        }
    }

    if !scholars.is_empty() {
        stats.average_risk = risk_sum / scholars.len() as f64;
    }

    (stats, cohorts)
}

/// Cohorts ranked by average risk descending, truncated to the top
/// three for the focus list.
pub fn cohort_focus(cohorts: &[CohortSummary]) -> Vec<CohortSummary> {
    let mut ranked = cohorts.to_vec();
    ranked.sort_by(|a, b| {
        b.avg_risk()
            .partial_cmp(&a.avg_risk())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(3);
    ranked
}

/// The actionable view: scores below `min_risk` are filtered out
/// first, then the result is truncated to `limit`.
pub fn action_queue(scholars: &[Scholar], min_risk: f64, limit: usize) -> Vec<&Scholar> {
    scholars
        .iter()
        .filter(|s| s.risk_score >= min_risk)
        .take(limit)
        .collect()
}
