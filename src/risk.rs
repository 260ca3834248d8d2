use crate::models::{Driver, Scholar, Tier};

const WEIGHT_INACTIVITY: f64 = 0.6;
const WEIGHT_CONTACT_GAP: f64 = 0.4;
const WEIGHT_ATTENDANCE: f64 = 0.35;
const WEIGHT_ENGAGEMENT: f64 = 0.25;
const WEIGHT_GPA: f64 = 12.5;
const WEIGHT_SURVEY: f64 = 0.15;
const WEIGHT_OPEN_FLAGS: f64 = 6.0;

// Drivers at or below this magnitude are noise and not reported.
const DRIVER_FLOOR: f64 = 0.1;
const MAX_DRIVERS: usize = 3;

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Weighted composite retention risk in [0, 100]. Weights are fixed;
/// tier thresholds were once meant to become configurable but never
/// did, so they stay hardcoded here.
pub fn compute_risk(s: &Scholar) -> f64 {
    let gpa_gap = clamp(4.0 - s.gpa, 0.0, 4.0);
    let attendance_gap = clamp(100.0 - s.attendance_rate, 0.0, 100.0);
    let engagement_gap = clamp(100.0 - s.engagement_score, 0.0, 100.0);
    let survey_gap = clamp(100.0 - s.survey_score, 0.0, 100.0);

    let score = s.days_inactive * WEIGHT_INACTIVITY
        + s.last_contact_days * WEIGHT_CONTACT_GAP
        + attendance_gap * WEIGHT_ATTENDANCE
        + engagement_gap * WEIGHT_ENGAGEMENT
        + gpa_gap * WEIGHT_GPA
        + survey_gap * WEIGHT_SURVEY
        + f64::from(s.open_flags) * WEIGHT_OPEN_FLAGS;

    clamp(score, 0.0, 100.0)
}

pub fn risk_tier(score: f64) -> Tier {
    if score >= 75.0 {
        Tier::High
    } else if score >= 50.0 {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// Suggested next step. First match wins: the ordering encodes urgency
/// and intentionally shadows later conditions.
pub fn action_hint(s: &Scholar) -> &'static str {
    if s.days_inactive >= 30.0 {
        "re-engage outreach"
    } else if s.attendance_rate < 70.0 {
        "attendance support"
    } else if s.gpa < 2.5 {
        "academic support"
    } else if s.open_flags > 0 {
        "resolve open flags"
    } else if s.engagement_score < 60.0 {
        "engagement nudge"
    } else {
        "lightweight check-in"
    }
}

/// Decomposes the score into its labeled terms, drops entries under
/// the noise floor, and keeps the top three by magnitude.
pub fn top_drivers(s: &Scholar) -> Vec<Driver> {
    let gpa_gap = clamp(4.0 - s.gpa, 0.0, 4.0);
    let attendance_gap = clamp(100.0 - s.attendance_rate, 0.0, 100.0);
    let engagement_gap = clamp(100.0 - s.engagement_score, 0.0, 100.0);
    let survey_gap = clamp(100.0 - s.survey_score, 0.0, 100.0);

    let terms = [
        ("inactivity", s.days_inactive * WEIGHT_INACTIVITY),
        ("contact gap", s.last_contact_days * WEIGHT_CONTACT_GAP),
        ("attendance", attendance_gap * WEIGHT_ATTENDANCE),
        ("engagement", engagement_gap * WEIGHT_ENGAGEMENT),
        ("gpa", gpa_gap * WEIGHT_GPA),
        ("survey", survey_gap * WEIGHT_SURVEY),
        ("open flags", f64::from(s.open_flags) * WEIGHT_OPEN_FLAGS),
    ];

    let mut drivers: Vec<Driver> = terms
        .iter()
        .filter(|(_, value)| *value > DRIVER_FLOOR)
        .map(|(label, value)| Driver {
            label,
            value: *value,
        })
        .collect();

    drivers.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    drivers.truncate(MAX_DRIVERS);
    drivers
}

/// Human-readable driver summary, `"stable"` when nothing clears the
/// noise floor.
pub fn format_drivers(s: &Scholar) -> String {
    let drivers = top_drivers(s);
    if drivers.is_empty() {
        return "stable".to_string();
    }
    drivers
        .iter()
        .map(|d| format!("{} {:.1}", d.label, d.value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scholar() -> Scholar {
        Scholar {
            scholar_id: "S1".to_string(),
            name: "Alex Kim".to_string(),
            cohort: "Fall 2024".to_string(),
            days_inactive: 0.0,
            attendance_rate: 100.0,
            engagement_score: 100.0,
            gpa: 4.0,
            last_contact_days: 0.0,
            survey_score: 100.0,
            open_flags: 0,
            risk_score: 0.0,
        }
    }

    #[test]
    fn perfect_scholar_scores_zero() {
        let s = sample_scholar();
        assert_eq!(compute_risk(&s), 0.0);
        assert_eq!(format_drivers(&s), "stable");
    }

    #[test]
    fn score_is_clamped_to_one_hundred() {
        let mut s = sample_scholar();
        s.days_inactive = 400.0;
        assert_eq!(compute_risk(&s), 100.0);
    }

    #[test]
    fn gpa_above_scale_is_treated_as_no_gap() {
        let mut s = sample_scholar();
        s.gpa = 5.0;
        let over = compute_risk(&s);
        s.gpa = 4.0;
        let at_cap = compute_risk(&s);
        assert_eq!(over, at_cap);
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(risk_tier(75.0), Tier::High);
        assert_eq!(risk_tier(74.9), Tier::Medium);
        assert_eq!(risk_tier(50.0), Tier::Medium);
        assert_eq!(risk_tier(49.9), Tier::Low);
    }

    #[test]
    fn worked_example_row_hits_the_cap() {
        let s = Scholar {
            scholar_id: "S1".to_string(),
            name: "Alex Kim".to_string(),
            cohort: "Fall 2024".to_string(),
            days_inactive: 45.0,
            attendance_rate: 60.0,
            engagement_score: 50.0,
            gpa: 2.0,
            last_contact_days: 20.0,
            survey_score: 40.0,
            open_flags: 2,
            risk_score: 0.0,
        };
        // raw sum 27 + 8 + 14 + 12.5 + 25 + 9 + 12 = 107.5, clamped
        assert_eq!(compute_risk(&s), 100.0);
        assert_eq!(risk_tier(compute_risk(&s)), Tier::High);
        assert_eq!(action_hint(&s), "re-engage outreach");
    }

    #[test]
    fn action_hint_first_match_shadows_later_conditions() {
        let mut s = sample_scholar();
        s.days_inactive = 30.0;
        s.attendance_rate = 10.0;
        s.gpa = 1.0;
        s.open_flags = 3;
        s.engagement_score = 5.0;
        assert_eq!(action_hint(&s), "re-engage outreach");

        s.days_inactive = 29.9;
        assert_eq!(action_hint(&s), "attendance support");

        s.attendance_rate = 70.0;
        assert_eq!(action_hint(&s), "academic support");

        s.gpa = 2.5;
        assert_eq!(action_hint(&s), "resolve open flags");

        s.open_flags = 0;
        assert_eq!(action_hint(&s), "engagement nudge");

        s.engagement_score = 60.0;
        assert_eq!(action_hint(&s), "lightweight check-in");
    }

    #[test]
    fn drivers_drop_noise_and_keep_top_three() {
        let mut s = sample_scholar();
        s.days_inactive = 10.0; // 6.0
        s.last_contact_days = 5.0; // 2.0
        s.gpa = 3.0; // 12.5
        s.open_flags = 1; // 6.0
        s.survey_score = 99.9; // 0.015, under the floor

        let drivers = top_drivers(&s);
        assert_eq!(drivers.len(), 3);
        assert_eq!(drivers[0].label, "gpa");
        assert!(drivers.iter().all(|d| d.value > 0.1));
        assert_eq!(format_drivers(&s), "gpa 12.5; inactivity 6.0; open flags 6.0");
    }

    #[test]
    fn terms_at_the_floor_are_excluded() {
        let mut s = sample_scholar();
        // contact gap of 0.25 days weighs exactly 0.1 and is dropped;
        // a quarter day of inactivity weighs 0.15 and is kept.
        s.last_contact_days = 0.25;
        s.days_inactive = 0.25;
        let drivers = top_drivers(&s);
        assert_eq!(drivers.len(), 1);
        assert_eq!(drivers[0].label, "inactivity");
    }
}
