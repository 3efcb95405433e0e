//! Data-quality assessment (§4.8 step 1, §6 `assess_data_quality`):
//! scores how complete the caller's `Profile` is against a
//! decision-type-dependent required-field list, and scales the sample
//! count accordingly.

use lifesim_scenario::{DecisionType, Profile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQuality {
    pub completeness: f64,
    pub confidence: Confidence,
    pub missing_fields: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Fields every decision needs, plus `current_role` for the two
/// decision types whose projection actually reads it (§4.5 career
/// state carries `profile.current_role` forward).
fn required_fields(decision: DecisionType) -> Vec<&'static str> {
    let mut fields = vec!["salary", "monthly_expenses", "cash", "years_experience"];
    if matches!(decision, DecisionType::JobOffer | DecisionType::CareerChange) {
        fields.push("current_role");
    }
    fields
}

fn is_present(profile: &Profile, field: &str) -> bool {
    match field {
        "salary" => profile.salary > 0.0,
        "monthly_expenses" => profile.monthly_expenses > 0.0,
        "cash" => profile.cash > 0.0,
        "years_experience" => profile.years_experience > 0.0,
        "current_role" => profile.current_role.is_some(),
        _ => true,
    }
}

pub fn assess_data_quality(profile: &Profile, decision: DecisionType) -> DataQuality {
    let required = required_fields(decision);
    let mut missing_fields = Vec::new();

    for &field in &required {
        if !is_present(profile, field) {
            missing_fields.push(field.to_string());
        }
    }

    let completeness = (required.len() - missing_fields.len()) as f64 / required.len() as f64;
    let confidence = if completeness >= 0.7 {
        Confidence::High
    } else if completeness >= 0.5 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let recommendations = missing_fields
        .iter()
        .map(|field| format!("Provide {field} for a more accurate projection."))
        .collect();

    DataQuality {
        completeness,
        confidence,
        missing_fields,
        recommendations,
    }
}

/// Sample-count multiplier for the data-quality adjustment (§4.8 step
/// 1): completeness < 0.5 doubles the target, < 0.7 scales by 1.5.
pub fn sample_multiplier(completeness: f64) -> f64 {
    if completeness < 0.5 {
        2.0
    } else if completeness < 0.7 {
        1.5
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifesim_scenario::Profile;

    /// E2: a profile with only age and current_role populated reports
    /// low confidence and completeness below 0.5.
    #[test]
    fn sparse_profile_reports_low_confidence() {
        let profile = Profile {
            age: 30,
            salary: 0.0,
            monthly_expenses: 0.0,
            cash: 0.0,
            years_experience: 0.0,
            current_role: Some("Engineer".to_string()),
        };
        let dq = assess_data_quality(&profile, DecisionType::JobOffer);
        assert!(dq.completeness < 0.5, "completeness={}", dq.completeness);
        assert_eq!(dq.confidence, Confidence::Low);
        assert_eq!(sample_multiplier(dq.completeness), 2.0);
    }

    #[test]
    fn complete_profile_reports_high_confidence() {
        let profile = Profile {
            age: 30,
            salary: 120_000.0,
            monthly_expenses: 5_000.0,
            cash: 20_000.0,
            years_experience: 5.0,
            current_role: Some("Engineer".to_string()),
        };
        let dq = assess_data_quality(&profile, DecisionType::JobOffer);
        assert_eq!(dq.completeness, 1.0);
        assert_eq!(dq.confidence, Confidence::High);
        assert!(dq.missing_fields.is_empty());
    }
}
