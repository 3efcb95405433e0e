//! Input boundary validation (§6 "Input boundaries", §7
//! `InvalidInput`): a failing profile is rejected immediately, never
//! retried, with every violation collected into one error value.

use lifesim_core::SimError;
use lifesim_scenario::Profile;

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 100;
const MAX_SALARY: f64 = 1e7;

pub fn validate_profile(profile: &Profile) -> Result<(), SimError> {
    let mut violations = Vec::new();

    if !(MIN_AGE..=MAX_AGE).contains(&profile.age) {
        violations.push(format!("age {} outside [{MIN_AGE}, {MAX_AGE}]", profile.age));
    }
    if !(0.0..=MAX_SALARY).contains(&profile.salary) {
        violations.push(format!("salary {} outside [0, {MAX_SALARY}]", profile.salary));
    }
    if profile.monthly_expenses < 0.0 {
        violations.push(format!("monthly_expenses {} must be non-negative", profile.monthly_expenses));
    }
    if profile.salary > 0.0 && profile.monthly_expenses > profile.salary / 12.0 {
        violations.push(format!(
            "monthly_expenses {} exceeds income/12 ({})",
            profile.monthly_expenses,
            profile.salary / 12.0
        ));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(SimError::InvalidInput { violations })
    }
}
