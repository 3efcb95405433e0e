//! Per-scenario distance function (§4.7 "Distance between scenarios"):
//! sums squared differences at each of the four horizons, plus
//! scenario-level macro differences, normalized so no single magnitude
//! (net worth vs. a Score) dominates the metric.

use lifesim_core::HORIZONS;
use lifesim_scenario::Scenario;

const NET_WORTH_SCALE: f64 = 1e10;
const INCOME_SCALE: f64 = 1e8;
const MACRO_WEIGHT: f64 = 0.1;

/// Weighted Euclidean distance between two scenarios' outcome profiles.
/// Smaller means more interchangeable for reduction purposes.
pub fn scenario_distance(a: &Scenario, b: &Scenario) -> f64 {
    let mut sum_sq = 0.0;

    for year in HORIZONS {
        let oa = a.outcomes.at(year);
        let ob = b.outcomes.at(year);

        let d_net_worth = (oa.financial.net_worth - ob.financial.net_worth) / NET_WORTH_SCALE;
        let d_income = (oa.financial.income - ob.financial.income) / INCOME_SCALE;
        let d_satisfaction = oa.career.satisfaction - ob.career.satisfaction;
        let d_happiness = oa.life.happiness - ob.life.happiness;

        sum_sq += d_net_worth.powi(2) + d_income.powi(2) + d_satisfaction.powi(2) + d_happiness.powi(2);
    }

    let d_gdp = a.conditions.gdp_growth - b.conditions.gdp_growth;
    let d_inflation = a.conditions.inflation - b.conditions.inflation;
    sum_sq += MACRO_WEIGHT * (d_gdp.powi(2) + d_inflation.powi(2));

    sum_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let s = crate::tests_support::fixture_scenario(1, 0.1);
        assert_eq!(scenario_distance(&s, &s), 0.0);
    }

    #[test]
    fn distance_grows_with_net_worth_gap() {
        let a = crate::tests_support::fixture_scenario(1, 0.1);
        let mut b = crate::tests_support::fixture_scenario(2, 0.1);
        b.outcomes.year10.financial.net_worth += 5e9;
        let near = crate::tests_support::fixture_scenario(3, 0.1);
        assert!(scenario_distance(&a, &b) > scenario_distance(&a, &near));
    }
}
