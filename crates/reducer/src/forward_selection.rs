//! Heitsch–Römisch forward selection (§4.7): greedily grows a surviving
//! set `S` by always adding the scenario that most reduces residual
//! transport cost, then redistributes the dropped scenarios' mass to
//! their nearest survivor.

use crate::distance::scenario_distance;
use lifesim_core::PROBABILITY_SUM_EPSILON;
use lifesim_scenario::Scenario;

/// Reduce `scenarios` to `target` representatives. Returns the reduced
/// set with probabilities renormalized to sum to 1 (I1). No-op (a clone)
/// if `scenarios.len() <= target`.
pub fn reduce(scenarios: &[Scenario], target: usize) -> Vec<Scenario> {
    let n = scenarios.len();
    if target == 0 || n <= target {
        return scenarios.to_vec();
    }

    let mut selected: Vec<usize> = Vec::with_capacity(target);
    let mut remaining: Vec<usize> = (0..n).collect();

    let highest_weight = remaining
        .iter()
        .copied()
        .max_by(|&a, &b| scenarios[a].probability.partial_cmp(&scenarios[b].probability).unwrap())
        .expect("non-empty scenario set");
    selected.push(highest_weight);
    remaining.retain(|&i| i != highest_weight);

    while selected.len() < target {
        let mut best_candidate = remaining[0];
        let mut best_cost = f64::INFINITY;

        for &candidate in &remaining {
            let cost: f64 = remaining
                .iter()
                .filter(|&&j| j != candidate)
                .map(|&j| {
                    let nearest = selected
                        .iter()
                        .chain(std::iter::once(&candidate))
                        .map(|&s| scenario_distance(&scenarios[j], &scenarios[s]))
                        .fold(f64::INFINITY, f64::min);
                    scenarios[j].probability * nearest
                })
                .sum();

            if cost < best_cost {
                best_cost = cost;
                best_candidate = candidate;
            }
        }

        selected.push(best_candidate);
        remaining.retain(|&i| i != best_candidate);
    }

    let mut reduced: Vec<Scenario> = selected.iter().map(|&i| scenarios[i].clone()).collect();

    for &j in &remaining {
        let (nearest_pos, _) = selected
            .iter()
            .enumerate()
            .map(|(pos, &s)| (pos, scenario_distance(&scenarios[j], &scenarios[s])))
            .fold((0usize, f64::INFINITY), |best, cand| if cand.1 < best.1 { cand } else { best });
        reduced[nearest_pos].probability += scenarios[j].probability;
    }

    let total: f64 = reduced.iter().map(|s| s.probability).sum();
    if total > PROBABILITY_SUM_EPSILON {
        for s in &mut reduced {
            s.probability /= total;
        }
    }

    reduced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduction_preserves_probability_mass() {
        let scenarios: Vec<Scenario> = (0..12)
            .map(|i| crate::tests_support::fixture_scenario(i, 1.0 / 12.0))
            .collect();
        let reduced = reduce(&scenarios, 4);
        assert_eq!(reduced.len(), 4);
        let total: f64 = reduced.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 1e-9, "total={total}");
    }

    #[test]
    fn no_op_when_already_at_or_below_target() {
        let scenarios: Vec<Scenario> = (0..3).map(|i| crate::tests_support::fixture_scenario(i, 1.0 / 3.0)).collect();
        let reduced = reduce(&scenarios, 5);
        assert_eq!(reduced.len(), 3);
    }

    /// Testable property 9: transport cost is non-increasing as k grows,
    /// 0 at k=n.
    #[test]
    fn transport_cost_shrinks_as_target_grows() {
        let scenarios: Vec<Scenario> = (0..10)
            .map(|i| crate::tests_support::fixture_scenario(i, 1.0 / 10.0))
            .collect();

        let cost_at = |k: usize| -> f64 {
            let reduced = reduce(&scenarios, k);
            scenarios
                .iter()
                .map(|s| {
                    reduced
                        .iter()
                        .map(|r| scenario_distance(s, r))
                        .fold(f64::INFINITY, f64::min)
                        * s.probability
                })
                .sum()
        };

        let cost_2 = cost_at(2);
        let cost_5 = cost_at(5);
        let cost_10 = cost_at(10);
        assert!(cost_5 <= cost_2 + 1e-9);
        assert!(cost_10 <= cost_5 + 1e-9);
        assert!(cost_10 < 1e-9, "cost at k=n should be ~0, got {cost_10}");
    }
}
