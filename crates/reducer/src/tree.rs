//! Nested-distance multistage reduction (§4.7 "Multistage variant"):
//! groups scenarios into a `ScenarioTree` by identical stage-prefix
//! values, then collapses siblings bottom-up to a per-stage target
//! breadth.

use lifesim_core::HORIZONS;
use lifesim_scenario::Scenario;

const GROUPING_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct ScenarioTreeNode {
    pub stage: usize,
    pub value: Vec<f64>,
    pub probability: f64,
    pub children: Vec<ScenarioTreeNode>,
    /// Populated on leaves only: the original scenario ids this node
    /// represents (more than one after a sibling merge).
    pub scenario_ids: Vec<u64>,
}

fn stage_value(scenario: &Scenario, stage_index: usize) -> Vec<f64> {
    let outcome = scenario.outcomes.at(HORIZONS[stage_index]);
    vec![
        outcome.financial.net_worth,
        outcome.financial.income,
        outcome.career.satisfaction,
        outcome.life.happiness,
    ]
}

fn approx_eq(a: &[f64], b: &[f64]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < GROUPING_TOLERANCE)
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

/// Build the stage-prefix tree for `scenarios`. The root is stage 0 with
/// an empty `value` (it represents "before any horizon"); each depth
/// level below it corresponds to one of [`HORIZONS`].
pub fn build_tree(scenarios: &[Scenario]) -> ScenarioTreeNode {
    let probability = scenarios.iter().map(|s| s.probability).sum();
    ScenarioTreeNode {
        stage: 0,
        value: Vec::new(),
        probability,
        children: build_level(scenarios, 0),
        scenario_ids: Vec::new(),
    }
}

fn build_level(scenarios: &[Scenario], stage: usize) -> Vec<ScenarioTreeNode> {
    if stage >= HORIZONS.len() {
        return Vec::new();
    }

    let mut groups: Vec<(Vec<f64>, Vec<Scenario>)> = Vec::new();
    for scenario in scenarios {
        let value = stage_value(scenario, stage);
        match groups.iter_mut().find(|(group_value, _)| approx_eq(group_value, &value)) {
            Some((_, members)) => members.push(scenario.clone()),
            None => groups.push((value, vec![scenario.clone()])),
        }
    }

    groups
        .into_iter()
        .map(|(value, members)| {
            let probability = members.iter().map(|s| s.probability).sum();
            let children = build_level(&members, stage + 1);
            let scenario_ids = if children.is_empty() { members.iter().map(|s| s.id).collect() } else { Vec::new() };
            ScenarioTreeNode { stage: stage + 1, value, probability, children, scenario_ids }
        })
        .collect()
}

/// Collapse every level of `node`'s subtree so no node has more than
/// `target_breadth` children, merging the closest sibling pair
/// repeatedly (§4.7: "merging the closest pair ... value to the
/// probability-weighted mean").
pub fn collapse_to_breadth(node: &mut ScenarioTreeNode, target_breadth: usize) {
    for child in &mut node.children {
        collapse_to_breadth(child, target_breadth);
    }

    while node.children.len() > target_breadth.max(1) {
        let mut best = (0usize, 1usize, f64::INFINITY);
        for i in 0..node.children.len() {
            for j in (i + 1)..node.children.len() {
                let d = euclidean(&node.children[i].value, &node.children[j].value);
                if d < best.2 {
                    best = (i, j, d);
                }
            }
        }
        let (i, j, _) = best;
        let dropped = node.children.remove(j);
        let kept = &mut node.children[i];
        let total = kept.probability + dropped.probability;
        if total > 0.0 {
            kept.value = kept
                .value
                .iter()
                .zip(dropped.value.iter())
                .map(|(&kv, &dv)| (kv * kept.probability + dv * dropped.probability) / total)
                .collect();
        }
        kept.probability = total;
        kept.children.extend(dropped.children);
        kept.scenario_ids.extend(dropped.scenario_ids);
    }
}
