//! Four-horizon scenario projection (§4.5 step 2): steps a decade of
//! financial, career, and life state forward one year at a time,
//! snapshotting at years {1, 3, 5, 10} into the `Scenario`'s `Outcomes`.

use crate::regime::draw_economic_conditions;
use crate::types::{
    CareerState, DecisionOption, DecisionType, EconomicConditions, FinancialState, KeyEvent,
    LifeState, Outcomes, Profile, Scenario, YearlyOutcome,
};
use lifesim_core::{clamp_score, MarketPriors, SCORE_MAX, SCORE_MIN};
use lifesim_rng::RngStream;

/// How many months of expenses the generator holds back from
/// investment exposure (§4.5 step 2 "investment return on (netWorth -
/// cashReserve)"); a fixed multiple of monthly expenses rather than a
/// caller input, since the spec leaves the reserve's definition open.
const CASH_RESERVE_MONTHS: f64 = 3.0;

const BASELINE_SCORE: f64 = 6.0;
const KEY_EVENT_SHOCK_CHANCE: f64 = 0.20;

pub struct ScenarioGenerator<'a> {
    priors: &'a MarketPriors,
    decision: DecisionType,
    option: DecisionOption,
    profile: &'a Profile,
}

impl<'a> ScenarioGenerator<'a> {
    pub fn new(
        priors: &'a MarketPriors,
        decision: DecisionType,
        option: DecisionOption,
        profile: &'a Profile,
    ) -> Self {
        Self {
            priors,
            decision,
            option,
            profile,
        }
    }

    /// Generate one scenario, with uniform probability `1 /
    /// total_scenarios` (re-weighted by the aggregator afterward, §4.5
    /// step 4).
    pub fn generate(&self, id: u64, total_scenarios: usize, rng: &mut RngStream) -> Scenario {
        let conditions = draw_economic_conditions(rng, self.priors);
        self.project(id, total_scenarios, conditions, rng)
    }

    /// Step the year-by-year financial/career/life projection forward
    /// under an already-fixed `conditions` (§4.5 step 2), drawing only
    /// the per-year idiosyncratic noise from `rng`. Used both by
    /// `generate` (conditions freshly drawn) and by vine re-coupling
    /// (§4.8 step 5, conditions replaced by a jointly-dependent draw) —
    /// the latter re-runs this same projection so every outcome field
    /// reflects the recoupled macro backdrop, not just `conditions`
    /// itself.
    pub fn project(
        &self,
        id: u64,
        total_scenarios: usize,
        conditions: EconomicConditions,
        rng: &mut RngStream,
    ) -> Scenario {
        let cash_reserve = CASH_RESERVE_MONTHS * self.profile.monthly_expenses;

        let mut income = self.profile.salary;
        let mut net_worth = self.profile.cash;
        let mut satisfaction = BASELINE_SCORE;
        let mut stress = BASELINE_SCORE;
        let mut balance = BASELINE_SCORE;
        let mut health = BASELINE_SCORE;
        let (sat_delta, stress_delta, bal_delta, health_delta) = self.decision.life_deltas();

        let mut key_events = Vec::new();
        let mut year1 = None;
        let mut year3 = None;
        let mut year5 = None;
        let mut year10 = None;

        for year in 1..=10u32 {
            let career_growth =
                conditions.industry_outlook.growth_contribution() + tenure_bonus(self.profile.years_experience + year as f64);
            let eps_growth = rng.next_normal(0.0, 0.03);

            income = if year == 1 && self.decision.replaces_base_salary() {
                self.option.new_salary.unwrap_or(self.profile.salary)
            } else {
                (income * (1.0 + conditions.inflation + career_growth + eps_growth)).max(0.0)
            };

            let mut expenses = self.profile.monthly_expenses
                * 12.0
                * (1.0 + conditions.inflation).powi(year as i32)
                * uniform_range(rng, 0.9, 1.1);
            if rng.next_uniform() < KEY_EVENT_SHOCK_CHANCE {
                expenses += uniform_range(rng, 0.05, 0.15) * income;
            }

            let savings = income - expenses;
            let investable = (net_worth - cash_reserve).max(0.0);
            let investment_return = if investable > 0.0 {
                let base = rng.next_normal(
                    self.priors.regime(conditions.regime).asset_return.mean,
                    self.priors.regime(conditions.regime).asset_return.std,
                );
                let volatility_factor = uniform_range(rng, 0.85, 1.15);
                investable * base * volatility_factor
            } else {
                0.0
            };

            let mut promoted_this_year = false;
            let mut stress_jitter = rng.next_normal(0.0, 0.4);
            let mut event_financial_delta = 0.0;
            for event in KeyEvent::ALL {
                if rng.next_uniform() < event.annual_probability(conditions.regime) {
                    event_financial_delta += event.financial_delta(income);
                    stress_jitter += event.stress_delta();
                    if matches!(event, KeyEvent::Promotion) {
                        promoted_this_year = true;
                    }
                    key_events.push(event);
                }
            }

            net_worth += savings + investment_return + event_financial_delta;

            let experience = self.profile.years_experience + year as f64;
            let seniority = clamp_score(
                (experience / 3.0).floor() + if promoted_this_year { 1.0 } else { 0.0 },
            );
            let market_value = income * uniform_range(rng, 0.9, 1.25);

            satisfaction = clamp_score(
                BASELINE_SCORE
                    + sat_delta
                    + conditions.industry_outlook.growth_contribution() * 10.0
                    + rng.next_normal(0.0, 0.5),
            );
            stress = clamp_score(BASELINE_SCORE + stress_delta + stress_jitter);
            balance = clamp_score(BASELINE_SCORE + bal_delta + rng.next_normal(0.0, 0.4));
            health = clamp_score(BASELINE_SCORE + health_delta + rng.next_normal(0.0, 0.3));
            let happiness = clamp_score(
                (satisfaction + balance + (10.0 - stress)) / 3.0 + rng.next_normal(0.0, 0.3),
            );

            if lifesim_core::HORIZONS.contains(&year) {
                let outcome = YearlyOutcome {
                    year,
                    financial: FinancialState {
                        net_worth,
                        income,
                        expenses,
                        savings,
                    },
                    career: CareerState {
                        role: self.profile.current_role.clone(),
                        seniority,
                        market_value,
                        satisfaction,
                    },
                    life: LifeState {
                        happiness,
                        stress,
                        balance,
                        health,
                    },
                };
                match year {
                    1 => year1 = Some(outcome),
                    3 => year3 = Some(outcome),
                    5 => year5 = Some(outcome),
                    10 => year10 = Some(outcome),
                    _ => unreachable!(),
                }
            }
        }

        Scenario {
            id,
            probability: 1.0 / total_scenarios as f64,
            conditions,
            outcomes: Outcomes {
                year1: year1.expect("year 1 is always a horizon"),
                year3: year3.expect("year 3 is always a horizon"),
                year5: year5.expect("year 5 is always a horizon"),
                year10: year10.expect("year 10 is always a horizon"),
            },
            key_events,
        }
    }
}

/// Annual career-growth bonus from tenure bucket (§4.5 step 2 "career
/// growth is a function of industry outlook and tenure bucket"): early
/// career grows fastest, tapering as experience accumulates.
fn tenure_bonus(experience_years: f64) -> f64 {
    if experience_years < 3.0 {
        0.03
    } else if experience_years < 8.0 {
        0.015
    } else if experience_years < 15.0 {
        0.008
    } else {
        0.003
    }
}

fn uniform_range(rng: &mut RngStream, lo: f64, hi: f64) -> f64 {
    lo + rng.next_uniform() * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifesim_rng::{MasterSeed, StreamFactory};

    fn profile() -> Profile {
        Profile {
            age: 30,
            salary: 120_000.0,
            monthly_expenses: 5_000.0,
            cash: 20_000.0,
            years_experience: 5.0,
            current_role: Some("Engineer".to_string()),
        }
    }

    #[test]
    fn scores_stay_in_range_across_many_draws() {
        let priors = MarketPriors::fixture();
        let profile = profile();
        let generator = ScenarioGenerator::new(&priors, DecisionType::JobOffer, DecisionOption::default(), &profile);
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
        for i in 0..500u64 {
            let mut rng = factory.stream(50, i as u32);
            let scenario = generator.generate(i, 500, &mut rng);
            for year in lifesim_core::HORIZONS {
                let outcome = scenario.outcomes.at(year);
                assert!((SCORE_MIN..=SCORE_MAX).contains(&outcome.career.seniority));
                assert!((SCORE_MIN..=SCORE_MAX).contains(&outcome.career.satisfaction));
                assert!((SCORE_MIN..=SCORE_MAX).contains(&outcome.life.happiness));
                assert!((SCORE_MIN..=SCORE_MAX).contains(&outcome.life.stress));
                assert!((SCORE_MIN..=SCORE_MAX).contains(&outcome.life.balance));
                assert!((SCORE_MIN..=SCORE_MAX).contains(&outcome.life.health));
                assert!(outcome.financial.net_worth.is_finite());
                assert!(outcome.financial.income.is_finite());
                assert!(outcome.financial.expenses.is_finite());
            }
        }
    }

    #[test]
    fn deterministic_given_same_stream_state() {
        let priors = MarketPriors::fixture();
        let profile = profile();
        let generator = ScenarioGenerator::new(&priors, DecisionType::JobOffer, DecisionOption::default(), &profile);
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
        let mut a = factory.stream(51, 7);
        let mut b = factory.stream(51, 7);
        let scenario_a = generator.generate(7, 100, &mut a);
        let scenario_b = generator.generate(7, 100, &mut b);
        assert_eq!(
            scenario_a.outcomes.year10.financial.net_worth,
            scenario_b.outcomes.year10.financial.net_worth
        );
    }

    #[test]
    fn higher_new_salary_raises_year1_income() {
        let priors = MarketPriors::fixture();
        let profile = profile();
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));

        let low = ScenarioGenerator::new(
            &priors,
            DecisionType::JobOffer,
            DecisionOption { new_salary: Some(120_000.0) },
            &profile,
        );
        let high = ScenarioGenerator::new(
            &priors,
            DecisionType::JobOffer,
            DecisionOption { new_salary: Some(240_000.0) },
            &profile,
        );

        let mut rng_low = factory.stream(52, 1);
        let mut rng_high = factory.stream(52, 1);
        let scenario_low = low.generate(1, 100, &mut rng_low);
        let scenario_high = high.generate(1, 100, &mut rng_high);
        assert!(scenario_high.outcomes.year1.financial.income > scenario_low.outcomes.year1.financial.income);
    }
}
