//! Scenario data model (§3): `Scenario`, `YearlyOutcome`, decision and
//! profile inputs. Plain structs, no behavior — projection and
//! aggregation live in their own modules.

use lifesim_core::{IndustryOutlook, Money, Probability, Regime, Score, Years};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionType {
    JobOffer,
    CareerChange,
    Education,
    Retirement,
    Other,
}

impl DecisionType {
    /// Path-dependent decisions are eligible for MLMC (§4.8 step 4).
    pub fn is_path_dependent(self) -> bool {
        matches!(
            self,
            DecisionType::JobOffer
                | DecisionType::CareerChange
                | DecisionType::Education
                | DecisionType::Retirement
        )
    }

    /// Whether year-1 income is replaced by `option.new_salary` (§4.5
    /// income formula).
    pub fn replaces_base_salary(self) -> bool {
        matches!(self, DecisionType::JobOffer | DecisionType::CareerChange)
    }

    /// One-time psychological impact deltas applied to the life-metric
    /// baseline (§4.5 step 2: "add decision-type and impact deltas"):
    /// `(satisfaction, stress, balance, health)`.
    pub fn life_deltas(self) -> (f64, f64, f64, f64) {
        match self {
            DecisionType::JobOffer => (0.8, 0.3, -0.2, 0.0),
            DecisionType::CareerChange => (1.2, 1.3, -0.5, -0.2),
            DecisionType::Education => (0.3, 0.9, -1.0, -0.1),
            DecisionType::Retirement => (0.5, -2.0, 2.2, 0.4),
            DecisionType::Other => (0.0, 0.0, 0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DecisionOption {
    pub new_salary: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub age: u32,
    pub salary: Money,
    pub monthly_expenses: Money,
    pub cash: Money,
    pub years_experience: f64,
    pub current_role: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EconomicConditions {
    pub regime: Regime,
    pub gdp_growth: f64,
    pub inflation: f64,
    pub unemployment: f64,
    pub industry_outlook: IndustryOutlook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    MarketCrash,
    Promotion,
    Layoff,
    UnexpectedExpense,
}

impl KeyEvent {
    pub const ALL: [KeyEvent; 4] = [
        KeyEvent::MarketCrash,
        KeyEvent::Promotion,
        KeyEvent::Layoff,
        KeyEvent::UnexpectedExpense,
    ];

    /// Regime-conditional annual probability (§4.5 step 3).
    pub fn annual_probability(self, regime: Regime) -> Probability {
        use KeyEvent::*;
        use Regime::*;
        match (self, regime) {
            (MarketCrash, Recession) => 0.08,
            (MarketCrash, Downturn) => 0.04,
            (MarketCrash, Stable) => 0.015,
            (MarketCrash, Growth) => 0.01,
            (MarketCrash, Boom) => 0.02,
            (Promotion, Recession) => 0.03,
            (Promotion, Downturn) => 0.05,
            (Promotion, Stable) => 0.10,
            (Promotion, Growth) => 0.14,
            (Promotion, Boom) => 0.18,
            (Layoff, Recession) => 0.12,
            (Layoff, Downturn) => 0.06,
            (Layoff, Stable) => 0.02,
            (Layoff, Growth) => 0.012,
            (Layoff, Boom) => 0.01,
            (UnexpectedExpense, Recession) => 0.15,
            (UnexpectedExpense, Downturn) => 0.13,
            (UnexpectedExpense, Stable) => 0.10,
            (UnexpectedExpense, Growth) => 0.10,
            (UnexpectedExpense, Boom) => 0.09,
        }
    }

    /// Fixed financial delta, as a fraction of current income for
    /// income-scaled events and an absolute dollar figure otherwise.
    pub fn financial_delta(self, income: Money) -> Money {
        match self {
            KeyEvent::MarketCrash => -0.15 * income,
            KeyEvent::Promotion => 0.0,
            KeyEvent::Layoff => -income,
            KeyEvent::UnexpectedExpense => -0.08 * income,
        }
    }

    /// Per-occurrence life-event jitter on stress, applied the year the
    /// event fires (§4.5 step 2 "happiness ... life-event jitter").
    pub fn stress_delta(self) -> f64 {
        match self {
            KeyEvent::MarketCrash => 1.2,
            KeyEvent::Promotion => -0.8,
            KeyEvent::Layoff => 2.5,
            KeyEvent::UnexpectedExpense => 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinancialState {
    pub net_worth: Money,
    pub income: Money,
    pub expenses: Money,
    pub savings: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerState {
    pub role: Option<String>,
    pub seniority: Score,
    pub market_value: Money,
    pub satisfaction: Score,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LifeState {
    pub happiness: Score,
    pub stress: Score,
    pub balance: Score,
    pub health: Score,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyOutcome {
    pub year: Years,
    pub financial: FinancialState,
    pub career: CareerState,
    pub life: LifeState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcomes {
    pub year1: YearlyOutcome,
    pub year3: YearlyOutcome,
    pub year5: YearlyOutcome,
    pub year10: YearlyOutcome,
}

impl Outcomes {
    pub fn at(&self, year: Years) -> &YearlyOutcome {
        match year {
            1 => &self.year1,
            3 => &self.year3,
            5 => &self.year5,
            10 => &self.year10,
            other => panic!("Outcomes only records horizons {:?}, got {other}", lifesim_core::HORIZONS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u64,
    pub probability: Probability,
    pub conditions: EconomicConditions,
    pub outcomes: Outcomes,
    pub key_events: Vec<KeyEvent>,
}
