//! Problems and the tier-indexed generator table
//!
//! A problem is generated fresh for every attempt and thrown away once
//! answered. Correct answers are exact fixed-point values; only the
//! fractional topics compare with a tolerance.

pub mod answer;
pub mod generator;

pub use answer::{Answer, RejectReason, Tolerance};
pub use generator::generate_problem;

use serde::{Deserialize, Serialize};

use crate::core::types::Tier;

/// What skill a problem exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Addition,
    Subtraction,
    ExactDivision,
    DecimalShift,
    /// Printed as `(n)/(d) × (d)`: recognising that the denominator cancels.
    /// Historically labelled "fraction simplification".
    FractionCancellation,
    PercentOf,
    RatioTotal,
    PercentIncrease,
    OneStepEquation,
    TwoStepEquation,
}

impl Topic {
    /// The topic tier `tier` draws from
    pub fn for_tier(tier: Tier) -> Topic {
        match tier.value() {
            1 => Topic::Addition,
            2 => Topic::Subtraction,
            3 => Topic::ExactDivision,
            4 => Topic::DecimalShift,
            5 => Topic::FractionCancellation,
            6 => Topic::PercentOf,
            7 => Topic::RatioTotal,
            8 => Topic::PercentIncrease,
            9 => Topic::OneStepEquation,
            _ => Topic::TwoStepEquation,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Topic::Addition => "addition",
            Topic::Subtraction => "subtraction",
            Topic::ExactDivision => "division",
            Topic::DecimalShift => "decimals",
            Topic::FractionCancellation => "fractions",
            Topic::PercentOf => "percents",
            Topic::RatioTotal => "ratios",
            Topic::PercentIncrease => "percent_change",
            Topic::OneStepEquation => "one_step_equations",
            Topic::TwoStepEquation => "two_step_equations",
        }
    }

    /// Topics whose answers may carry decimals
    pub fn is_fractional(self) -> bool {
        matches!(self, Topic::DecimalShift | Topic::PercentIncrease)
    }
}

/// A single generated question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub tier: Tier,
    pub topic: Topic,
    pub question_text: String,
    pub correct_answer: Answer,
}

impl Problem {
    pub fn new(tier: Tier, question_text: impl Into<String>, correct_answer: Answer) -> Self {
        let topic = Topic::for_tier(tier);
        debug_assert!(
            topic.is_fractional() || correct_answer.is_whole(),
            "tier {} produced fractional answer {}",
            tier,
            correct_answer
        );
        Self {
            tier,
            topic,
            question_text: question_text.into(),
            correct_answer,
        }
    }

    pub fn topic_tag(&self) -> &'static str {
        self.topic.tag()
    }

    /// Comparison rule for this problem given the configured fractional tolerance
    pub fn tolerance(&self, fractional_tolerance_hundredths: u32) -> Tolerance {
        if self.topic.is_fractional() {
            Tolerance::Within(fractional_tolerance_hundredths)
        } else {
            Tolerance::Exact
        }
    }

    pub fn is_correct(&self, submitted: Answer, fractional_tolerance_hundredths: u32) -> bool {
        self.correct_answer
            .accepts(submitted, self.tolerance(fractional_tolerance_hundredths))
    }
}
