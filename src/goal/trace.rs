use serde::{Deserialize, Serialize};

use crate::goal::types::{GoalName, Trait};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Urgency,
    Utility,
}

/// Intermediate quantity of a goal's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTerm {
    Base,
    DependencyBonus,
    TraitModifier,
    EffectiveValue,
}

/// Recoverable problem met while scoring. None of these abort evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvaluationIssue {
    StrategyFailed {
        goal: GoalName,
        strategy: StrategyKind,
        reason: String,
    },
    CycleDetected {
        goal: GoalName,
        path: Vec<GoalName>,
    },
    /// Finite inputs overflowed while combining; the term was zeroed.
    NonFiniteValue { goal: GoalName, term: ValueTerm },
}

impl EvaluationIssue {
    pub fn goal(&self) -> &str {
        match self {
            Self::StrategyFailed { goal, .. }
            | Self::CycleDetected { goal, .. }
            | Self::NonFiniteValue { goal, .. } => goal,
        }
    }
}

/// Full-precision breakdown of one goal's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTrace {
    pub name: GoalName,
    pub traits: Vec<Trait>,
    pub urgency: f64,
    pub utility: f64,
    pub weight: f64,
    pub base: f64,
    pub dependency_bonus: f64,
    pub trait_modifier: f64,
    pub effective_value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<EvaluationIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub t: f64,
    /// One trace per goal, in graph insertion order.
    pub traces: Vec<GoalTrace>,
}

impl Evaluation {
    pub fn trace(&self, name: &str) -> Option<&GoalTrace> {
        self.traces.iter().find(|trace| trace.name == name)
    }

    pub fn issues(&self) -> impl Iterator<Item = &EvaluationIssue> {
        self.traces.iter().flat_map(|trace| trace.issues.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub goal: GoalName,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}
