use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::{
    goal::{
        error::ConfigError,
        graph::GoalGraph,
        selector::{ArgMaxSelector, GoalSelector},
        trace::{Evaluation, EvaluationIssue, GoalTrace, Selection, StrategyKind, ValueTerm},
        types::{Goal, GoalId, Trait, TraitSet},
        visit::VisitPath,
    },
    valuation::{NOVELTY_KEY, RISK_KEY, StrategyError, WorldState},
};

fn default_coefficient() -> f64 {
    0.1
}

/// Scale of each trait's additive term, relative to the goal's base value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitCoefficients {
    #[serde(default = "default_coefficient")]
    pub urgency_sensitive: f64,
    #[serde(default = "default_coefficient")]
    pub risk_averse: f64,
    #[serde(default = "default_coefficient")]
    pub exploratory: f64,
}

impl Default for TraitCoefficients {
    fn default() -> Self {
        Self {
            urgency_sensitive: default_coefficient(),
            risk_averse: default_coefficient(),
            exploratory: default_coefficient(),
        }
    }
}

fn default_urgency_min() -> f64 {
    0.0
}

fn default_urgency_max() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrgencyBounds {
    #[serde(default = "default_urgency_min")]
    pub min: f64,
    #[serde(default = "default_urgency_max")]
    pub max: f64,
}

impl Default for UrgencyBounds {
    fn default() -> Self {
        Self {
            min: default_urgency_min(),
            max: default_urgency_max(),
        }
    }
}

impl UrgencyBounds {
    /// Callers must pass a non-NaN value; infinities land on a bound.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub coefficients: TraitCoefficients,
    #[serde(default)]
    pub urgency_bounds: UrgencyBounds,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let UrgencyBounds { min, max } = self.urgency_bounds;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::InvalidUrgencyBounds { min, max });
        }

        let coefficients = [
            ("urgency_sensitive", self.coefficients.urgency_sensitive),
            ("risk_averse", self.coefficients.risk_averse),
            ("exploratory", self.coefficients.exploratory),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteCoefficient { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Breakdown {
    urgency: f64,
    utility: f64,
    base: f64,
    dependency_bonus: f64,
    trait_modifier: f64,
    effective_value: f64,
}

/// Scores goals of a [`GoalGraph`] for a given `(t, state)`.
///
/// Strategy failures and dependency cycles degrade the affected term to
/// `0.0`, are reported as [`EvaluationIssue`]s and logged; they never abort
/// an evaluation.
#[derive(Debug, Clone, Default)]
pub struct EffectiveValueEngine {
    config: EngineConfig,
}

impl EffectiveValueEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn urgency(&self, goal: &Goal, t: f64, issues: &mut Vec<EvaluationIssue>) -> f64 {
        let outcome = guard_strategy(|| goal.urgency.urgency(t)).and_then(|value| {
            if value.is_nan() {
                Err(StrategyError::NonFinite(value))
            } else {
                Ok(value)
            }
        });

        match outcome {
            Ok(value) => self.config.urgency_bounds.clamp(value),
            Err(err) => {
                record_strategy_failure(goal, StrategyKind::Urgency, &err, issues);
                0.0
            }
        }
    }

    pub fn utility(
        &self,
        goal: &Goal,
        state: &WorldState,
        issues: &mut Vec<EvaluationIssue>,
    ) -> f64 {
        let outcome = guard_strategy(|| goal.utility.utility(state)).and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(StrategyError::NonFinite(value))
            }
        });

        match outcome {
            Ok(value) => value,
            Err(err) => {
                record_strategy_failure(goal, StrategyKind::Utility, &err, issues);
                0.0
            }
        }
    }

    /// Additive trait adjustment, applied once to the goal's own base value.
    pub fn trait_modifier(&self, base: f64, state: &WorldState, traits: &TraitSet) -> f64 {
        let coefficients = &self.config.coefficients;
        let mut modifier = 0.0;
        if traits.contains(Trait::UrgencySensitive) {
            modifier += coefficients.urgency_sensitive * base;
        }
        if traits.contains(Trait::RiskAverse) {
            let risk = state.finite_or(RISK_KEY, 0.0);
            modifier += coefficients.risk_averse * (-risk * base);
        }
        if traits.contains(Trait::Exploratory) {
            let novelty = state.finite_or(NOVELTY_KEY, 0.0);
            modifier += coefficients.exploratory * novelty * base;
        }
        modifier
    }

    /// `base + dependency bonus + trait modifier` for `id`.
    ///
    /// `visiting` holds the goals on the current recursion path; it is left as
    /// it was found when this returns. A goal already on the path contributes
    /// `0.0`.
    pub fn effective_value(
        &self,
        graph: &GoalGraph,
        id: GoalId,
        t: f64,
        state: &WorldState,
        visiting: &mut VisitPath,
        issues: &mut Vec<EvaluationIssue>,
    ) -> f64 {
        self.resolve(graph, id, t, state, visiting, issues)
            .map_or(0.0, |breakdown| breakdown.effective_value)
    }

    pub fn describe(
        &self,
        graph: &GoalGraph,
        id: GoalId,
        t: f64,
        state: &WorldState,
    ) -> Option<GoalTrace> {
        let goal = graph.get(id)?;
        let mut visiting = VisitPath::new();
        let mut issues = Vec::new();
        let breakdown = self.resolve(graph, id, t, state, &mut visiting, &mut issues)?;

        Some(GoalTrace {
            name: goal.name.clone(),
            traits: goal.traits.iter().collect(),
            urgency: breakdown.urgency,
            utility: breakdown.utility,
            weight: goal.weight,
            base: breakdown.base,
            dependency_bonus: breakdown.dependency_bonus,
            trait_modifier: breakdown.trait_modifier,
            effective_value: breakdown.effective_value,
            issues,
        })
    }

    pub fn evaluate(&self, graph: &GoalGraph, t: f64, state: &WorldState) -> Evaluation {
        let traces: Vec<GoalTrace> = graph
            .ids()
            .filter_map(|id| self.describe(graph, id, t, state))
            .collect();

        tracing::debug!(
            target: "engine",
            t = t,
            goals = traces.len(),
            issues = traces.iter().map(|trace| trace.issues.len()).sum::<usize>(),
            "evaluation_completed"
        );

        Evaluation { t, traces }
    }

    /// Highest effective value in insertion order; the earliest goal wins a
    /// tie. `None` only for an empty graph.
    pub fn select_top(&self, graph: &GoalGraph, t: f64, state: &WorldState) -> Option<Selection> {
        let evaluation = self.evaluate(graph, t, state);
        ArgMaxSelector.select(&evaluation.traces)
    }

    fn resolve(
        &self,
        graph: &GoalGraph,
        id: GoalId,
        t: f64,
        state: &WorldState,
        visiting: &mut VisitPath,
        issues: &mut Vec<EvaluationIssue>,
    ) -> Option<Breakdown> {
        let Some(goal) = graph.get(id) else {
            tracing::warn!(target: "engine", goal_id = id.index(), "goal_id_out_of_range");
            return None;
        };

        if !visiting.enter(id) {
            let path: Vec<String> = visiting
                .as_slice()
                .iter()
                .filter_map(|entry| graph.get(*entry))
                .map(|entry| entry.name.clone())
                .collect();
            tracing::warn!(
                target: "engine",
                goal = %goal.name,
                path = ?path,
                "dependency_cycle_truncated"
            );
            issues.push(EvaluationIssue::CycleDetected {
                goal: goal.name.clone(),
                path,
            });
            return None;
        }

        let urgency = self.urgency(goal, t, issues);
        let utility = self.utility(goal, state, issues);
        let base = finite_term(goal, ValueTerm::Base, urgency * utility * goal.weight, issues);

        let mut dependency_bonus = 0.0;
        for dependency in &goal.dependencies {
            dependency_bonus +=
                self.effective_value(graph, *dependency, t, state, visiting, issues);
        }
        visiting.leave(id);
        let dependency_bonus =
            finite_term(goal, ValueTerm::DependencyBonus, dependency_bonus, issues);

        let trait_modifier = finite_term(
            goal,
            ValueTerm::TraitModifier,
            self.trait_modifier(base, state, &goal.traits),
            issues,
        );
        let effective_value = finite_term(
            goal,
            ValueTerm::EffectiveValue,
            base + dependency_bonus + trait_modifier,
            issues,
        );

        Some(Breakdown {
            urgency,
            utility,
            base,
            dependency_bonus,
            trait_modifier,
            effective_value,
        })
    }
}

fn guard_strategy(call: impl FnOnce() -> Result<f64, StrategyError>) -> Result<f64, StrategyError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|text| text.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(StrategyError::Panicked(message))
        }
    }
}

fn finite_term(
    goal: &Goal,
    term: ValueTerm,
    value: f64,
    issues: &mut Vec<EvaluationIssue>,
) -> f64 {
    if value.is_finite() {
        return value;
    }
    tracing::warn!(
        target: "engine",
        goal = %goal.name,
        term = ?term,
        value = value,
        "non_finite_value_zeroed"
    );
    issues.push(EvaluationIssue::NonFiniteValue {
        goal: goal.name.clone(),
        term,
    });
    0.0
}

fn record_strategy_failure(
    goal: &Goal,
    strategy: StrategyKind,
    err: &StrategyError,
    issues: &mut Vec<EvaluationIssue>,
) {
    tracing::warn!(
        target: "engine",
        goal = %goal.name,
        strategy = ?strategy,
        error = %err,
        "strategy_failed_zeroed"
    );
    issues.push(EvaluationIssue::StrategyFailed {
        goal: goal.name.clone(),
        strategy,
        reason: err.to_string(),
    });
}
