use thiserror::Error;

use crate::goal::types::GoalName;

/// Configuration mistakes caught while the graph is being built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("goal name cannot be empty")]
    EmptyGoalName,
    #[error("duplicate goal '{0}'")]
    DuplicateGoal(GoalName),
    #[error("goal '{goal}' has non-finite weight {weight}")]
    InvalidWeight { goal: GoalName, weight: f64 },
    #[error("unknown goal '{0}'")]
    UnknownGoal(GoalName),
    #[error("goal '{goal}' depends on unknown goal '{dependency}'")]
    UnknownGoalReference {
        goal: GoalName,
        dependency: GoalName,
    },
}

/// Invalid engine, selector or scheduler parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("urgency bounds must be finite with min <= max, got [{min}, {max}]")]
    InvalidUrgencyBounds { min: f64, max: f64 },
    #[error("trait coefficient {name} must be finite, got {value}")]
    NonFiniteCoefficient { name: &'static str, value: f64 },
    #[error("softmax temperature must be finite and positive, got {0}")]
    InvalidTemperature(f64),
    #[error("scheduler start must be finite, got {0}")]
    InvalidTickStart(f64),
    #[error("scheduler dt must be finite and positive, got {0}")]
    InvalidTickInterval(f64),
}
