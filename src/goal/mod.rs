pub mod engine;
pub mod error;
pub mod graph;
pub mod scheduler;
pub mod selector;
pub mod trace;
pub mod types;
pub mod visit;

pub use engine::{EffectiveValueEngine, EngineConfig, TraitCoefficients, UrgencyBounds};
pub use error::{ConfigError, GraphError};
pub use graph::{GoalGraph, GoalGraphBuilder};
pub use scheduler::{TickReport, TickScheduler};
pub use selector::{
    ArgMaxSelector, GoalSelector, SelectorConfig, SoftmaxSelector, rank, softmax,
};
pub use trace::{Evaluation, EvaluationIssue, GoalTrace, Selection, StrategyKind, ValueTerm};
pub use types::{DEFAULT_WEIGHT, Goal, GoalId, GoalName, GoalSpec, Trait, TraitSet};
pub use visit::VisitPath;
