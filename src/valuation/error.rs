use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("strategy failed: {0}")]
    Failed(String),
    #[error("strategy returned non-finite value {0}")]
    NonFinite(f64),
    #[error("strategy panicked: {0}")]
    Panicked(String),
}

impl StrategyError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    #[error("{strategy} horizon must be finite and positive, got {value}")]
    InvalidHorizon { strategy: &'static str, value: f64 },
    #[error("geometric decay factor must be within [0, 1], got {0}")]
    InvalidDecayFactor(f64),
    #[error("{field} must be finite, got {value}")]
    NonFiniteParameter { field: &'static str, value: f64 },
    #[error("state key cannot be empty")]
    EmptyStateKey,
}
