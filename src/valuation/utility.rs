use std::fmt;

use crate::valuation::{error::StrategyError, state::WorldState};

/// State-dependent value of achieving a goal. Expected to stay bounded over
/// the states it is fed; the engine does not clamp it.
pub trait UtilityStrategy: fmt::Debug + Send + Sync {
    fn utility(&self, state: &WorldState) -> Result<f64, StrategyError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantUtility(pub f64);

impl UtilityStrategy for ConstantUtility {
    fn utility(&self, _state: &WorldState) -> Result<f64, StrategyError> {
        Ok(self.0)
    }
}

/// Reads one state key, scaled. `novelty * 2.0` is the curiosity utility.
#[derive(Debug, Clone, PartialEq)]
pub struct StateKey {
    pub key: String,
    pub default: f64,
    pub scale: f64,
}

impl StateKey {
    pub fn new(key: impl Into<String>, default: f64) -> Self {
        Self::scaled(key, default, 1.0)
    }

    pub fn scaled(key: impl Into<String>, default: f64, scale: f64) -> Self {
        Self {
            key: key.into(),
            default,
            scale,
        }
    }
}

impl UtilityStrategy for StateKey {
    fn utility(&self, state: &WorldState) -> Result<f64, StrategyError> {
        Ok(state.get_or(&self.key, self.default) * self.scale)
    }
}

/// `1 - state[key]`, e.g. safety as the complement of danger.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseStateKey {
    pub key: String,
    pub default: f64,
}

impl InverseStateKey {
    pub fn new(key: impl Into<String>, default: f64) -> Self {
        Self {
            key: key.into(),
            default,
        }
    }
}

impl UtilityStrategy for InverseStateKey {
    fn utility(&self, state: &WorldState) -> Result<f64, StrategyError> {
        Ok(1.0 - state.get_or(&self.key, self.default))
    }
}

/// Adapter for caller-supplied utility closures.
pub struct UtilityFn<F> {
    label: &'static str,
    func: F,
}

impl<F> UtilityFn<F> {
    pub fn new(label: &'static str, func: F) -> Self
    where
        F: Fn(&WorldState) -> Result<f64, StrategyError> + Send + Sync,
    {
        Self { label, func }
    }
}

impl<F> fmt::Debug for UtilityFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UtilityFn").field(&self.label).finish()
    }
}

impl<F> UtilityStrategy for UtilityFn<F>
where
    F: Fn(&WorldState) -> Result<f64, StrategyError> + Send + Sync,
{
    fn utility(&self, state: &WorldState) -> Result<f64, StrategyError> {
        (self.func)(state)
    }
}
