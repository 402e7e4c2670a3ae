use std::fmt;

use crate::valuation::error::StrategyError;

/// Time-dependent pressure of a goal.
///
/// Implementations should be non-negative and non-increasing in `t` for
/// arbitration to settle; the engine clamps whatever comes back but does not
/// check either property.
pub trait UrgencyStrategy: fmt::Debug + Send + Sync {
    fn urgency(&self, t: f64) -> Result<f64, StrategyError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantUrgency(pub f64);

impl UrgencyStrategy for ConstantUrgency {
    fn urgency(&self, _t: f64) -> Result<f64, StrategyError> {
        Ok(self.0)
    }
}

/// `t / horizon`, saturating at 1.0 once `t >= horizon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRamp {
    pub horizon: f64,
}

impl LinearRamp {
    pub fn new(horizon: f64) -> Self {
        Self { horizon }
    }
}

impl UrgencyStrategy for LinearRamp {
    fn urgency(&self, t: f64) -> Result<f64, StrategyError> {
        if self.horizon <= 0.0 {
            return Err(StrategyError::failed(format!(
                "ramp horizon must be positive, got {}",
                self.horizon
            )));
        }
        Ok((t / self.horizon).clamp(0.0, 1.0))
    }
}

/// `max(0, 1 - t / horizon)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDecay {
    pub horizon: f64,
}

impl LinearDecay {
    pub fn new(horizon: f64) -> Self {
        Self { horizon }
    }
}

impl UrgencyStrategy for LinearDecay {
    fn urgency(&self, t: f64) -> Result<f64, StrategyError> {
        if self.horizon <= 0.0 {
            return Err(StrategyError::failed(format!(
                "decay horizon must be positive, got {}",
                self.horizon
            )));
        }
        Ok((1.0 - t / self.horizon).max(0.0))
    }
}

/// `factor^t`, modelling fatigue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricDecay {
    pub factor: f64,
}

impl GeometricDecay {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl UrgencyStrategy for GeometricDecay {
    fn urgency(&self, t: f64) -> Result<f64, StrategyError> {
        Ok(self.factor.powf(t))
    }
}

/// Adapter for caller-supplied urgency closures.
pub struct UrgencyFn<F> {
    label: &'static str,
    func: F,
}

impl<F> UrgencyFn<F> {
    pub fn new(label: &'static str, func: F) -> Self
    where
        F: Fn(f64) -> Result<f64, StrategyError> + Send + Sync,
    {
        Self { label, func }
    }
}

impl<F> fmt::Debug for UrgencyFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UrgencyFn").field(&self.label).finish()
    }
}

impl<F> UrgencyStrategy for UrgencyFn<F>
where
    F: Fn(f64) -> Result<f64, StrategyError> + Send + Sync,
{
    fn urgency(&self, t: f64) -> Result<f64, StrategyError> {
        (self.func)(t)
    }
}
