use serde::{Deserialize, Serialize};

use crate::valuation::{
    error::SpecError,
    urgency::{ConstantUrgency, GeometricDecay, LinearDecay, LinearRamp, UrgencyStrategy},
    utility::{ConstantUtility, InverseStateKey, StateKey, UtilityStrategy},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UrgencySpec {
    Constant { value: f64 },
    Ramp { horizon: f64 },
    Decay { horizon: f64 },
    Geometric { factor: f64 },
}

impl UrgencySpec {
    pub fn build(&self) -> Result<Box<dyn UrgencyStrategy>, SpecError> {
        match *self {
            Self::Constant { value } => {
                ensure_finite("urgency.value", value)?;
                Ok(Box::new(ConstantUrgency(value)))
            }
            Self::Ramp { horizon } => {
                ensure_horizon("ramp", horizon)?;
                Ok(Box::new(LinearRamp::new(horizon)))
            }
            Self::Decay { horizon } => {
                ensure_horizon("decay", horizon)?;
                Ok(Box::new(LinearDecay::new(horizon)))
            }
            Self::Geometric { factor } => {
                if !(0.0..=1.0).contains(&factor) {
                    return Err(SpecError::InvalidDecayFactor(factor));
                }
                Ok(Box::new(GeometricDecay::new(factor)))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UtilitySpec {
    Constant {
        value: f64,
    },
    StateKey {
        key: String,
        #[serde(default)]
        default: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    InverseStateKey {
        key: String,
        #[serde(default)]
        default: f64,
    },
}

fn default_scale() -> f64 {
    1.0
}

impl UtilitySpec {
    pub fn build(&self) -> Result<Box<dyn UtilityStrategy>, SpecError> {
        match self {
            Self::Constant { value } => {
                ensure_finite("utility.value", *value)?;
                Ok(Box::new(ConstantUtility(*value)))
            }
            Self::StateKey {
                key,
                default,
                scale,
            } => {
                ensure_key(key)?;
                ensure_finite("utility.default", *default)?;
                ensure_finite("utility.scale", *scale)?;
                Ok(Box::new(StateKey::scaled(key.clone(), *default, *scale)))
            }
            Self::InverseStateKey { key, default } => {
                ensure_key(key)?;
                ensure_finite("utility.default", *default)?;
                Ok(Box::new(InverseStateKey::new(key.clone(), *default)))
            }
        }
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), SpecError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SpecError::NonFiniteParameter { field, value })
    }
}

fn ensure_horizon(strategy: &'static str, value: f64) -> Result<(), SpecError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpecError::InvalidHorizon { strategy, value })
    }
}

fn ensure_key(key: &str) -> Result<(), SpecError> {
    if key.trim().is_empty() {
        Err(SpecError::EmptyStateKey)
    } else {
        Ok(())
    }
}
