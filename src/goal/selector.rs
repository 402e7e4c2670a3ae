use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::goal::{
    error::ConfigError,
    trace::{GoalTrace, Selection},
};

pub trait GoalSelector: Send + Sync {
    fn select(&self, traces: &[GoalTrace]) -> Option<Selection>;
}

/// Strict arg-max: the first trace with the greatest value wins ties.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgMaxSelector;

impl GoalSelector for ArgMaxSelector {
    fn select(&self, traces: &[GoalTrace]) -> Option<Selection> {
        let best = first_max(traces.iter().map(|trace| trace.effective_value))?;
        let trace = &traces[best];
        Some(Selection {
            goal: trace.name.clone(),
            value: trace.effective_value,
            probability: None,
        })
    }
}

/// Picks the most probable goal under a softmax over effective values and
/// reports its probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftmaxSelector {
    temperature: f64,
}

impl SoftmaxSelector {
    pub fn new(temperature: f64) -> Result<Self, ConfigError> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        Ok(Self { temperature })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn probabilities(&self, traces: &[GoalTrace]) -> Vec<f64> {
        let values: Vec<f64> = traces.iter().map(|trace| trace.effective_value).collect();
        softmax(&values, self.temperature)
    }
}

impl GoalSelector for SoftmaxSelector {
    fn select(&self, traces: &[GoalTrace]) -> Option<Selection> {
        let probabilities = self.probabilities(traces);
        let best = first_max(probabilities.iter().copied())?;
        let trace = &traces[best];
        Some(Selection {
            goal: trace.name.clone(),
            value: trace.effective_value,
            probability: Some(probabilities[best]),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SelectorConfig {
    #[default]
    ArgMax,
    Softmax {
        temperature: f64,
    },
}

impl SelectorConfig {
    pub fn build(&self) -> Result<Box<dyn GoalSelector>, ConfigError> {
        match *self {
            Self::ArgMax => Ok(Box::new(ArgMaxSelector)),
            Self::Softmax { temperature } => Ok(Box::new(SoftmaxSelector::new(temperature)?)),
        }
    }
}

/// Max-shifted softmax. Empty in, empty out.
pub fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    let Some(max) = values.iter().copied().reduce(f64::max) else {
        return Vec::new();
    };
    let exps: Vec<f64> = values
        .iter()
        .map(|value| ((value - max) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|value| value / total).collect()
}

/// Traces ordered by descending effective value; equal values keep their
/// original order.
pub fn rank(traces: &[GoalTrace]) -> Vec<GoalTrace> {
    let mut ranked = traces.to_vec();
    ranked.sort_by(|lhs, rhs| {
        rhs.effective_value
            .partial_cmp(&lhs.effective_value)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

fn first_max(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (position, value) in values.enumerate() {
        match best {
            Some((_, current)) if value <= current || value.is_nan() => {}
            _ => best = Some((position, value)),
        }
    }
    best.map(|(position, _)| position)
}
