use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const RISK_KEY: &str = "risk";
pub const NOVELTY_KEY: &str = "novelty";

/// Snapshot of the environment a utility strategy reads from.
///
/// Evaluation only borrows the state; missing keys are resolved by whichever
/// strategy reads them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldState {
    values: BTreeMap<String, f64>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Like [`WorldState::get_or`], but a NaN or infinite entry also yields
    /// the default.
    pub fn finite_or(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            Some(value) if value.is_finite() => value,
            _ => default,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for WorldState {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }
}
