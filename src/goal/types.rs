use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::valuation::{UrgencyStrategy, UtilityStrategy};

pub type GoalName = String;

pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Position of a goal in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(pub(crate) usize);

impl GoalId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trait {
    UrgencySensitive,
    RiskAverse,
    Exploratory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitSet(BTreeSet<Trait>);

impl TraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, value: Trait) -> Self {
        self.0.insert(value);
        self
    }

    pub fn insert(&mut self, value: Trait) -> bool {
        self.0.insert(value)
    }

    pub fn contains(&self, value: Trait) -> bool {
        self.0.contains(&value)
    }

    pub fn iter(&self) -> impl Iterator<Item = Trait> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Trait> for TraitSet {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A goal as declared by the caller, before dependency names are resolved.
#[derive(Debug)]
pub struct GoalSpec {
    pub name: GoalName,
    pub urgency: Box<dyn UrgencyStrategy>,
    pub utility: Box<dyn UtilityStrategy>,
    pub weight: f64,
    pub traits: TraitSet,
    pub dependencies: Vec<GoalName>,
}

impl GoalSpec {
    pub fn new(
        name: impl Into<GoalName>,
        urgency: impl UrgencyStrategy + 'static,
        utility: impl UtilityStrategy + 'static,
    ) -> Self {
        Self::boxed(name, Box::new(urgency), Box::new(utility))
    }

    pub fn boxed(
        name: impl Into<GoalName>,
        urgency: Box<dyn UrgencyStrategy>,
        utility: Box<dyn UtilityStrategy>,
    ) -> Self {
        Self {
            name: name.into(),
            urgency,
            utility,
            weight: DEFAULT_WEIGHT,
            traits: TraitSet::default(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_traits(mut self, traits: impl IntoIterator<Item = Trait>) -> Self {
        self.traits = traits.into_iter().collect();
        self
    }

    pub fn depends_on(mut self, dependency: impl Into<GoalName>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }
}

/// A goal owned by a built [`crate::goal::GoalGraph`].
#[derive(Debug)]
pub struct Goal {
    pub(crate) name: GoalName,
    pub(crate) urgency: Box<dyn UrgencyStrategy>,
    pub(crate) utility: Box<dyn UtilityStrategy>,
    pub(crate) weight: f64,
    pub(crate) traits: TraitSet,
    pub(crate) dependencies: Vec<GoalId>,
}

impl Goal {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn traits(&self) -> &TraitSet {
        &self.traits
    }

    pub fn dependencies(&self) -> &[GoalId] {
        &self.dependencies
    }
}
