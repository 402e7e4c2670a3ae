use std::collections::BTreeMap;

use crate::goal::{
    error::GraphError,
    types::{Goal, GoalId, GoalName, GoalSpec},
};

/// Collects goal declarations and resolves dependency names once, in
/// [`GoalGraphBuilder::build`]. Forward references are allowed while building.
#[derive(Debug, Default)]
pub struct GoalGraphBuilder {
    specs: Vec<GoalSpec>,
    index: BTreeMap<GoalName, usize>,
}

impl GoalGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_goal(&mut self, spec: GoalSpec) -> Result<GoalId, GraphError> {
        if spec.name.trim().is_empty() {
            return Err(GraphError::EmptyGoalName);
        }
        if self.index.contains_key(&spec.name) {
            return Err(GraphError::DuplicateGoal(spec.name));
        }
        if !spec.weight.is_finite() {
            return Err(GraphError::InvalidWeight {
                goal: spec.name,
                weight: spec.weight,
            });
        }

        let slot = self.specs.len();
        self.index.insert(spec.name.clone(), slot);
        self.specs.push(spec);
        Ok(GoalId(slot))
    }

    pub fn with_goal(mut self, spec: GoalSpec) -> Result<Self, GraphError> {
        self.add_goal(spec)?;
        Ok(self)
    }

    pub fn add_dependency(
        &mut self,
        goal: &str,
        dependency: impl Into<GoalName>,
    ) -> Result<(), GraphError> {
        let slot = *self
            .index
            .get(goal)
            .ok_or_else(|| GraphError::UnknownGoal(goal.to_string()))?;
        self.specs[slot].dependencies.push(dependency.into());
        Ok(())
    }

    pub fn build(self) -> Result<GoalGraph, GraphError> {
        let index: BTreeMap<GoalName, GoalId> = self
            .index
            .into_iter()
            .map(|(name, slot)| (name, GoalId(slot)))
            .collect();

        let mut goals = Vec::with_capacity(self.specs.len());
        let mut edges = 0usize;
        for spec in self.specs {
            let mut dependencies = Vec::with_capacity(spec.dependencies.len());
            for dependency in &spec.dependencies {
                let id = index.get(dependency).copied().ok_or_else(|| {
                    GraphError::UnknownGoalReference {
                        goal: spec.name.clone(),
                        dependency: dependency.clone(),
                    }
                })?;
                dependencies.push(id);
            }
            edges = edges.saturating_add(dependencies.len());

            goals.push(Goal {
                name: spec.name,
                urgency: spec.urgency,
                utility: spec.utility,
                weight: spec.weight,
                traits: spec.traits,
                dependencies,
            });
        }

        tracing::debug!(
            target: "graph",
            goals = goals.len(),
            edges = edges,
            "goal_graph_built"
        );

        Ok(GoalGraph { goals, index })
    }
}

/// Arena of goals, iterated in insertion order.
#[derive(Debug)]
pub struct GoalGraph {
    goals: Vec<Goal>,
    index: BTreeMap<GoalName, GoalId>,
}

impl GoalGraph {
    pub fn builder() -> GoalGraphBuilder {
        GoalGraphBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn get(&self, id: GoalId) -> Option<&Goal> {
        self.goals.get(id.0)
    }

    pub fn id_of(&self, name: &str) -> Option<GoalId> {
        self.index.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Goal> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = GoalId> + '_ {
        (0..self.goals.len()).map(GoalId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GoalId, &Goal)> {
        self.goals
            .iter()
            .enumerate()
            .map(|(slot, goal)| (GoalId(slot), goal))
    }
}
