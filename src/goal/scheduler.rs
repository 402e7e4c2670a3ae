use serde::{Deserialize, Serialize};

use crate::{
    goal::{
        engine::EffectiveValueEngine,
        error::ConfigError,
        graph::GoalGraph,
        selector::{GoalSelector, rank},
        trace::{EvaluationIssue, GoalTrace, Selection},
    },
    valuation::WorldState,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub t: f64,
    #[serde(default)]
    pub selection: Option<Selection>,
    /// Every goal's trace, highest effective value first.
    pub ranking: Vec<GoalTrace>,
    /// Issues of every trace, in graph order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<EvaluationIssue>,
}

/// Advances time in fixed steps and arbitrates once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickScheduler {
    start: f64,
    dt: f64,
    tick: u64,
}

impl TickScheduler {
    pub fn new(start: f64, dt: f64) -> Result<Self, ConfigError> {
        if !start.is_finite() {
            return Err(ConfigError::InvalidTickStart(start));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidTickInterval(dt));
        }
        Ok(Self { start, dt, tick: 0 })
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Time the next [`TickScheduler::step`] evaluates at.
    pub fn t(&self) -> f64 {
        self.start + self.tick as f64 * self.dt
    }

    pub fn step(
        &mut self,
        engine: &EffectiveValueEngine,
        graph: &GoalGraph,
        selector: &dyn GoalSelector,
        state: &WorldState,
    ) -> TickReport {
        let tick = self.tick;
        let t = self.t();
        let evaluation = engine.evaluate(graph, t, state);
        let selection = selector.select(&evaluation.traces);
        let ranking = rank(&evaluation.traces);
        let issues: Vec<EvaluationIssue> = evaluation.issues().cloned().collect();

        match selection.as_ref() {
            Some(selected) => tracing::info!(
                target: "scheduler",
                tick = tick,
                t = t,
                goal = %selected.goal,
                value = selected.value,
                issues = issues.len(),
                "tick_goal_selected"
            ),
            None => tracing::info!(target: "scheduler", tick = tick, t = t, "tick_no_goal"),
        }

        self.tick = self.tick.saturating_add(1);
        TickReport {
            tick,
            t,
            selection,
            ranking,
            issues,
        }
    }

    pub fn reset(&mut self) {
        self.tick = 0;
    }
}
