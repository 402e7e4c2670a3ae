use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    goal::{
        EffectiveValueEngine, EngineConfig, GoalGraph, GoalSelector, GoalSpec, SelectorConfig,
        TickScheduler, Trait,
    },
    valuation::{UrgencySpec, UtilitySpec, WorldState},
};

const SCHEMA_FILE_NAME: &str = "arbiter.schema.json";
const EMBEDDED_SCHEMA: &str = include_str!("../arbiter.schema.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default = "default_state")]
    pub state: WorldState,
    #[serde(default = "default_goals")]
    pub goals: Vec<GoalConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            engine: EngineConfig::default(),
            selector: SelectorConfig::default(),
            scheduler: SchedulerConfig::default(),
            state: default_state(),
            goals: default_goals(),
        }
    }
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_rotation() -> LoggingRotation {
    LoggingRotation::Daily
}

fn default_enabled_true() -> bool {
    true
}

fn default_tick_dt() -> f64 {
    1.0
}

fn default_ticks() -> u64 {
    10
}

fn default_weight() -> f64 {
    crate::goal::DEFAULT_WEIGHT
}

fn default_state() -> WorldState {
    WorldState::new().with("novelty", 0.8).with("danger", 0.3)
}

fn default_goals() -> Vec<GoalConfig> {
    let ramp = UrgencySpec::Ramp { horizon: 10.0 };
    vec![
        GoalConfig {
            name: "MasterGoal".to_string(),
            urgency: ramp.clone(),
            utility: UtilitySpec::Constant { value: 0.5 },
            weight: default_weight(),
            traits: Vec::new(),
            dependencies: vec!["Explore".to_string(), "Survive".to_string()],
        },
        GoalConfig {
            name: "Explore".to_string(),
            urgency: ramp.clone(),
            utility: UtilitySpec::StateKey {
                key: "novelty".to_string(),
                default: 0.0,
                scale: 2.0,
            },
            weight: default_weight(),
            traits: Vec::new(),
            dependencies: Vec::new(),
        },
        GoalConfig {
            name: "Survive".to_string(),
            urgency: ramp,
            utility: UtilitySpec::InverseStateKey {
                key: "danger".to_string(),
                default: 0.0,
            },
            weight: default_weight(),
            traits: Vec::new(),
            dependencies: Vec::new(),
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LoggingRotation {
    Daily,
    Hourly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    /// JSON log files are written here when set.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_logging_rotation")]
    pub rotation: LoggingRotation,
    #[serde(default = "default_enabled_true")]
    pub stderr_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_logging_filter(),
            dir: None,
            rotation: default_logging_rotation(),
            stderr_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub start: f64,
    #[serde(default = "default_tick_dt")]
    pub dt: f64,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            dt: default_tick_dt(),
            ticks: default_ticks(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    pub name: String,
    pub urgency: UrgencySpec,
    pub utility: UtilitySpec,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub traits: Vec<Trait>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl GoalConfig {
    pub fn to_spec(&self) -> Result<GoalSpec> {
        let urgency = self
            .urgency
            .build()
            .with_context(|| format!("invalid urgency for goal '{}'", self.name))?;
        let utility = self
            .utility
            .build()
            .with_context(|| format!("invalid utility for goal '{}'", self.name))?;

        let mut spec = GoalSpec::boxed(self.name.clone(), urgency, utility)
            .with_weight(self.weight)
            .with_traits(self.traits.iter().copied());
        spec.dependencies = self.dependencies.clone();
        Ok(spec)
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema = load_schema(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema)?;

        let mut config: Config =
            serde_json::from_value(config_value).context("failed to deserialize config")?;

        if let Some(dir) = config.logging.dir.as_mut()
            && !dir.is_absolute()
        {
            *dir = config_base.join(&*dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the parameters JSON schema cannot express, such as
    /// `urgency_bounds.min <= urgency_bounds.max`.
    pub fn validate(&self) -> Result<()> {
        self.engine.validate().context("invalid engine config")?;
        self.selector.build().context("invalid selector config")?;
        self.scheduler()?;
        Ok(())
    }

    pub fn engine(&self) -> Result<EffectiveValueEngine> {
        EffectiveValueEngine::new(self.engine).context("invalid engine config")
    }

    pub fn selector(&self) -> Result<Box<dyn GoalSelector>> {
        self.selector.build().context("invalid selector config")
    }

    pub fn scheduler(&self) -> Result<TickScheduler> {
        TickScheduler::new(self.scheduler.start, self.scheduler.dt)
            .context("invalid scheduler config")
    }

    pub fn build_graph(&self) -> Result<GoalGraph> {
        let mut builder = GoalGraph::builder();
        for goal in &self.goals {
            builder.add_goal(goal.to_spec()?)?;
        }
        builder.build().context("failed to build goal graph")
    }
}

fn load_schema(config_base: &Path, config_value: &Value) -> Result<Value> {
    let schema_path = match config_value.get("$schema").and_then(|value| value.as_str()) {
        Some(path_text) => {
            let configured = PathBuf::from(path_text);
            Some(if configured.is_absolute() {
                configured
            } else {
                config_base.join(configured)
            })
        }
        None => Some(config_base.join(SCHEMA_FILE_NAME)).filter(|path| path.exists()),
    };

    let Some(schema_path) = schema_path else {
        return serde_json::from_str(EMBEDDED_SCHEMA).context("failed to parse embedded schema");
    };

    let schema_content = fs::read_to_string(&schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))
}

fn validate_against_schema(config_value: &Value, schema: &Value) -> Result<()> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
