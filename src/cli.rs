use std::{env, path::PathBuf};

use anyhow::{Context, Result, anyhow};

const USAGE: &str = "usage: arbiter [--config <path>] [--ticks <n>] [--json]";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub ticks: Option<u64>,
    pub json: bool,
}

pub fn args_from_env() -> Result<CliArgs> {
    parse_args(env::args().skip(1))
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--ticks" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --ticks"))?;
                let ticks = value
                    .parse::<u64>()
                    .with_context(|| format!("invalid --ticks value '{value}'"))?;
                parsed.ticks = Some(ticks);
            }
            "--json" => parsed.json = true,
            other => {
                return Err(anyhow!("unknown argument: {other}. {USAGE}"));
            }
        }
    }

    Ok(parsed)
}
