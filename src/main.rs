use anyhow::{Context, Result};

use arbiter::{
    cli::args_from_env,
    config::Config,
    goal::TickReport,
    logging::init_tracing,
};

fn main() -> Result<()> {
    let args = args_from_env()?;
    let mut config = match args.config_path.as_deref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(ticks) = args.ticks {
        config.scheduler.ticks = ticks;
    }

    let _logging_guard = init_tracing(&config.logging)?;

    let engine = config.engine()?;
    let selector = config.selector()?;
    let mut scheduler = config.scheduler()?;
    let graph = config.build_graph()?;

    tracing::info!(
        target: "scheduler",
        goals = graph.len(),
        ticks = config.scheduler.ticks,
        "arbitration_started"
    );

    for _ in 0..config.scheduler.ticks {
        let report = scheduler.step(&engine, &graph, selector.as_ref(), &config.state);
        if args.json {
            println!(
                "{}",
                serde_json::to_string(&report).context("failed to encode tick report")?
            );
        } else {
            print_report(&report);
        }
    }

    Ok(())
}

fn print_report(report: &TickReport) {
    println!("--- tick {} (t={:.4}) ---", report.tick, report.t);
    for trace in &report.ranking {
        println!(
            "  {:<16} urgency={:.4} utility={:.4} base={:.4} deps={:.4} traits={:.4} eff={:.4}",
            trace.name,
            trace.urgency,
            trace.utility,
            trace.base,
            trace.dependency_bonus,
            trace.trait_modifier,
            trace.effective_value,
        );
    }
    match report.selection.as_ref() {
        Some(selection) => match selection.probability {
            Some(probability) => println!(
                "selected: {} ({:.4}, p={:.4})",
                selection.goal, selection.value, probability
            ),
            None => println!("selected: {} ({:.4})", selection.goal, selection.value),
        },
        None => println!("selected: none"),
    }
}
