//! Plan Binary
//!
//! Grounds and simulates an action sequence against a scene file, then
//! prints the first solution or the diagnosis of why there is none.
//!
//! Options: --threads, --dt, --scaling, --early-exit, --sentinel, --rich

use clap::Parser;
use colored::Colorize;
use roboplan::*;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about = "Predict a robot action sequence before executing it", long_about = None)]
struct Args {
    /// Scene description (JSON), optionally with a `planner` section
    #[arg(long, short)]
    scene: std::path::PathBuf,
    /// Worker threads; 0 uses every core
    #[arg(long, short)]
    threads: Option<usize>,
    /// Integration step handed to the oracle, in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// Multiplier on predicted action durations
    #[arg(long)]
    scaling: Option<f64>,
    /// Stop exploring once the first solution is known
    #[arg(long)]
    early_exit: bool,
    /// Command whose failure halts the whole search
    #[arg(long)]
    sentinel: Option<String>,
    /// Print every diagnosis with the path that led to it
    #[arg(long)]
    rich: bool,
    /// Actions separated by ';', e.g. "get cup; put cup table"
    #[arg(required = true)]
    sequence: String,
}

impl Args {
    /// File settings, then environment, then flags.
    fn config(&self) -> anyhow::Result<PlanConfig> {
        let mut config = PlanConfig::load(&self.scene)?.from_env();
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(dt) = self.dt {
            config.dt = dt;
        }
        if let Some(scaling) = self.scaling {
            config.duration_scaling = scaling;
        }
        if self.early_exit {
            config.early_exit = true;
        }
        if self.sentinel.is_some() {
            config.sentinel = self.sentinel.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log();
    let args = Args::parse();
    let scene = Scene::load(&args.scene)?;
    let config = args.config()?;
    log::info!("loaded {} with {} entities", args.scene.display(), scene.entities().len());
    let planner = Planner::new(KinematicOracle::default())
        .with_config(config)
        .with_sink(LogSink);
    let mut handle = Arc::new(planner).spawn(&scene, &args.sequence);
    let report = tokio::select! {
        report = &mut handle => Some(report),
        _ = tokio::signal::ctrl_c() => None,
    };
    let report = match report {
        Some(report) => report,
        None => {
            log::warn!("interrupted, waiting for running simulations");
            handle.cancel();
            handle.await
        }
    };
    print(&report, args.rich);
    if !report.success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print(report: &Report, rich: bool) {
    match report {
        Report::Solved { commands } => {
            println!("{}", SUCCESS.green().bold());
            for (i, command) in commands.iter().enumerate() {
                println!("  {:>2}. {}", i + 1, command.green());
            }
        }
        _ if rich => {
            println!("{}", "No solution found".red().bold());
            for diagnosis in report.diagnoses() {
                println!("  {}", diagnosis.path().join(" → ").dimmed());
                println!("    {}", diagnosis.reason().yellow());
                if !diagnosis.suggestion().is_empty() {
                    println!("    {}", diagnosis.suggestion().cyan());
                }
            }
        }
        _ => print!("{}", report.message().red()),
    }
}
