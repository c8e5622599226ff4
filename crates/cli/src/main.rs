use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use moc::prelude::*;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod export;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Method-of-characteristics solver for planar supersonic jets")]
struct Cmd {
    /// Log every marching step (iteration, downstream reach, shocks)
    #[arg(long, global = true)]
    diagnostic: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// March the jet field and write point/ray tables
    Run {
        #[command(flatten)]
        jet: JetArgs,
        /// JSON file with jet parameters; missing keys take defaults.
        /// Cannot be combined with the jet flags.
        #[arg(long, conflicts_with = "jet")]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 200)]
        max_iter: usize,
        /// Point table (.csv or .parquet); rays go to `<stem>_rays.<ext>`
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Debug)]
#[group(id = "jet", multiple = true)]
struct JetArgs {
    #[arg(long, default_value_t = JetConfig::default().pressure_ratio)]
    pressure_ratio: f64,
    #[arg(long, default_value_t = JetConfig::default().jet_half_width)]
    jet_half_width: f64,
    #[arg(long, default_value_t = JetConfig::default().gamma)]
    gamma: f64,
    #[arg(long, default_value_t = JetConfig::default().inlet_mach)]
    inlet_mach: f64,
    /// Nozzle exit flow angle, radians
    #[arg(long, default_value_t = JetConfig::default().inlet_flow_angle, allow_negative_numbers = true)]
    inlet_flow_angle: f64,
    #[arg(long, default_value_t = JetConfig::default().fan_rays)]
    fan_rays: usize,
    #[arg(long, default_value_t = JetConfig::default().inlet_points)]
    inlet_points: usize,
    #[arg(long, default_value_t = JetConfig::default().atmospheric_pressure)]
    atmospheric_pressure: f64,
}

impl From<JetArgs> for JetConfig {
    fn from(a: JetArgs) -> Self {
        Self {
            pressure_ratio: a.pressure_ratio,
            jet_half_width: a.jet_half_width,
            gamma: a.gamma,
            inlet_mach: a.inlet_mach,
            inlet_flow_angle: a.inlet_flow_angle,
            fan_rays: a.fan_rays,
            inlet_points: a.inlet_points,
            atmospheric_pressure: a.atmospheric_pressure,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.diagnostic {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Run {
            jet,
            config,
            max_iter,
            out,
        } => {
            let jet = match config {
                Some(path) => load_config(&path)?,
                None => jet.into(),
            };
            run(jet, max_iter, &out).map(|_| ())
        }
        Action::Report => report(),
    }
}

fn load_config(path: &Path) -> Result<JetConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: JetConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

fn run(jet: JetConfig, max_iter: usize, out: &Path) -> Result<RunReport> {
    jet.validate()?;
    tracing::info!(?jet, max_iter, out = %out.display(), "run");

    let seeds = seed_points(&jet)?;
    let mut gc = GeometryCluster::new(seeds, MarchCfg::default());
    let report = gc.run(max_iter)?;
    let termination = match report.termination {
        Termination::Shock { position } => {
            tracing::info!(x = position.x, y = position.y, "halted on shock formation");
            serde_json::json!({ "kind": "shock", "x": position.x, "y": position.y })
        }
        Termination::IterationCap => {
            tracing::info!(
                reach = ?gc.downstream_reach(),
                "iteration cap reached"
            );
            serde_json::json!({ "kind": "iteration_cap" })
        }
    };

    let rays = export::write_tables(&gc, out)?;
    let params = serde_json::json!({
        "jet": jet,
        "max_iter": max_iter,
        "iterations": report.iterations,
        "termination": termination,
        "points": gc.points().len(),
        "rays": gc.dead_rays().len(),
    });
    provenance::RunRecord::new(out, params)
        .with_output(rays)
        .write()?;
    Ok(report)
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::code_rev(),
        "moc_version": moc::VERSION,
        "defaults": JetConfig::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
