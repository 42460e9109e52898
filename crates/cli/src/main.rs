#![deny(unsafe_code)]
//! CLI binary for the flow-field particle system.
//!
//! Subcommands:
//! - `run`: tick a particle system for N frames, write a PNG of the last one
//! - `noise`: write the raw noise grid as a PNG, one pixel per cell
//! - `defaults`: print the default config and its parameter schema

mod error;

use clap::{Args, Parser, Subcommand};
use error::CliError;
use flowfield_core::{FlowConfig, FlowGrid, NoiseKind};
use flowfield_particles::ParticleSystem;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "flowfield", about = "Flow-field particle system CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Settings shared by `run` and `noise`. Flags override `--params` keys.
#[derive(Args)]
struct FieldArgs {
    /// Viewport width in pixels.
    #[arg(short = 'W', long)]
    width: Option<f64>,

    /// Viewport height in pixels.
    #[arg(short = 'H', long)]
    height: Option<f64>,

    /// Noise kind (gradient, perlin, periodic).
    #[arg(short, long)]
    noise: Option<String>,

    /// PRNG seed for deterministic output.
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path.
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Config keys as a JSON object (see `defaults`).
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the particle system for N frames and write a PNG snapshot.
    Run {
        #[command(flatten)]
        field: FieldArgs,

        /// Number of particles.
        #[arg(short, long)]
        particles: Option<usize>,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 300)]
        steps: usize,

        /// Simulated time per frame, in milliseconds.
        #[arg(long, default_value_t = 16)]
        frame_ms: u64,

        /// Regenerate the field on the dynamic cadence.
        #[arg(long)]
        dynamic: bool,
    },
    /// Write the noise grid as a PNG, one pixel per cell.
    Noise {
        #[command(flatten)]
        field: FieldArgs,
    },
    /// Print the default config and parameter schema.
    Defaults,
}

/// Merges flag overrides into the `--params` object and builds a config.
fn build_config(field: &FieldArgs, extra: &[(&str, Option<Value>)]) -> Result<FlowConfig, CliError> {
    let params: Value = serde_json::from_str(&field.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let Value::Object(mut map) = params else {
        return Err(CliError::Input("--params must be a JSON object".into()));
    };

    if let Some(noise) = &field.noise {
        let kind: NoiseKind = noise.parse()?;
        map.insert("noise".into(), json!(kind.name()));
    }
    let common = [
        ("width", field.width.map(Value::from)),
        ("height", field.height.map(Value::from)),
        ("seed", field.seed.map(Value::from)),
    ];
    apply(&mut map, common.iter().chain(extra).map(|(k, v)| (*k, v.clone())));

    Ok(FlowConfig::from_json(&Value::Object(map))?)
}

fn apply<'a>(map: &mut Map<String, Value>, overrides: impl Iterator<Item = (&'a str, Option<Value>)>) {
    for (key, value) in overrides {
        if let Some(value) = value {
            map.insert(key.to_string(), value);
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Defaults => {
            let info = json!({
                "config": FlowConfig::default().to_json(),
                "schema": FlowConfig::schema(),
                "noise": NoiseKind::list_names(),
            });
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Defaults:");
                println!("{}", serde_json::to_string_pretty(&info["config"])?);
                println!("Noise kinds:");
                println!("  {}", NoiseKind::list_names().join(", "));
            }
        }
        Command::Noise { field } => {
            let config = build_config(&field, &[])?;
            let grid = FlowGrid::build(
                config.width,
                config.height,
                config.cell_size,
                &config.noise_params(),
            );
            flowfield_render::snapshot::write_noise_png(&grid, &field.output)?;

            if cli.json {
                let info = json!({
                    "noise": config.noise.name(),
                    "rows": grid.rows(),
                    "columns": grid.columns(),
                    "seed": config.seed,
                    "output": field.output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "wrote {} noise ({} x {} cells, seed {}) -> {}",
                    config.noise,
                    grid.columns(),
                    grid.rows(),
                    config.seed,
                    field.output.display()
                );
            }
        }
        Command::Run {
            field,
            particles,
            steps,
            frame_ms,
            dynamic,
        } => {
            let extra = [
                ("particles", particles.map(Value::from)),
                ("dynamic", dynamic.then_some(Value::Bool(true))),
            ];
            let config = build_config(&field, &extra)?;
            let mut system = ParticleSystem::new(config)?;

            let dt = Duration::from_millis(frame_ms);
            let mut resets = 0;
            for _ in 0..steps {
                system.tick(dt);
                resets += system.last_step().resets();
            }
            log::debug!("{steps} frames, {resets} resets, {} regenerations", system.regenerations());

            let frame = flowfield_render::render_frame(&system)?;
            flowfield_render::snapshot::write_png(&frame, &field.output)?;

            let config = system.config();
            if cli.json {
                let info = json!({
                    "noise": config.noise.name(),
                    "width": frame.width(),
                    "height": frame.height(),
                    "particles": config.particles,
                    "steps": steps,
                    "seed": config.seed,
                    "resets": resets,
                    "regenerations": system.regenerations(),
                    "output": field.output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} particles, {steps} steps, seed {}) -> {}",
                    config.noise,
                    frame.width(),
                    frame.height(),
                    config.particles,
                    config.seed,
                    field.output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
