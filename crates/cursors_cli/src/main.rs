//! Cursors CLI
//!
//! Command-line entry point for the cursor swarm.
//!
//! # Commands
//!
//! - `cursors run` - Open the animation in a window
//! - `cursors headless` - Run without a window, optionally from a scenario
//! - `cursors init` - Write a default `cursors.toml`

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use cursors_app::headless_assert::SwarmSnapshot;
use cursors_app::headless_report::{HeadlessReport, RunSummary};
use cursors_app::headless_runner::{run_loaded_scenario_with_probe, ProbeContext, RunOutcome};
use cursors_app::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use cursors_app::headless_scenario::HeadlessScenario;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::{parse_size, CursorsConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "cursors")]
#[command(author, version, about = "A swarm of cursors that follows your pointer")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file or directory containing cursors.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the animation in a window (default)
    Run(Overrides),

    /// Run the animation without a window
    Headless(HeadlessArgs),

    /// Write a default configuration file
    Init {
        /// Directory to write cursors.toml into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Flags that override the configuration file
#[derive(Args)]
struct Overrides {
    /// Number of cursors, including the one following the pointer
    #[arg(short = 'n', long = "cursors")]
    cursors: Option<usize>,

    /// RNG seed for reproducible colors, speeds and targets
    #[arg(long)]
    seed: Option<u64>,

    /// Use a WIDTHxHEIGHT window instead of fullscreen
    #[arg(long, value_parser = parse_size)]
    windowed_size: Option<(u32, u32)>,
}

#[derive(Args)]
struct HeadlessArgs {
    #[command(flatten)]
    overrides: Overrides,

    /// Scenario JSON to execute
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Frames to run when no scenario is given
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Virtual milliseconds per frame
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// Log a swarm sample every N frames
    #[arg(long, default_value_t = 4)]
    probe_every: u32,

    /// Write the JSON report to this relative path instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init { path, force }) = &cli.command {
        init_logging("info");
        return cmd_init(path, *force);
    }

    let mut config = CursorsConfig::load_or_default(cli.config.as_deref())?;
    init_logging(&config.logging.level);

    match cli.command {
        None => cmd_run(&config),
        Some(Commands::Run(overrides)) => {
            overrides.apply(&mut config)?;
            cmd_run(&config)
        }
        Some(Commands::Headless(args)) => {
            args.overrides.apply(&mut config)?;
            cmd_headless(&config, &args)
        }
        Some(Commands::Init { .. }) => Ok(()),
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

impl Overrides {
    fn apply(&self, config: &mut CursorsConfig) -> Result<()> {
        if let Some(count) = self.cursors {
            config.simulation.cursor_count = count;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some((width, height)) = self.windowed_size {
            config.display.width = width;
            config.display.height = height;
            config.display.fullscreen = false;
        }
        config.validate()
    }
}

#[cfg(feature = "windowed")]
fn cmd_run(config: &CursorsConfig) -> Result<()> {
    use cursors_app::windowed::WindowedApp;

    info!(
        cursors = config.simulation.cursor_count,
        fullscreen = config.display.fullscreen,
        "starting"
    );
    WindowedApp::run(config.window_config(), config.simulation_config())?;
    info!("exited");
    Ok(())
}

#[cfg(not(feature = "windowed"))]
fn cmd_run(_config: &CursorsConfig) -> Result<()> {
    bail!("this build has no window support; use `cursors headless`")
}

fn cmd_headless(config: &CursorsConfig, args: &HeadlessArgs) -> Result<()> {
    let run_config = HeadlessRunConfig {
        width: config.display.width,
        height: config.display.height,
        max_frames: args.frames,
        tick_ms: args.tick_ms,
        probe_every_frames: args.probe_every,
    };
    let sim = config.simulation_config();

    let outcome = match &args.scenario {
        Some(path) => {
            let scenario = HeadlessScenario::from_path(path)?;
            info!(
                scenario = %path.display(),
                steps = scenario.steps.len(),
                "running scenario"
            );
            let mut probe = |ctx: &ProbeContext, snapshot: &SwarmSnapshot| {
                debug!(
                    frame = ctx.elapsed_frames,
                    step = ctx.step_index,
                    mode = ?snapshot.mode,
                    "probe"
                );
            };
            run_loaded_scenario_with_probe(&scenario, run_config, &sim, &mut probe)?
        }
        None => {
            let probe_every = u64::from(args.probe_every.max(1));
            let runtime = HeadlessRuntime::run(run_config, &sim, |ctx, state| {
                if (ctx.frame_index + 1) % probe_every == 0 {
                    debug!(frame = ctx.frame_index, mode = ?state.mode(), "probe");
                }
            })?;
            RunOutcome::Passed {
                report: HeadlessReport::passed(RunSummary {
                    mode: runtime.state().mode(),
                    activated_at_frame: None,
                    exited: runtime.is_exited(),
                    elapsed_frames: runtime.elapsed_frames(),
                    elapsed_ms: runtime.elapsed_ms(),
                }),
            }
        }
    };

    let report = outcome.report();
    match &args.report {
        Some(path) => {
            report.write_to_path(path)?;
            info!(report = %path.display(), "report written");
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    if outcome.is_failed() {
        bail!(
            "scenario failed at step {}: {}",
            report.failed_step_index.unwrap_or_default(),
            report.message.as_deref().unwrap_or("assertion failed")
        );
    }
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    std::fs::write(&config_path, CursorsConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    info!("Wrote {}", config_path.display());
    Ok(())
}
