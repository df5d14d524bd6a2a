use orrery::{run_2d, bench_prune, bench_step, Scenario, ScenarioConfig};

use anyhow::{Context, Result};
use clap::Parser;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Spawn generator seed (overrides the scenario seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window for a fixed number of frames
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// Wall-clock seconds per headless frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f64,

    /// Time step cost against population size and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("reading scenario {}", config_path.display()))?;
    let scenario_cfg = ScenarioConfig::from_yaml(&text)
        .with_context(|| format!("parsing scenario {}", config_path.display()))?;
    Ok(scenario_cfg)
}

fn run_headless(mut scenario: Scenario, frames: usize, frame_dt: f64) {
    let mut removed = 0;
    let mut steps = 0;
    for _ in 0..frames {
        let reports = scenario.advance(frame_dt);
        steps += reports.len();
        removed += reports.iter().map(|r| r.removed()).sum::<usize>();
    }
    log::info!(
        "headless: {} frames, {} steps, {} planets alive, {} removed",
        frames,
        steps,
        scenario.world.planets().len(),
        removed
    );
    scenario.world.shutdown();
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_step();
        bench_prune();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg, args.seed);

    if args.headless {
        run_headless(scenario, args.frames, args.frame_dt);
    } else {
        run_2d(scenario);
    }

    Ok(())
}
