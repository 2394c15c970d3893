use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use structopt::StructOpt;

use traffic_sched::{parse_policy, IntersectionState, PolicyParams, Scheduler, SchedulingPolicy};

/// Debugging harness around the traffic_sched core: load an intersection
/// snapshot and optional tuning overrides from JSON, run the scheduler once,
/// and print the resulting plan.
#[derive(StructOpt)]
#[structopt(name = "traffic_sched_cli")]
struct Flags {
    /// JSON-encoded IntersectionState to schedule against
    #[structopt(long = "state", parse(from_os_str))]
    state: PathBuf,

    /// Optional JSON document overriding PolicyParams defaults
    #[structopt(long = "params", parse(from_os_str))]
    params: Option<PathBuf>,

    /// Scheduling policy: rr, sjf, priority, or meta (default)
    #[structopt(long = "policy", default_value = "meta")]
    policy: String,

    /// Enable decision-explanation logging
    #[structopt(short = "v", long = "debug")]
    debug: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let flags = Flags::from_args();

    let state = read_json::<IntersectionState>(&flags.state)
        .with_context(|| format!("reading intersection state from {:?}", flags.state))?;

    let mut params = match &flags.params {
        Some(path) => read_json::<PolicyParams>(path)
            .with_context(|| format!("reading policy params from {:?}", path))?,
        None => PolicyParams::default(),
    };
    if flags.debug {
        params.debug = true;
    }

    let policy: SchedulingPolicy = parse_policy(&flags.policy)
        .with_context(|| format!("unrecognized --policy {:?}", flags.policy))?;

    let scheduler = Scheduler::new(params);
    log::info!("{}", scheduler.explain_decision(&state, policy));

    let plan = scheduler
        .schedule(&state, policy)
        .context("scheduling failed")?;

    for phase in &plan {
        println!(
            "{:?}\tduration={:.1}s\tpreemptable={}",
            phase.phase, phase.duration, phase.preemptable
        );
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
