use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};

/// One of the four compass approaches feeding the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    /// N>E>S>W rank used to break priority ties deterministically.
    fn tie_break_rank(self) -> u8 {
        match self {
            Direction::N => 0,
            Direction::E => 1,
            Direction::S => 2,
            Direction::W => 3,
        }
    }
}

/// A named signal configuration. Greens serve two opposing approaches; yellows
/// are the transition of the same axis; `AllRed` is the universally safe idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseId {
    NsGreen,
    EwGreen,
    NsYellow,
    EwYellow,
    AllRed,
}

impl PhaseId {
    /// True if this phase is a green (NS or EW).
    pub fn is_green(self) -> bool {
        matches!(self, PhaseId::NsGreen | PhaseId::EwGreen)
    }

    /// The yellow phase on the same axis as this green. Panics on non-greens;
    /// only ever called by the transition builder, which checks first.
    fn same_axis_yellow(self) -> PhaseId {
        match self {
            PhaseId::NsGreen => PhaseId::NsYellow,
            PhaseId::EwGreen => PhaseId::EwYellow,
            _ => unreachable!("same_axis_yellow called on a non-green phase"),
        }
    }

    pub(crate) fn same_axis_yellow_checked(self) -> Option<PhaseId> {
        if self.is_green() {
            Some(self.same_axis_yellow())
        } else {
            None
        }
    }

    /// The two approaches a green phase serves. Empty for yellow/all-red.
    pub fn served_directions(self) -> &'static [Direction] {
        match self {
            PhaseId::NsGreen => &[Direction::N, Direction::S],
            PhaseId::EwGreen => &[Direction::E, Direction::W],
            _ => &[],
        }
    }

    /// The green phase serving a single direction.
    pub fn for_direction(dir: Direction) -> PhaseId {
        match dir {
            Direction::N | Direction::S => PhaseId::NsGreen,
            Direction::E | Direction::W => PhaseId::EwGreen,
        }
    }
}

/// `(phase, duration, preemptable)`. Yellow, all-red, and emergency-driven
/// greens are always non-preemptable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase: PhaseId,
    pub duration: f64,
    pub preemptable: bool,
}

impl Phase {
    pub fn new(phase: PhaseId, duration: f64, preemptable: bool) -> Phase {
        Phase {
            phase,
            duration,
            preemptable,
        }
    }
}

/// Ordered sequence of phases to execute end-to-end as the next scheduled
/// slice. May be empty only for a pathological configuration (see
/// `SchedulerError::EmptyPlan`).
pub type ActionPlan = Vec<Phase>;

/// An emergency vehicle approaching the intersection. Lower `priority` means
/// higher importance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyVehicle {
    pub direction: Direction,
    pub time_to_intersection: f64,
    pub vehicle_id: String,
    pub priority: u32,
}

/// A snapshot of the intersection fed in by the environment on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionState {
    pub queues: BTreeMap<Direction, u32>,
    pub waiting_times: BTreeMap<Direction, Vec<f64>>,
    pub arrival_rates: BTreeMap<Direction, f64>,
    pub emergency: Vec<EmergencyVehicle>,
    pub current_phase: PhaseId,
    pub sim_time: f64,
}

impl IntersectionState {
    pub fn queue(&self, dir: Direction) -> u32 {
        self.queues.get(&dir).copied().unwrap_or(0)
    }

    pub fn arrival_rate(&self, dir: Direction) -> f64 {
        self.arrival_rates.get(&dir).copied().unwrap_or(0.0)
    }

    pub fn waiting_times(&self, dir: Direction) -> &[f64] {
        self.waiting_times
            .get(&dir)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Sum of queue lengths across the two approaches a phase serves. Zero
    /// for yellow/all-red.
    pub fn queue_on_axis(&self, phase: PhaseId) -> u32 {
        phase.served_directions().iter().map(|&d| self.queue(d)).sum()
    }

    pub(crate) fn directions_by_tie_break() -> impl Iterator<Item = Direction> {
        let mut dirs = Direction::ALL;
        dirs.sort_by_key(|d| d.tie_break_rank());
        dirs.into_iter()
    }
}

/// Tunable knobs for the scheduling policies. Build once via `Default` or
/// `PolicyParams::from_overrides`, then thread through immutably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyParams {
    pub min_green: f64,
    pub max_green: f64,
    pub yellow_duration: f64,
    pub all_red_duration: f64,
    pub rr_cycle_order: Vec<PhaseId>,
    pub low_load_threshold: f64,
    pub high_variance_threshold: f64,
    pub sjf_horizon: f64,
    pub emergency_preempt_buffer: f64,
    pub emergency_clear_duration: f64,
    pub min_switch_interval: f64,
    pub debug: bool,
}

impl Default for PolicyParams {
    fn default() -> PolicyParams {
        PolicyParams {
            min_green: 7.0,
            max_green: 60.0,
            yellow_duration: 3.0,
            all_red_duration: 1.0,
            rr_cycle_order: vec![PhaseId::NsGreen, PhaseId::EwGreen],
            low_load_threshold: 2.0,
            high_variance_threshold: 4.0,
            sjf_horizon: 30.0,
            emergency_preempt_buffer: 10.0,
            emergency_clear_duration: 15.0,
            min_switch_interval: 5.0,
            debug: false,
        }
    }
}

impl PolicyParams {
    pub fn clip_green(&self, duration: f64) -> f64 {
        duration.max(self.min_green).min(self.max_green)
    }
}

/// Which planner should produce the plan. `Meta` delegates to whichever of
/// the other three the meta-scheduler selects from the current metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulingPolicy {
    RoundRobin,
    ShortestJobFirst,
    Priority,
    Meta,
}

impl SchedulingPolicy {
    pub fn as_tag(self) -> &'static str {
        match self {
            SchedulingPolicy::RoundRobin => "RR",
            SchedulingPolicy::ShortestJobFirst => "SJF",
            SchedulingPolicy::Priority => "PRIORITY",
            SchedulingPolicy::Meta => "META",
        }
    }
}

impl FromStr for SchedulingPolicy {
    type Err = String;

    /// Narrowly-scoped parser for the policy-oracle boundary: accepts exactly
    /// the tags in `as_tag`, case-insensitively. Anything else is the
    /// caller's problem to surface as `SchedulerError::UnsupportedPolicy`.
    fn from_str(s: &str) -> Result<SchedulingPolicy, String> {
        match s.to_ascii_uppercase().as_str() {
            "RR" | "ROUND_ROBIN" => Ok(SchedulingPolicy::RoundRobin),
            "SJF" | "SHORTEST_JOB_FIRST" => Ok(SchedulingPolicy::ShortestJobFirst),
            "PRIORITY" => Ok(SchedulingPolicy::Priority),
            "META" => Ok(SchedulingPolicy::Meta),
            other => Err(other.to_string()),
        }
    }
}

pub(crate) fn emergencies_by_direction(
    emergencies: &[EmergencyVehicle],
) -> BTreeMap<Direction, Vec<&EmergencyVehicle>> {
    let mut by_dir: BTreeMap<Direction, Vec<&EmergencyVehicle>> = BTreeMap::new();
    for ev in emergencies {
        by_dir.entry(ev.direction).or_insert_with(Vec::new).push(ev);
    }
    by_dir
}

pub(crate) fn directions_with_emergency(emergencies: &[EmergencyVehicle]) -> BTreeSet<Direction> {
    emergencies.iter().map(|ev| ev.direction).collect()
}
