//! Derived statistics over an `IntersectionState`, used by the meta-scheduler
//! to pick a policy and by SJF/Priority to rank phases and directions.

use crate::model::{Direction, IntersectionState, PhaseId};

/// Mean queue length across all four directions. Zero when every queue is
/// empty (there's nothing to divide).
pub fn mean_queue(state: &IntersectionState) -> f64 {
    let queues: Vec<f64> = Direction::ALL.iter().map(|&d| state.queue(d) as f64).collect();
    if queues.is_empty() {
        return 0.0;
    }
    queues.iter().sum::<f64>() / queues.len() as f64
}

/// Population variance of queue lengths across all four directions.
pub fn queue_variance(state: &IntersectionState) -> f64 {
    let queues: Vec<f64> = Direction::ALL.iter().map(|&d| state.queue(d) as f64).collect();
    if queues.len() < 2 {
        return 0.0;
    }
    let mean = queues.iter().sum::<f64>() / queues.len() as f64;
    queues.iter().map(|q| (q - mean).powi(2)).sum::<f64>() / queues.len() as f64
}

/// Expected arrivals within `horizon` seconds, summed over the two
/// directions a green phase serves.
pub fn arrivals_in_horizon(state: &IntersectionState, phase: PhaseId, horizon: f64) -> f64 {
    phase
        .served_directions()
        .iter()
        .map(|&d| state.arrival_rate(d) * horizon)
        .sum()
}

/// Urgency score for a single direction: queue length weighted double, plus
/// a scaled mean wait time, plus an emergency-vehicle bonus. Higher is more
/// urgent.
pub fn direction_priority(state: &IntersectionState, dir: Direction) -> f64 {
    let mut priority = state.queue(dir) as f64 * 2.0;

    let waits = state.waiting_times(dir);
    if !waits.is_empty() {
        let mean_wait = waits.iter().sum::<f64>() / waits.len() as f64;
        priority += mean_wait / 10.0;
    }

    for ev in state.emergency.iter().filter(|ev| ev.direction == dir) {
        priority += 100.0 / ev.priority as f64;
    }

    priority
}
