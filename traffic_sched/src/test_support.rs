//! Shared fixture builders for the unit tests scattered across this crate's
//! modules. Kept in one place so each module's tests only spell out the
//! fields a given scenario actually cares about.
#![cfg(test)]

use std::collections::BTreeMap;

use crate::model::{Direction, EmergencyVehicle, IntersectionState, PhaseId};

impl Default for IntersectionState {
    /// Empty intersection, idle at `all_red`, `sim_time` zero. Tests override
    /// only the fields their scenario needs via struct-update syntax.
    fn default() -> IntersectionState {
        IntersectionState {
            queues: BTreeMap::new(),
            waiting_times: BTreeMap::new(),
            arrival_rates: BTreeMap::new(),
            emergency: Vec::new(),
            current_phase: PhaseId::AllRed,
            sim_time: 0.0,
        }
    }
}

pub(crate) fn queues(pairs: &[(Direction, u32)]) -> BTreeMap<Direction, u32> {
    pairs.iter().cloned().collect()
}

pub(crate) fn rates(pairs: &[(Direction, f64)]) -> BTreeMap<Direction, f64> {
    pairs.iter().cloned().collect()
}

pub(crate) fn waits(pairs: &[(Direction, Vec<f64>)]) -> BTreeMap<Direction, Vec<f64>> {
    pairs.iter().cloned().collect()
}

pub(crate) fn ev(direction: Direction, eta: f64, id: &str, priority: u32) -> EmergencyVehicle {
    EmergencyVehicle {
        direction,
        time_to_intersection: eta,
        vehicle_id: id.to_string(),
        priority,
    }
}
