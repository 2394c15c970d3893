use crate::metrics::direction_priority;
use crate::model::{ActionPlan, IntersectionState, Phase, PhaseId, PolicyParams};
use crate::transition::build_transition;

/// Serve the direction with the highest urgency score, breaking ties
/// N > E > S > W.
pub fn priority_schedule(state: &IntersectionState, params: &PolicyParams) -> ActionPlan {
    // Fold in tie-break order (N>E>S>W) and only replace on strictly greater
    // priority, so the first direction among equals wins.
    let mut dirs = IntersectionState::directions_by_tie_break();
    let first = dirs.next().expect("Direction::ALL is non-empty");
    let best_dir = dirs.fold(first, |acc, d| {
        if direction_priority(state, d) > direction_priority(state, acc) {
            d
        } else {
            acc
        }
    });

    let target = PhaseId::for_direction(best_dir);
    let mut plan = build_transition(state.current_phase, target, params);

    let queue_length = state.queue(best_dir) as f64;
    let duration = params.clip_green((2.5 * queue_length).max(params.min_green));
    plan.push(Phase::new(target, duration, true));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::test_support::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_e_mixed_waits_picks_west() {
        let params = PolicyParams::default();
        let state = IntersectionState {
            queues: queues(&[
                (Direction::N, 3),
                (Direction::E, 2),
                (Direction::S, 1),
                (Direction::W, 4),
            ]),
            waiting_times: waits(&[
                (Direction::N, vec![10.0, 15.0, 20.0]),
                (Direction::E, vec![5.0, 8.0]),
                (Direction::S, vec![12.0]),
                (Direction::W, vec![25.0, 30.0, 18.0, 22.0]),
            ]),
            current_phase: PhaseId::NsGreen,
            ..Default::default()
        };

        let plan = priority_schedule(&state, &params);
        assert_eq!(
            plan,
            vec![
                Phase::new(PhaseId::NsYellow, 3.0, false),
                Phase::new(PhaseId::AllRed, 1.0, false),
                Phase::new(PhaseId::EwGreen, 10.0, true),
            ]
        );
    }

    #[test]
    fn ties_break_north_over_other_directions() {
        let params = PolicyParams::default();
        let state = IntersectionState {
            queues: queues(&[
                (Direction::N, 2),
                (Direction::E, 2),
                (Direction::S, 2),
                (Direction::W, 2),
            ]),
            ..Default::default()
        };
        let plan = priority_schedule(&state, &params);
        assert_eq!(plan.last().unwrap().phase, PhaseId::NsGreen);
    }

    #[test]
    fn duration_floors_at_min_green() {
        let params = PolicyParams::default();
        let state = IntersectionState {
            queues: queues(&[(Direction::N, 1)]),
            ..Default::default()
        };
        let plan = priority_schedule(&state, &params);
        assert_eq!(plan.last().unwrap().duration, params.min_green);
    }
}
