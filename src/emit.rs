//! Component C6: the Emitter (§4.5).
//!
//! Resolves a `PerformedChart` into a time-sorted lane-event stream: each
//! step's acting feet are read off the target-graph node the Performer
//! recorded for it (`PerformedChart::node_after_step`), and each carried-
//! through mine is placed on the lane its tagged foot last touched.

use crate::chart::{NoteEvent, NoteKind, PerformedChart, PerformedEvent, Time};
use crate::error::EmitError;
use crate::graph::{ActionSet, FootAction, FootLinkState, RollBits, StepGraph};
use crate::pad::Foot;
use std::collections::HashMap;

/// Converts a performed chart to lane events, enforcing that every
/// `HoldStart` has exactly one later `HoldEnd` on the same lane (§4.5,
/// §7's output-shape invariant) and that no lane is double-held.
pub fn emit(performed: &PerformedChart, target_graph: &StepGraph) -> Result<Vec<NoteEvent>, EmitError> {
    let mut events = Vec::new();
    let mut open_holds: HashMap<usize, Time> = HashMap::new();
    let mut foot_history: [Vec<(Time, usize)>; 2] = [Vec::new(), Vec::new()];
    let mut step_index = 0;

    for ev in &performed.events {
        match ev {
            PerformedEvent::StepEvent(time, instance) => {
                let node = target_graph.node(performed.node_after_step[step_index]);
                step_index += 1;

                for foot in [Foot::Left, Foot::Right] {
                    let link_state = instance.link.for_foot(foot);
                    let FootLinkState::Step { action, .. } = link_state else {
                        continue;
                    };
                    let rolls = match foot {
                        Foot::Left => instance.left_rolls,
                        Foot::Right => instance.right_rolls,
                    };
                    let lanes = node.acted_lanes(foot, link_state);
                    let actions = per_lane_actions(action);
                    let is_roll = per_lane_rolls(action, rolls);
                    for ((&lane, foot_action), rolling) in lanes.iter().zip(actions).zip(is_roll) {
                        let kind = match (foot_action, rolling) {
                            (FootAction::Tap, _) => NoteKind::Tap,
                            (FootAction::Hold, false) => NoteKind::HoldStart,
                            (FootAction::Hold, true) => NoteKind::RollStart,
                            (FootAction::Release, false) => NoteKind::HoldEnd,
                            (FootAction::Release, true) => NoteKind::RollEnd,
                        };
                        match kind {
                            NoteKind::HoldStart | NoteKind::RollStart => {
                                if open_holds.insert(lane, *time).is_some() {
                                    return Err(EmitError::HoldImbalance {
                                        lane: lane as i32,
                                        reason: format!("hold started at {time} while lane {lane} was already held"),
                                    });
                                }
                            }
                            NoteKind::HoldEnd | NoteKind::RollEnd => {
                                if open_holds.remove(&lane).is_none() {
                                    return Err(EmitError::HoldImbalance {
                                        lane: lane as i32,
                                        reason: format!("release at {time} on lane {lane} has no matching hold"),
                                    });
                                }
                            }
                            _ => {}
                        }
                        events.push(NoteEvent { time: *time, lane, kind });
                        foot_history[foot.index()].push((*time, lane));
                    }
                }
            }
            PerformedEvent::MineEvent { time, foot, .. } => {
                if let Some(lane) = nearest_lane(&foot_history[foot.index()], *time) {
                    events.push(NoteEvent {
                        time: *time,
                        lane,
                        kind: NoteKind::Mine,
                    });
                }
            }
        }
    }

    if let Some((&lane, _)) = open_holds.iter().next() {
        return Err(EmitError::HoldImbalance {
            lane: lane as i32,
            reason: "chart ends with an unreleased hold".to_string(),
        });
    }

    events.sort_by_key(|e| e.time);
    Ok(events)
}

fn per_lane_actions(action: ActionSet) -> Vec<FootAction> {
    match action {
        ActionSet::Single { action, .. } => vec![action],
        ActionSet::Dual { heel, toe } => vec![heel, toe],
    }
}

/// Parallel to [`per_lane_actions`]: whether each acting portion is a roll,
/// read off the [`RollBits`] carried alongside the acting foot's link state.
fn per_lane_rolls(action: ActionSet, rolls: RollBits) -> Vec<bool> {
    match action {
        ActionSet::Single { .. } => match rolls {
            RollBits::Single(is_roll) => vec![is_roll],
            _ => vec![false],
        },
        ActionSet::Dual { .. } => match rolls {
            RollBits::Dual { heel, toe } => vec![heel, toe],
            _ => vec![false, false],
        },
    }
}

/// The lane of whichever entry in `history` is closest in time to `time`
/// (§3: a mine is tagged to the foot it warns, placed at that foot's nearest
/// actual lane). `None` if the foot never acted before this mine.
fn nearest_lane(history: &[(Time, usize)], time: Time) -> Option<usize> {
    use ordered_float::OrderedFloat;
    history
        .iter()
        .min_by_key(|a| OrderedFloat((a.0.as_f64() - time.as_f64()).abs()))
        .map(|&(_, lane)| lane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Never;
    use crate::chart::{ChartNoteStream, MineType, NoteEvent as RawNoteEvent};
    use crate::config::{ExpressionConfig, PerformanceConfig};
    use crate::express::express;
    use crate::graph::StepGraph;
    use crate::pad::PadModel;
    use crate::perform::perform;
    use crate::test_support::dance_single;

    fn tap(t: f64, lane: usize) -> RawNoteEvent {
        RawNoteEvent {
            time: Time::seconds(t),
            lane,
            kind: NoteKind::Tap,
        }
    }

    #[test]
    fn emits_one_lane_event_per_acting_foot() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 1), tap(2.0, 0), tap(3.0, 3)]);
        let expressed = express(&chart, &graph, &ExpressionConfig::default(), &Never).unwrap();
        let performed = perform(&expressed, &pad, &graph, &PerformanceConfig::default(), 0, &Never).unwrap();

        let emitted = emit(&performed, &graph).unwrap();
        assert_eq!(emitted.len(), chart.events.len());
        let mut times: Vec<_> = emitted.iter().map(|e| e.time).collect();
        let sorted = {
            let mut t = times.clone();
            t.sort();
            t
        };
        assert_eq!(times, sorted);
        times.dedup();
    }

    #[test]
    fn hold_then_release_pairs_without_error() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let chart = ChartNoteStream::new(vec![
            NoteEvent {
                time: Time::seconds(0.0),
                lane: 0,
                kind: NoteKind::HoldStart,
            },
            NoteEvent {
                time: Time::seconds(1.0),
                lane: 0,
                kind: NoteKind::HoldEnd,
            },
        ]);
        let expressed = express(&chart, &graph, &ExpressionConfig::default(), &Never).unwrap();
        let performed = perform(&expressed, &pad, &graph, &PerformanceConfig::default(), 0, &Never).unwrap();
        let emitted = emit(&performed, &graph).unwrap();

        assert!(emitted.iter().any(|e| e.kind == NoteKind::HoldStart));
        assert!(emitted.iter().any(|e| e.kind == NoteKind::HoldEnd));
    }

    #[test]
    fn mine_is_placed_on_tagged_foots_nearest_lane() {
        use crate::chart::{ExpressedChart, ExpressedEvent, PerformedEvent};
        use crate::graph::GraphLinkInstance;

        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let start = graph.start_node();
        let (link, succ) = graph
            .outgoing(start)
            .find(|(l, _)| !l.left.is_idle())
            .expect("dance_single should allow a left-foot opening step");

        let expressed = ExpressedChart {
            events: vec![
                ExpressedEvent::StepEvent(Time::seconds(0.0), GraphLinkInstance::plain(link)),
                ExpressedEvent::MineEvent {
                    time: Time::seconds(0.5),
                    mine_type: MineType::AfterArrow,
                    n_th_closest: 0,
                    foot: Foot::Left,
                },
            ],
        };
        let performed = perform(&expressed, &pad, &graph, &PerformanceConfig::default(), 0, &Never).unwrap();
        let emitted = emit(&performed, &graph).unwrap();

        let expected_lane = graph.node(succ).acted_lanes(Foot::Left, link.left)[0];
        let mine = emitted.iter().find(|e| e.kind == NoteKind::Mine).unwrap();
        assert_eq!(mine.lane, expected_lane);
    }
}
