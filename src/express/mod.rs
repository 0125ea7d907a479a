//! Component C3: the Expressor (§4.3).
//!
//! Lifts a time-sorted note stream to a body-motion stream by a layered
//! best-first search over the source pad's `StepGraph`: one frontier
//! expansion per simultaneous-note group, pruned by dominance within each
//! reachable `NodeId`.

pub mod cost;
pub mod mines;

use crate::cancel::CancellationToken;
use crate::chart::{ChartNoteStream, ExpressedChart, ExpressedEvent, NoteEvent, NoteKind, Time};
use crate::config::{BracketParsingDetermination, BracketParsingMethod, ExpressionConfig};
use crate::error::ExpressError;
use crate::graph::{
    ActionSet, FootLinkState, FootPosition, GraphLink, GraphLinkInstance, GraphNode, NodeId, RollBits,
    StepGraph,
};
use crate::pad::Foot;
use cost::{edge_cost, mine_tag_cost, single_acting_foot, ExpressCost};
use fxhash::{FxHashMap, FxHashSet};

struct StateRecord {
    parent: Option<usize>,
    node: NodeId,
    last_single_foot: Option<Foot>,
    cost: ExpressCost,
    chosen: Option<GraphLinkInstance>,
    time: Option<Time>,
}

/// Lifts `chart` to an [`ExpressedChart`] over `source_graph`. Wraps
/// [`express_with_method`] with §4.3 tier 2's `ChooseMethodDynamically`
/// two-pass behavior: a first pass always runs with whatever
/// `config.effective_method()` resolves to (`Balanced`, for the dynamic
/// case); if the determination is dynamic, that pass's brackets-per-minute is
/// measured and fed to `resolve_dynamic`, and only re-run with the resolved
/// method when it differs from `Balanced`.
pub fn express(
    chart: &ChartNoteStream,
    source_graph: &StepGraph,
    config: &ExpressionConfig,
    cancel: &dyn CancellationToken,
) -> Result<ExpressedChart, ExpressError> {
    chart.validate()?;
    config.validate()?;

    let first_method = config.effective_method();
    let first_pass = express_with_method(chart, source_graph, config, first_method, cancel)?;

    if config.bracket_parsing_determination != BracketParsingDetermination::ChooseDynamically {
        return Ok(first_pass);
    }
    let measured = brackets_per_minute(&first_pass);
    let resolved = config.resolve_dynamic(measured);
    if resolved == first_method {
        return Ok(first_pass);
    }
    express_with_method(chart, source_graph, config, resolved, cancel)
}

/// Bracket steps per minute of chart duration, measured over an already
/// expressed pass (§4.3 tier 2's dynamic measurement).
fn brackets_per_minute(expressed: &ExpressedChart) -> f64 {
    let times: Vec<f64> = expressed.steps().map(|(t, _)| t.as_f64()).collect();
    let (Some(&first), Some(&last)) = (times.first(), times.last()) else {
        return 0.0;
    };
    let duration_minutes = (last - first) / 60.0;
    if duration_minutes <= 0.0 {
        return 0.0;
    }
    let bracket_count = expressed
        .steps()
        .filter(|(_, link)| {
            [link.link.left, link.link.right].iter().any(|st| {
                st.kind()
                    .map(|k| k.is_bracket() || k.is_bracket_one_arrow())
                    .unwrap_or(false)
            })
        })
        .count();
    bracket_count as f64 / duration_minutes
}

fn express_with_method(
    chart: &ChartNoteStream,
    source_graph: &StepGraph,
    config: &ExpressionConfig,
    method: BracketParsingMethod,
    cancel: &dyn CancellationToken,
) -> Result<ExpressedChart, ExpressError> {
    let groups = chart.groups();

    let mut arena: Vec<StateRecord> = vec![StateRecord {
        parent: None,
        node: source_graph.start_node(),
        last_single_foot: None,
        cost: ExpressCost::default(),
        chosen: None,
        time: None,
    }];
    let mut frontier: Vec<usize> = vec![0];
    let mut tap_index: FxHashMap<(Time, usize), Foot> = FxHashMap::default();
    let mut last_time: Option<Time> = None;

    for (group_index, group) in groups.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(ExpressError::CannotExpress {
                group_index,
                time: group.first().map(|e| e.time.to_string()).unwrap_or_default(),
                reason: "conversion was cancelled".to_string(),
            });
        }

        let has_step_notes = group.iter().any(|e| is_step_kind(e.kind));
        if !has_step_notes {
            continue;
        }
        let time = group.iter().find(|e| is_step_kind(e.kind)).unwrap().time;
        let group_note_count = group.iter().filter(|e| is_step_kind(e.kind)).count();

        // §4.3's mine-following signal: any lane mined strictly between the
        // previous step and this one tags whichever foot is resting there, so
        // moving that foot off the lane here is disfavored exactly like a
        // hold already structurally forbids it.
        let tagged_lanes: FxHashSet<usize> = chart
            .events
            .iter()
            .filter(|e| e.kind == NoteKind::Mine)
            .filter(|e| last_time.map_or(true, |lt| e.time > lt) && e.time < time)
            .map(|e| e.lane)
            .collect();

        let mut candidates: Vec<(usize, NodeId, ExpressCost, GraphLinkInstance, Option<Foot>)> = Vec::new();
        for &parent_idx in &frontier {
            let parent = &arena[parent_idx];
            let node = source_graph.node(parent.node);
            for (link, succ_id) in source_graph.outgoing(parent.node) {
                let succ = source_graph.node(succ_id);
                if let Some((instance, lanes)) = link_matches_group(node, link, succ, group) {
                    let _ = lanes;
                    let acted_foot = single_acting_foot(link);
                    let mut step_cost =
                        edge_cost(config, method, link, succ, parent.last_single_foot, group_note_count);
                    step_cost.mine_tag =
                        ordered_float::OrderedFloat(mine_tag_cost(node, link, &tagged_lanes));
                    candidates.push((parent_idx, succ_id, parent.cost + step_cost, instance, acted_foot));
                }
            }
        }

        if candidates.is_empty() {
            return Err(ExpressError::CannotExpress {
                group_index,
                time: time.to_string(),
                reason: "no reachable body position covers this simultaneous group of notes"
                    .to_string(),
            });
        }

        let mut bucket_sizes: FxHashMap<ExpressCost, FxHashSet<NodeId>> = FxHashMap::default();
        for (_, succ_id, total, _, _) in &candidates {
            bucket_sizes.entry(*total).or_default().insert(*succ_id);
        }

        let mut best_per_node: FxHashMap<NodeId, (usize, ExpressCost)> = FxHashMap::default();
        for (parent_idx, succ_id, total, instance, acted_foot) in candidates {
            let ambiguous_alts = bucket_sizes[&total].len().saturating_sub(1);
            let mut full_cost = total;
            full_cost.ambiguity = ordered_float::OrderedFloat(ambiguous_alts as f64);
            let keep = match best_per_node.get(&succ_id) {
                Some((_, existing)) => full_cost < *existing,
                None => true,
            };
            if keep {
                let idx = arena.len();
                arena.push(StateRecord {
                    parent: Some(parent_idx),
                    node: succ_id,
                    last_single_foot: acted_foot,
                    cost: full_cost,
                    chosen: Some(instance),
                    time: Some(time),
                });
                best_per_node.insert(succ_id, (idx, full_cost));
            }
        }
        frontier = best_per_node.values().map(|(idx, _)| *idx).collect();
        last_time = Some(time);
    }

    let winner = *frontier
        .iter()
        .min_by_key(|&&idx| arena[idx].cost)
        .ok_or_else(|| ExpressError::CannotExpress {
            group_index: groups.len(),
            time: String::new(),
            reason: "search frontier was empty at the end of the chart".to_string(),
        })?;

    let mut steps = Vec::new();
    let mut cur = winner;
    while let Some(parent) = arena[cur].parent {
        let pred_node = source_graph.node(arena[parent].node);
        let link = arena[cur].chosen.unwrap().link;
        let succ_node = source_graph.node(arena[cur].node);
        let time = arena[cur].time.unwrap();
        for (foot, lane) in acted_positions(pred_node, succ_node, link) {
            tap_index.insert((time, lane), foot);
        }
        steps.push((time, arena[cur].chosen.clone().unwrap()));
        cur = parent;
    }
    steps.reverse();

    let mut events: Vec<ExpressedEvent> = steps
        .into_iter()
        .map(|(t, link)| ExpressedEvent::StepEvent(t, link))
        .collect();
    events.extend(mines::classify_mines(chart, &tap_index));
    events.sort_by_key(|e| e.time());

    Ok(ExpressedChart { events })
}

fn is_step_kind(kind: NoteKind) -> bool {
    matches!(
        kind,
        NoteKind::Tap
            | NoteKind::HoldStart
            | NoteKind::HoldEnd
            | NoteKind::RollStart
            | NoteKind::RollEnd
    )
}

fn action_matches_note(action: crate::graph::FootAction, note_kind: NoteKind) -> bool {
    use crate::graph::FootAction::*;
    match action {
        Tap => matches!(note_kind, NoteKind::Tap),
        Hold => matches!(note_kind, NoteKind::HoldStart | NoteKind::RollStart),
        Release => matches!(note_kind, NoteKind::HoldEnd | NoteKind::RollEnd),
    }
}

fn acted_positions(_pred: &GraphNode, succ: &GraphNode, link: GraphLink) -> Vec<(Foot, usize)> {
    let mut out = Vec::new();
    for foot in [Foot::Left, Foot::Right] {
        for lane in succ.acted_lanes(foot, link.for_foot(foot)) {
            out.push((foot, lane));
        }
    }
    out
}

/// Whether `foot`'s `state` is satisfied by the group's notes, and if so its
/// roll bits plus the lane(s) it claims from `required`.
fn foot_rolls(
    succ: &GraphNode,
    foot: Foot,
    state: FootLinkState,
    required: &FxHashMap<usize, NoteKind>,
) -> Option<(RollBits, Vec<usize>)> {
    match state {
        FootLinkState::Idle => Some((RollBits::None, vec![])),
        FootLinkState::Step { action, .. } => match action {
            ActionSet::Single { action, .. } => {
                let lane = *succ.acted_lanes(foot, state).first()?;
                let note_kind = *required.get(&lane)?;
                if !action_matches_note(action, note_kind) {
                    return None;
                }
                let is_roll = matches!(note_kind, NoteKind::RollStart | NoteKind::RollEnd);
                Some((RollBits::Single(is_roll), vec![lane]))
            }
            ActionSet::Dual { heel, toe } => {
                let FootPosition::Bracket {
                    heel_lane, toe_lane, ..
                } = succ.position(foot)
                else {
                    return None;
                };
                let heel_note = *required.get(&heel_lane)?;
                let toe_note = *required.get(&toe_lane)?;
                if !action_matches_note(heel, heel_note) || !action_matches_note(toe, toe_note) {
                    return None;
                }
                let heel_roll = matches!(heel_note, NoteKind::RollStart | NoteKind::RollEnd);
                let toe_roll = matches!(toe_note, NoteKind::RollStart | NoteKind::RollEnd);
                Some((
                    RollBits::Dual {
                        heel: heel_roll,
                        toe: toe_roll,
                    },
                    vec![heel_lane, toe_lane],
                ))
            }
        },
    }
}

/// Whether `link` (landing in `succ`) realizes exactly the step-notes in
/// `group`: every acting portion's lane is covered, every lane in the group
/// is claimed by exactly one portion, and each action matches its note kind.
fn link_matches_group(
    _node: &GraphNode,
    link: GraphLink,
    succ: &GraphNode,
    group: &[NoteEvent],
) -> Option<(GraphLinkInstance, Vec<(Foot, usize)>)> {
    let mut required: FxHashMap<usize, NoteKind> = FxHashMap::default();
    for ev in group {
        if is_step_kind(ev.kind) {
            required.insert(ev.lane, ev.kind);
        }
    }
    if required.is_empty() {
        return None;
    }

    let (left_rolls, left_lanes) = foot_rolls(succ, Foot::Left, link.left, &required)?;
    let (right_rolls, right_lanes) = foot_rolls(succ, Foot::Right, link.right, &required)?;

    let mut covered: FxHashSet<usize> = FxHashSet::default();
    covered.extend(left_lanes.iter().copied());
    covered.extend(right_lanes.iter().copied());
    if covered.len() != required.len() {
        return None;
    }

    let mut lanes = Vec::new();
    lanes.extend(left_lanes.into_iter().map(|l| (Foot::Left, l)));
    lanes.extend(right_lanes.into_iter().map(|l| (Foot::Right, l)));

    Some((
        GraphLinkInstance {
            link,
            left_rolls,
            right_rolls,
        },
        lanes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Never;
    use crate::graph::StepKind;
    use crate::pad::PadModel;
    use crate::test_support::dance_single;
    use pretty_assertions::assert_eq;

    fn tap(t: f64, lane: usize) -> NoteEvent {
        NoteEvent {
            time: Time::seconds(t),
            lane,
            kind: NoteKind::Tap,
        }
    }

    fn graph() -> StepGraph {
        let pad = PadModel::build(dance_single()).unwrap();
        StepGraph::build(&pad).unwrap()
    }

    fn step_feet(chart: &ExpressedChart) -> Vec<Foot> {
        chart
            .steps()
            .map(|(_, link)| {
                if !link.link.left.is_idle() {
                    Foot::Left
                } else {
                    Foot::Right
                }
            })
            .collect()
    }

    fn step_kinds(chart: &ExpressedChart) -> Vec<StepKind> {
        chart
            .steps()
            .map(|(_, link)| link.link.left.kind().or(link.link.right.kind()).unwrap())
            .collect()
    }

    #[test]
    fn alternating_same_arrow_starts_with_left() {
        let g = graph();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 0), tap(2.0, 0), tap(3.0, 0)]);
        let expressed = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        assert_eq!(step_feet(&expressed), vec![Foot::Left, Foot::Right, Foot::Left, Foot::Right]);
        assert!(step_kinds(&expressed).iter().all(|k| *k == StepKind::SameArrow));
    }

    #[test]
    fn simple_stream_alternates_starting_with_right() {
        let g = graph();
        let lanes = [3, 0, 3, 0, 3, 0, 3, 0, 3];
        let notes = lanes
            .iter()
            .enumerate()
            .map(|(i, &lane)| tap(i as f64, lane))
            .collect();
        let chart = ChartNoteStream::new(notes);
        let expressed = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        let feet = step_feet(&expressed);
        assert_eq!(feet[0], Foot::Right);
        for pair in feet.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert!(step_kinds(&expressed).iter().all(|k| *k == StepKind::NewArrow));
    }

    #[test]
    fn crossover_behind_scenario() {
        let g = graph();
        let lanes = [0, 3, 1, 3, 0];
        let notes = lanes
            .iter()
            .enumerate()
            .map(|(i, &lane)| tap(i as f64, lane))
            .collect();
        let chart = ChartNoteStream::new(notes);
        let expressed = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        assert_eq!(
            step_feet(&expressed),
            vec![Foot::Left, Foot::Right, Foot::Left, Foot::Right, Foot::Left]
        );
        assert_eq!(
            step_kinds(&expressed),
            vec![
                StepKind::SameArrow,
                StepKind::NewArrow,
                StepKind::CrossoverBehind,
                StepKind::SameArrow,
                StepKind::NewArrow,
            ]
        );
    }

    #[test]
    fn footswap_preferred_over_jack_breaker_is_jack() {
        let g = graph();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 1), tap(2.0, 0)]);
        let expressed = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        assert_eq!(step_feet(&expressed), vec![Foot::Left, Foot::Right, Foot::Left]);
        assert_eq!(
            step_kinds(&expressed),
            vec![StepKind::SameArrow, StepKind::NewArrow, StepKind::SameArrow]
        );
    }

    #[test]
    fn jump_with_held_left_then_tap_assigns_right_to_new_lane() {
        let g = graph();
        let chart = ChartNoteStream::new(vec![
            NoteEvent {
                time: Time::seconds(0.0),
                lane: 0,
                kind: NoteKind::HoldStart,
            },
            NoteEvent {
                time: Time::seconds(0.0),
                lane: 1,
                kind: NoteKind::Tap,
            },
            tap(1.0, 3),
            NoteEvent {
                time: Time::seconds(2.0),
                lane: 0,
                kind: NoteKind::HoldEnd,
            },
        ]);
        let expressed = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        let feet = step_feet(&expressed);
        // Step index 0 is the jump; step index 1 is the lane-3 tap, which
        // must go to the foot not tied up holding lane 0.
        let lane3_step = expressed
            .steps()
            .nth(1)
            .expect("at least two step events before the release");
        let foot = if !lane3_step.1.link.left.is_idle() {
            Foot::Left
        } else {
            Foot::Right
        };
        assert_eq!(foot, Foot::Right);
        let _ = feet;
    }

    #[test]
    fn mine_after_jump_forces_next_step_to_untagged_foot() {
        // Seed scenario 5: a jump followed by a mine-tagged step. The jump at
        // (0, 3) reaffirms the primary starting position, so the left foot
        // rests on lane 0 and the right on lane 3. A mine at lane 0 between
        // the jump and the next tap tags the left foot; the following tap at
        // lane 1 is reachable by either foot on every other tier, so the
        // mine tag alone must push it to the right foot.
        let g = graph();
        let chart = ChartNoteStream::new(vec![
            tap(0.0, 0),
            tap(0.0, 3),
            NoteEvent {
                time: Time::seconds(0.5),
                lane: 0,
                kind: NoteKind::Mine,
            },
            tap(1.0, 1),
        ]);
        let expressed = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        let second_step = expressed.steps().nth(1).expect("jump plus a later step");
        let foot = if !second_step.1.link.left.is_idle() {
            Foot::Left
        } else {
            Foot::Right
        };
        assert_eq!(foot, Foot::Right);
    }

    #[test]
    fn expression_is_total_for_at_most_two_simultaneous_notes() {
        let g = graph();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(0.0, 3), tap(1.0, 1), tap(1.0, 2)]);
        let expressed = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        assert_eq!(expressed.steps().count(), 2);
    }

    #[test]
    fn determinism_same_input_same_output() {
        let g = graph();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 3), tap(2.0, 1), tap(3.0, 2)]);
        let a = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        let b = express(&chart, &g, &ExpressionConfig::default(), &Never).unwrap();
        assert_eq!(step_kinds(&a), step_kinds(&b));
        assert_eq!(step_feet(&a), step_feet(&b));
    }
}
