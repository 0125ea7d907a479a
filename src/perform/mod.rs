//! Component C4: the Performer (§4.4).
//!
//! Replays an `ExpressedChart` onto a target pad by a layered best-first
//! search over the target `StepGraph`, same shape as `express::express`'s
//! search but walked with the Performer's cost model and gated by the
//! step-kind substitution table instead of matching literal note groups.

pub mod cost;
pub mod substitution;

use crate::cancel::CancellationToken;
use crate::chart::{ExpressedChart, ExpressedEvent, PerformedChart, PerformedEvent, Time};
use crate::config::PerformanceConfig;
use crate::error::PerformError;
use crate::graph::{GraphLinkInstance, NodeId, StepGraph};
use crate::pad::PadModel;
use cost::{step_cost, PerformCost, PerformState};
use fxhash::{FxHashMap, FxHashSet};
use ordered_float::OrderedFloat;
use substitution::{link_satisfies, remap_instance};

struct StateRecord {
    parent: Option<usize>,
    node: NodeId,
    state: PerformState,
    cost: PerformCost,
    chosen: Option<GraphLinkInstance>,
    time: Option<Time>,
}

/// Searches `target_graph` for a lane-level realization of `expressed`,
/// trying each of the target pad's starting tiers in order until one yields
/// a complete cover (§4.4 "starting position selection").
pub fn perform(
    expressed: &ExpressedChart,
    target_pad: &PadModel,
    target_graph: &StepGraph,
    config: &PerformanceConfig,
    seed: u64,
    cancel: &dyn CancellationToken,
) -> Result<PerformedChart, PerformError> {
    config.validate()?;

    let steps: Vec<(Time, GraphLinkInstance)> = expressed.steps().map(|(t, l)| (t, *l)).collect();
    let nps = average_nps(&steps);

    let mut found = None;
    for tier in 0..target_graph.tier_count() {
        if let Some(result) = try_tier(&steps, target_pad, target_graph, config, seed, tier, nps, cancel)? {
            found = Some(result);
            break;
        }
    }
    let (chosen_steps, node_path) = found.ok_or(PerformError::NoPathFound)?;

    let mut events: Vec<PerformedEvent> = chosen_steps
        .into_iter()
        .map(|(t, link)| PerformedEvent::StepEvent(t, link))
        .collect();
    for ev in &expressed.events {
        if let ExpressedEvent::MineEvent {
            time,
            mine_type,
            n_th_closest,
            foot,
        } = ev
        {
            events.push(PerformedEvent::MineEvent {
                time: *time,
                mine_type: *mine_type,
                n_th_closest: *n_th_closest,
                foot: *foot,
            });
        }
    }
    events.sort_by_key(|e| match e {
        PerformedEvent::StepEvent(t, _) => *t,
        PerformedEvent::MineEvent { time, .. } => *time,
    });

    Ok(PerformedChart {
        events,
        node_after_step: node_path,
    })
}

/// The chart's overall notes-per-second, used by tier 3's `relative_nps`
/// threshold. Zero for charts too short to have a meaningful rate.
fn average_nps(steps: &[(Time, GraphLinkInstance)]) -> f64 {
    if steps.len() < 2 {
        return 0.0;
    }
    let span = (steps.last().unwrap().0.as_f64() - steps.first().unwrap().0.as_f64()).max(1e-6);
    steps.len() as f64 / span
}

/// Runs the full search from `tier`'s starting nodes. `Ok(None)` means this
/// tier has no complete cover (the caller should try the next tier); it is
/// not an error unless every tier fails.
#[allow(clippy::too_many_arguments)]
fn try_tier(
    steps: &[(Time, GraphLinkInstance)],
    target_pad: &PadModel,
    target_graph: &StepGraph,
    config: &PerformanceConfig,
    seed: u64,
    tier: usize,
    average_nps_value: f64,
    cancel: &dyn CancellationToken,
) -> Result<Option<(Vec<(Time, GraphLinkInstance)>, Vec<NodeId>)>, PerformError> {
    let starts = target_graph.nodes_for_starting_tier(tier);
    if starts.is_empty() {
        return Ok(None);
    }
    if steps.is_empty() {
        return Ok(Some((Vec::new(), Vec::new())));
    }

    let mut arena: Vec<StateRecord> = starts
        .iter()
        .map(|&node| StateRecord {
            parent: None,
            node,
            state: PerformState::new(target_pad.lane_count()),
            cost: PerformCost::default(),
            chosen: None,
            time: None,
        })
        .collect();
    let mut frontier: Vec<usize> = (0..arena.len()).collect();

    let replacements = &config.step_type_replacements;

    for (step_index, &(time, source_instance)) in steps.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(PerformError::Cancelled);
        }

        let mut candidates: Vec<(usize, NodeId, PerformCost, GraphLinkInstance, PerformState)> = Vec::new();
        for &parent_idx in &frontier {
            let parent_node = arena[parent_idx].node;
            for (target_link, succ_id) in target_graph.outgoing(parent_node) {
                if !link_satisfies(source_instance.link, target_link, replacements) {
                    continue;
                }
                let succ = target_graph.node(succ_id);
                let instance = remap_instance(source_instance, target_link);
                let Some((step_cost_value, new_state)) = step_cost(
                    target_pad,
                    config,
                    &arena[parent_idx].state,
                    target_link,
                    succ,
                    time,
                    average_nps_value,
                    seed,
                    step_index,
                    succ_id,
                    instance,
                ) else {
                    continue;
                };
                let total = arena[parent_idx].cost + step_cost_value;
                candidates.push((parent_idx, succ_id, total, instance, new_state));
            }
        }

        if candidates.is_empty() {
            return Ok(None);
        }

        let mut bucket_sizes: FxHashMap<PerformCost, FxHashSet<NodeId>> = FxHashMap::default();
        for (_, succ_id, total, _, _) in &candidates {
            bucket_sizes.entry(*total).or_default().insert(*succ_id);
        }

        let mut best_per_node: FxHashMap<NodeId, (usize, PerformCost)> = FxHashMap::default();
        for (parent_idx, succ_id, total, instance, new_state) in candidates {
            let ambiguous_alts = bucket_sizes[&total].len().saturating_sub(1);
            let mut full_cost = total;
            full_cost.ambiguity = OrderedFloat(ambiguous_alts as f64);
            let keep = match best_per_node.get(&succ_id) {
                Some((_, existing)) => full_cost < *existing,
                None => true,
            };
            if keep {
                let idx = arena.len();
                arena.push(StateRecord {
                    parent: Some(parent_idx),
                    node: succ_id,
                    state: new_state,
                    cost: full_cost,
                    chosen: Some(instance),
                    time: Some(time),
                });
                best_per_node.insert(succ_id, (idx, full_cost));
            }
        }
        frontier = best_per_node.values().map(|(idx, _)| *idx).collect();
    }

    let Some(&winner) = frontier.iter().min_by_key(|&&idx| arena[idx].cost) else {
        return Ok(None);
    };

    let mut steps_out = Vec::new();
    let mut nodes_out = Vec::new();
    let mut cur = winner;
    while let Some(parent) = arena[cur].parent {
        steps_out.push((arena[cur].time.unwrap(), arena[cur].chosen.unwrap()));
        nodes_out.push(arena[cur].node);
        cur = parent;
    }
    steps_out.reverse();
    nodes_out.reverse();
    Ok(Some((steps_out, nodes_out)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::Never;
    use crate::chart::{ChartNoteStream, NoteEvent, NoteKind};
    use crate::express::express;
    use crate::graph::StepGraph;
    use crate::pad::PadModel;
    use crate::test_support::{dance_single, pump_single};
    use crate::config::ExpressionConfig;
    use pretty_assertions::assert_eq;

    fn tap(t: f64, lane: usize) -> NoteEvent {
        NoteEvent {
            time: Time::seconds(t),
            lane,
            kind: NoteKind::Tap,
        }
    }

    #[test]
    fn performance_conserves_one_step_per_expressed_step() {
        let source_pad = PadModel::build(dance_single()).unwrap();
        let source_graph = StepGraph::build(&source_pad).unwrap();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 1), tap(2.0, 0), tap(3.0, 3)]);
        let expressed = express(&chart, &source_graph, &ExpressionConfig::default(), &Never).unwrap();

        let target_pad = PadModel::build(dance_single()).unwrap();
        let target_graph = StepGraph::build(&target_pad).unwrap();
        let performed = perform(&expressed, &target_pad, &target_graph, &PerformanceConfig::default(), 7, &Never).unwrap();

        let expected_steps = expressed.steps().count();
        let performed_steps = performed
            .events
            .iter()
            .filter(|e| matches!(e, PerformedEvent::StepEvent(..)))
            .count();
        assert_eq!(expected_steps, performed_steps);
        assert_eq!(performed.node_after_step.len(), expected_steps);

        let replacements = crate::config::default_step_type_replacements();
        for ((_, source_link), performed_event) in expressed.steps().zip(
            performed
                .events
                .iter()
                .filter(|e| matches!(e, PerformedEvent::StepEvent(..))),
        ) {
            let PerformedEvent::StepEvent(_, target_instance) = performed_event else {
                unreachable!()
            };
            assert!(substitution::link_satisfies(source_link.link, target_instance.link, &replacements));
        }
    }

    #[test]
    fn determinism_same_seed_same_output() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 3), tap(2.0, 1), tap(3.0, 2)]);
        let expressed = express(&chart, &graph, &ExpressionConfig::default(), &Never).unwrap();

        let a = perform(&expressed, &pad, &graph, &PerformanceConfig::default(), 42, &Never).unwrap();
        let b = perform(&expressed, &pad, &graph, &PerformanceConfig::default(), 42, &Never).unwrap();
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn same_arrow_chart_performs_onto_a_differently_shaped_pad() {
        let source_pad = PadModel::build(dance_single()).unwrap();
        let source_graph = StepGraph::build(&source_pad).unwrap();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 0), tap(2.0, 0), tap(3.0, 0)]);
        let expressed = express(&chart, &source_graph, &ExpressionConfig::default(), &Never).unwrap();

        let target_pad = PadModel::build(pump_single()).unwrap();
        let target_graph = StepGraph::build(&target_pad).unwrap();
        let performed = perform(&expressed, &target_pad, &target_graph, &PerformanceConfig::default(), 1, &Never).unwrap();

        let performed_steps = performed
            .events
            .iter()
            .filter(|e| matches!(e, PerformedEvent::StepEvent(..)))
            .count();
        assert_eq!(performed_steps, expressed.steps().count());
    }

    #[test]
    fn invalid_config_is_rejected_before_search() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let expressed = ExpressedChart::default();
        let mut config = PerformanceConfig::default();
        config.step_tightening.travel_speed_min_seconds = 5.0;
        config.step_tightening.travel_speed_max_seconds = 0.1;
        let err = perform(&expressed, &pad, &graph, &config, 0, &Never).unwrap_err();
        assert!(matches!(err, PerformError::ConfigInvalid(_)));
    }

    #[test]
    fn empty_expressed_chart_performs_to_no_steps() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let expressed = ExpressedChart::default();
        let performed = perform(&expressed, &pad, &graph, &PerformanceConfig::default(), 0, &Never).unwrap();
        assert!(performed.events.is_empty());
    }
}
