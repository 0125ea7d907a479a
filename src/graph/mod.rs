//! Component C2: the step graph (§4.2).
//!
//! A [`StepGraph`] is a static, pad-specific structure computed once and
//! shared read-only across every conversion against that pad (§5). It is
//! consumed by both the Expressor and the Performer, each walking it with a
//! different cost model.

pub mod build;
pub mod link;
pub mod node;

pub use build::StepGraph;
pub use link::{ActionSet, BracketPortionKind, FootAction, FootLinkState, GraphLink, GraphLinkInstance, RollBits, StepKind};
pub use node::{orientation_of, FootPosition, GraphNode, NodeArena, NodeId, OccupancyKind, Orientation};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::PadModel;
    use crate::test_support::{dance_single, pump_single};

    #[test]
    fn builds_from_dance_single_and_reaches_starting_tier() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        assert!(graph.node_count() > 1);
        assert_eq!(graph.nodes_for_starting_tier(0), &[graph.start_node()]);
    }

    #[test]
    fn start_node_has_outgoing_edges() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let out: Vec<_> = graph.outgoing(graph.start_node()).collect();
        assert!(!out.is_empty(), "starting position must have legal next steps");
    }

    #[test]
    fn same_arrow_then_release_returns_to_resting() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let start = graph.start_node();
        // Left foot taps its own lane again (SameArrow+Tap), then the
        // resulting node must offer a SameArrow+Hold and the original node
        // must be reachable again via SameArrow+Release after a hold.
        let has_same_arrow_hold = graph.outgoing(start).any(|(link, _)| {
            matches!(
                link.left,
                FootLinkState::Step {
                    kind: StepKind::SameArrow,
                    action: ActionSet::Single { action: FootAction::Hold, .. }
                }
            )
        });
        assert!(has_same_arrow_hold);
    }

    #[test]
    fn crossover_sets_twisted_and_plain_step_clears_it() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let start = graph.start_node();
        let crossover_target = graph
            .outgoing(start)
            .find(|(link, _)| matches!(link.left.kind(), Some(k) if k.is_crossover()))
            .map(|(_, id)| id);
        let Some(crossed) = crossover_target else {
            panic!("dance_single fixture should allow a left-foot crossover onto lane 3");
        };
        assert!(graph.node(crossed).twisted);
    }

    #[test]
    fn distinct_pads_each_build_independently() {
        let pad_a = PadModel::build(dance_single()).unwrap();
        let pad_b = PadModel::build(pump_single()).unwrap();
        let graph_a = StepGraph::build(&pad_a).unwrap();
        let graph_b = StepGraph::build(&pad_b).unwrap();
        assert_ne!(graph_a.node_count(), 0);
        assert_ne!(graph_b.node_count(), 0);
    }
}
