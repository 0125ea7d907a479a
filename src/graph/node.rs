//! [`GraphNode`]: a full-body position on a pad, plus the arena that owns all
//! of them.
//!
//! Nodes are hash-consed and compared by structural equality (§3). The arena
//! stores nodes in a `Vec` and edges reference other nodes by index rather
//! than by pointer, sidestepping the cyclic-ownership problem a heavily
//! cyclic graph would otherwise create (§9).

use crate::graph::link::{ActionSet, FootLinkState};
use crate::pad::{Foot, FootPortion, PadModel};
use fxhash::FxHashMap;
use std::fmt;

/// Whether a lane pairing is a plain stance or a crossed/inverted one, and if
/// twisted, which side of the other foot the moving foot landed on. Shared by
/// [`super::build`] (to derive [`GraphNode::twisted`]) and by the Performer's
/// facing-tier cost (§4.4 tier 4), which needs the same front/behind call to
/// classify a twisted stance as facing inward or outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Forward,
    CrossedFront,
    CrossedBehind,
}
impl Orientation {
    pub fn is_twisted(self) -> bool {
        !matches!(self, Orientation::Forward)
    }
}

/// Classifies the `(foot, lane)` pairing against `other_lane` using `pad`'s
/// crossover/inverted tables. The inverted table doesn't distinguish front
/// from behind, so an inverted pairing falls back to the same geometric
/// front/behind call a crossover would use (§9's open-question resolution:
/// arbitrary but stable, keyed on which side of the other foot's lane this
/// one falls).
pub fn orientation_of(pad: &PadModel, foot: Foot, lane: usize, other_lane: usize) -> Orientation {
    let crossed = pad.other_foot_pairing_crossover_front(foot, lane, other_lane)
        || pad.other_foot_pairing_crossover_behind(foot, lane, other_lane)
        || pad.other_foot_pairing_inverted(foot, lane, other_lane);
    if !crossed {
        return Orientation::Forward;
    }
    let (x, _) = pad.lane_coord(lane);
    let (ox, _) = pad.lane_coord(other_lane);
    let front = match foot {
        Foot::Left => x >= ox,
        Foot::Right => x <= ox,
    };
    if front {
        Orientation::CrossedFront
    } else {
        Orientation::CrossedBehind
    }
}

/// Whether a lane a foot portion occupies is free, held, or mid-roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OccupancyKind {
    Resting,
    Held,
    Rolling,
}

/// Where one foot is, body-position-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootPosition {
    /// The foot has not yet stepped on the pad.
    Lifted,
    /// The foot occupies a single lane (its "default" portion).
    Single { lane: usize, occupancy: OccupancyKind },
    /// The foot is bracketing: heel and toe on two distinct lanes.
    Bracket {
        heel_lane: usize,
        heel_occupancy: OccupancyKind,
        toe_lane: usize,
        toe_occupancy: OccupancyKind,
    },
}
impl FootPosition {
    /// Whether the body is twisted (crossed or inverted) at this foot's lane,
    /// given the other foot's current lane. Orientation is properties of the
    /// *pair*, not of one foot alone, so this is computed by the graph
    /// builder and stored on the node as a whole; see [`GraphNode::twisted`].
    pub fn representative_lane(&self) -> Option<usize> {
        match *self {
            FootPosition::Lifted => None,
            FootPosition::Single { lane, .. } => Some(lane),
            // Heel is the representative portion for pairing-table lookups
            // when the foot is bracketing; see SPEC_FULL.md's open-question
            // resolution on this.
            FootPosition::Bracket { heel_lane, .. } => Some(heel_lane),
        }
    }
}

/// A full-body position: where each foot is, and whether the body is
/// currently twisted from a prior crossover/invert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphNode {
    pub left: FootPosition,
    pub right: FootPosition,
    /// Set once a [`crate::graph::link::StepKind::CrossoverFront`],
    /// `CrossoverBehind`, `InvertFront` or `InvertBehind` step is taken, and
    /// cleared by the next step that returns the body to a plain pairing.
    pub twisted: bool,
}
impl GraphNode {
    pub fn position(&self, foot: Foot) -> FootPosition {
        match foot {
            Foot::Left => self.left,
            Foot::Right => self.right,
        }
    }

    pub fn with_position(mut self, foot: Foot, pos: FootPosition) -> GraphNode {
        match foot {
            Foot::Left => self.left = pos,
            Foot::Right => self.right = pos,
        }
        self
    }

    /// The lane(s) `foot` is occupying as a result of acting per `state`,
    /// read off this (the successor) node. Shared by the Expressor (to index
    /// taps by the foot that claimed them) and the Performer (to measure
    /// per-foot travel distance).
    pub fn acted_lanes(&self, foot: Foot, state: FootLinkState) -> Vec<usize> {
        match state {
            FootLinkState::Idle => vec![],
            FootLinkState::Step { action, .. } => match action {
                ActionSet::Single { portion, .. } => match (self.position(foot), portion) {
                    (FootPosition::Single { lane, .. }, FootPortion::Default) => vec![lane],
                    (FootPosition::Bracket { heel_lane, .. }, FootPortion::Heel) => vec![heel_lane],
                    (FootPosition::Bracket { toe_lane, .. }, FootPortion::Toe) => vec![toe_lane],
                    _ => vec![],
                },
                ActionSet::Dual { .. } => match self.position(foot) {
                    FootPosition::Bracket {
                        heel_lane, toe_lane, ..
                    } => vec![heel_lane, toe_lane],
                    _ => vec![],
                },
            },
        }
    }

    /// This node's orientation per `pad`'s tables (§3: "persists until a step
    /// untwists it" — recomputed from the current stance rather than tracked
    /// incrementally, so it is correct even when only one foot acted and the
    /// other stayed twisted in place).
    pub fn orientation(&self, pad: &PadModel) -> Orientation {
        let (Some(l), Some(r)) = (
            self.left.representative_lane(),
            self.right.representative_lane(),
        ) else {
            return Orientation::Forward;
        };
        let from_left = orientation_of(pad, Foot::Left, l, r);
        if from_left.is_twisted() {
            return from_left;
        }
        orientation_of(pad, Foot::Right, r, l)
    }
}
impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "L:{:?} R:{:?} twisted={}", self.left, self.right, self.twisted)
    }
}

/// An index into a [`NodeArena`]. Cheap to copy, used in edge lists instead
/// of owning references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);
impl NodeId {
    pub fn raw(self) -> usize {
        self.0 as usize
    }
}

/// Owns every [`GraphNode`] reachable while building a `StepGraph`,
/// deduplicated via hash-consing.
#[derive(Debug, Default, Clone)]
pub struct NodeArena {
    nodes: Vec<GraphNode>,
    index: FxHashMap<GraphNode, NodeId>,
}
impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Returns the existing id for `node` if present, otherwise inserts it.
    pub fn intern(&mut self, node: GraphNode) -> NodeId {
        if let Some(&id) = self.index.get(&node) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.index.insert(node, id);
        id
    }

    pub fn get(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.0 as usize]
    }

    /// Looks up `node`'s id without inserting it.
    pub fn peek(&self, node: &GraphNode) -> Option<NodeId> {
        self.index.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}
