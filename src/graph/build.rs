//! Breadth-first construction of a [`StepGraph`] from a [`PadModel`] (§4.2).
//!
//! For every reachable [`GraphNode`], every combination of (foot × portion
//! participation × candidate lane × [`StepKind`] × [`FootAction`]) is tested
//! against the pad's capability tables and, if legal, turned into an edge.
//! Nodes are deduplicated via [`NodeArena::intern`].

use super::link::{ActionSet, BracketPortionKind, FootAction, FootLinkState, GraphLink, StepKind};
use super::node::{orientation_of, FootPosition, GraphNode, NodeArena, NodeId, OccupancyKind, Orientation};
use crate::error::GraphBuildError;
use crate::pad::{Foot, FootPortion, PadModel};
use fxhash::FxHashSet;
use std::collections::VecDeque;

/// All reachable body positions on a pad, and all legal transitions between
/// them (§4.2).
#[derive(Debug, Clone)]
pub struct StepGraph {
    arena: NodeArena,
    start: NodeId,
    starting_tier_nodes: Vec<Vec<NodeId>>,
    outgoing: Vec<Vec<(GraphLink, NodeId)>>,
}
impl StepGraph {
    pub fn build(pad: &PadModel) -> Result<StepGraph, GraphBuildError> {
        let start_pos = pad.primary_starting_position();
        let start_left = FootPosition::Single {
            lane: start_pos.left_lane,
            occupancy: OccupancyKind::Resting,
        };
        let start_right = FootPosition::Single {
            lane: start_pos.right_lane,
            occupancy: OccupancyKind::Resting,
        };
        let start_node = GraphNode {
            left: start_left,
            right: start_right,
            twisted: resulting_twisted(pad, start_left, start_right),
        };

        let mut arena = NodeArena::new();
        let start = arena.intern(start_node);
        let mut outgoing: Vec<Vec<(GraphLink, NodeId)>> = vec![Vec::new()];
        let mut visited: FxHashSet<NodeId> = FxHashSet::default();
        visited.insert(start);
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            let node = *arena.get(id);
            let edges = enumerate_edges(pad, &node);
            let mut seen: FxHashSet<(GraphLink, NodeId)> = FxHashSet::default();
            let mut resolved = Vec::with_capacity(edges.len());
            for (link, succ_node) in edges {
                let succ_id = arena.intern(succ_node);
                if !seen.insert((link, succ_id)) {
                    continue;
                }
                resolved.push((link, succ_id));
                if visited.insert(succ_id) {
                    queue.push_back(succ_id);
                }
            }
            while outgoing.len() <= id.raw() {
                outgoing.push(Vec::new());
            }
            outgoing[id.raw()] = resolved;
        }
        while outgoing.len() < arena.len() {
            outgoing.push(Vec::new());
        }

        if arena.len() <= 1 {
            return Err(GraphBuildError::PadDataInconsistent(
                "no node is reachable from the starting position".to_string(),
            ));
        }

        let mut starting_tier_nodes = Vec::with_capacity(pad.starting_tiers().len());
        for tier in pad.starting_tiers() {
            let mut ids = Vec::new();
            for pos in tier {
                let left = FootPosition::Single {
                    lane: pos.left_lane,
                    occupancy: OccupancyKind::Resting,
                };
                let right = FootPosition::Single {
                    lane: pos.right_lane,
                    occupancy: OccupancyKind::Resting,
                };
                let node = GraphNode {
                    left,
                    right,
                    twisted: resulting_twisted(pad, left, right),
                };
                if let Some(id) = arena.peek(&node) {
                    ids.push(id);
                }
            }
            starting_tier_nodes.push(ids);
        }

        Ok(StepGraph {
            arena,
            start,
            starting_tier_nodes,
            outgoing,
        })
    }

    pub fn start_node(&self) -> NodeId {
        self.start
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        self.arena.get(id)
    }

    pub fn nodes_for_starting_tier(&self, tier: usize) -> &[NodeId] {
        self.starting_tier_nodes
            .get(tier)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn tier_count(&self) -> usize {
        self.starting_tier_nodes.len()
    }

    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = (GraphLink, NodeId)> + '_ {
        self.outgoing[id.raw()].iter().copied()
    }

    pub fn all_links(&self) -> impl Iterator<Item = GraphLink> + '_ {
        let mut seen: FxHashSet<GraphLink> = FxHashSet::default();
        self.outgoing
            .iter()
            .flatten()
            .filter_map(move |(link, _)| if seen.insert(*link) { Some(*link) } else { None })
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

/// Whether a position currently has any portion held or rolling.
fn is_holding(pos: FootPosition) -> bool {
    matches!(
        pos,
        FootPosition::Single {
            occupancy: OccupancyKind::Held | OccupancyKind::Rolling,
            ..
        } | FootPosition::Bracket {
            heel_occupancy: OccupancyKind::Held | OccupancyKind::Rolling,
            ..
        } | FootPosition::Bracket {
            toe_occupancy: OccupancyKind::Held | OccupancyKind::Rolling,
            ..
        }
    )
}

/// Legal `FootAction`s for a portion acting at a lane with current occupancy
/// `cur_occ` (`None` if the lane is freshly stepped on).
fn actions_for(cur_occ: Option<OccupancyKind>) -> &'static [FootAction] {
    match cur_occ {
        Some(OccupancyKind::Held) | Some(OccupancyKind::Rolling) => &[FootAction::Release],
        _ => &[FootAction::Tap, FootAction::Hold],
    }
}

fn occupancy_after(action: FootAction) -> OccupancyKind {
    match action {
        FootAction::Tap | FootAction::Release => OccupancyKind::Resting,
        FootAction::Hold => OccupancyKind::Held,
    }
}

/// All `(FootLinkState, resulting FootPosition)` candidates for `foot`
/// acting alone, given the rest of `node`.
///
/// `Lifted` (the foot has never stepped, or was just vacated by a swap) and
/// `Single` share the same "move to a different lane" legality: the only
/// difference is that a `Single` foot also has a `SameArrow` option on its
/// current lane, and its moves are gated by `valid_next_arrow` from that
/// lane. A lane currently occupied by the other foot is never a `NewArrow`
/// target regardless of which branch `cur` is in — it is a `FootSwap` (if
/// the other foot isn't holding) or simply unreachable.
fn foot_candidates(
    pad: &PadModel,
    node: &GraphNode,
    foot: Foot,
) -> Vec<(FootLinkState, FootPosition)> {
    let mut out = Vec::new();
    let cur = node.position(foot);
    let other = node.position(foot.other());
    let other_lane = other.representative_lane();
    let other_holding = is_holding(other);
    let other_occupies = |lane: usize| -> bool {
        match other {
            FootPosition::Single { lane: ol, .. } => ol == lane,
            FootPosition::Bracket {
                heel_lane, toe_lane, ..
            } => heel_lane == lane || toe_lane == lane,
            FootPosition::Lifted => false,
        }
    };
    let other_holding_lane = |lane: usize| -> bool {
        match other {
            FootPosition::Single { lane: ol, occupancy } => {
                ol == lane && matches!(occupancy, OccupancyKind::Held | OccupancyKind::Rolling)
            }
            FootPosition::Bracket {
                heel_lane,
                heel_occupancy,
                toe_lane,
                toe_occupancy,
            } => {
                (heel_lane == lane && matches!(heel_occupancy, OccupancyKind::Held | OccupancyKind::Rolling))
                    || (toe_lane == lane
                        && matches!(toe_occupancy, OccupancyKind::Held | OccupancyKind::Rolling))
            }
            FootPosition::Lifted => false,
        }
    };

    let cur_lane = match cur {
        FootPosition::Single { lane, occupancy } => {
            // SameArrow: re-tap or release the lane already occupied.
            for &action in actions_for(Some(occupancy)) {
                out.push((
                    FootLinkState::Step {
                        kind: StepKind::SameArrow,
                        action: ActionSet::Single {
                            portion: FootPortion::Default,
                            action,
                        },
                    },
                    FootPosition::Single {
                        lane,
                        occupancy: occupancy_after(action),
                    },
                ));
            }
            Some(lane)
        }
        FootPosition::Bracket { .. } => None, // handled by `bracket_candidates` below.
        FootPosition::Lifted => None,
    };
    if matches!(cur, FootPosition::Bracket { .. }) {
        bracket_candidates(pad, foot, cur, other, other_lane, &mut out);
        return out;
    }

    // A `Single` foot that is mid-hold or mid-roll cannot step away to a
    // different lane without abandoning the hold — the only continuation
    // left for it is the `SameArrow` candidate already pushed above (release
    // it, or keep riding a roll). It can still grow into a bracket (handled
    // below by `bracket_candidates`, which keeps the held lane as the Same
    // portion), since that doesn't require lifting the held portion.
    let held_in_place = matches!(
        cur,
        FootPosition::Single { occupancy, .. } if matches!(occupancy, OccupancyKind::Held | OccupancyKind::Rolling)
    );
    for lane in 0..pad.lane_count() {
        if held_in_place {
            break;
        }
        if Some(lane) == cur_lane {
            continue;
        }
        if let Some(cl) = cur_lane {
            if !pad.valid_next_arrow(cl, lane) {
                continue;
            }
        }
        if other_occupies(lane) {
            if !other_holding_lane(lane) {
                for &action in actions_for(None) {
                    out.push((
                        FootLinkState::Step {
                            kind: StepKind::FootSwap,
                            action: ActionSet::Single {
                                portion: FootPortion::Default,
                                action,
                            },
                        },
                        FootPosition::Single {
                            lane,
                            occupancy: occupancy_after(action),
                        },
                    ));
                }
            }
            continue;
        }
        let legal_plain = match other_lane {
            Some(ol) => pad.other_foot_pairing(foot, lane, ol),
            None => true,
        };
        if legal_plain {
            for &action in actions_for(None) {
                out.push((
                    FootLinkState::Step {
                        kind: StepKind::NewArrow,
                        action: ActionSet::Single {
                            portion: FootPortion::Default,
                            action,
                        },
                    },
                    FootPosition::Single {
                        lane,
                        occupancy: occupancy_after(action),
                    },
                ));
            }
        }
        if !other_holding {
            if let Some(ol) = other_lane {
                if pad.other_foot_pairing_crossover_front(foot, lane, ol) {
                    push_twist(&mut out, StepKind::CrossoverFront, lane);
                }
                if pad.other_foot_pairing_crossover_behind(foot, lane, ol) {
                    push_twist(&mut out, StepKind::CrossoverBehind, lane);
                }
                if pad.other_foot_pairing_inverted(foot, lane, ol) {
                    // The inverted table does not distinguish front from
                    // behind; which label applies is a matter of which side
                    // of the other foot this lane falls on.
                    let kind = match orientation_of(pad, foot, lane, ol) {
                        Orientation::CrossedBehind => StepKind::InvertBehind,
                        _ => StepKind::InvertFront,
                    };
                    push_twist(&mut out, kind, lane);
                }
            }
        }
    }

    bracket_candidates(pad, foot, cur, other, other_lane, &mut out);
    out
}

fn push_twist(out: &mut Vec<(FootLinkState, FootPosition)>, kind: StepKind, lane: usize) {
    for &action in actions_for(None) {
        out.push((
            FootLinkState::Step {
                kind,
                action: ActionSet::Single {
                    portion: FootPortion::Default,
                    action,
                },
            },
            FootPosition::Single {
                lane,
                occupancy: occupancy_after(action),
            },
        ));
    }
}

/// Bracket and bracket-one-arrow candidates for `foot`, appended to `out`.
fn bracket_candidates(
    pad: &PadModel,
    foot: Foot,
    cur: FootPosition,
    other: FootPosition,
    other_lane: Option<usize>,
    out: &mut Vec<(FootLinkState, FootPosition)>,
) {
    let other_holding_lane = |lane: usize| -> bool {
        match other {
            FootPosition::Single { lane: ol, occupancy } => {
                ol == lane && matches!(occupancy, OccupancyKind::Held | OccupancyKind::Rolling)
            }
            FootPosition::Bracket {
                heel_lane,
                heel_occupancy,
                toe_lane,
                toe_occupancy,
            } => {
                (heel_lane == lane && matches!(heel_occupancy, OccupancyKind::Held | OccupancyKind::Rolling))
                    || (toe_lane == lane
                        && matches!(toe_occupancy, OccupancyKind::Held | OccupancyKind::Rolling))
            }
            FootPosition::Lifted => false,
        }
    };
    let other_occupies = |lane: usize| -> bool {
        match other {
            FootPosition::Single { lane: ol, .. } => ol == lane,
            FootPosition::Bracket {
                heel_lane, toe_lane, ..
            } => heel_lane == lane || toe_lane == lane,
            FootPosition::Lifted => false,
        }
    };

    match cur {
        FootPosition::Bracket {
            heel_lane,
            heel_occupancy,
            toe_lane,
            toe_occupancy,
        } => {
            // Bracket-one-arrow: one portion keeps holding, the other acts solo.
            if matches!(heel_occupancy, OccupancyKind::Held | OccupancyKind::Rolling) {
                for_one_arrow_moves(
                    pad,
                    foot,
                    toe_lane,
                    other_lane,
                    FootPortion::Toe,
                    &mut |kind, action, lane| {
                        out.push((
                            FootLinkState::Step {
                                kind,
                                action: ActionSet::Single {
                                    portion: FootPortion::Toe,
                                    action,
                                },
                            },
                            FootPosition::Bracket {
                                heel_lane,
                                heel_occupancy,
                                toe_lane: lane,
                                toe_occupancy: occupancy_after(action),
                            },
                        ));
                    },
                );
            }
            if matches!(toe_occupancy, OccupancyKind::Held | OccupancyKind::Rolling) {
                for_one_arrow_moves(
                    pad,
                    foot,
                    heel_lane,
                    other_lane,
                    FootPortion::Heel,
                    &mut |kind, action, lane| {
                        out.push((
                            FootLinkState::Step {
                                kind,
                                action: ActionSet::Single {
                                    portion: FootPortion::Heel,
                                    action,
                                },
                            },
                            FootPosition::Bracket {
                                heel_lane: lane,
                                heel_occupancy: occupancy_after(action),
                                toe_lane,
                                toe_occupancy,
                            },
                        ));
                    },
                );
            }
        }
        FootPosition::Single { .. } | FootPosition::Lifted => {
            // Full two-portion bracket moves: enumerate every (heel_lane,
            // toe_lane) pair the pad marks mutually bracketable, paired with
            // every New/Same/Swap sub-kind combination.
            for heel_lane in 0..pad.lane_count() {
                for toe_lane in 0..pad.lane_count() {
                    if heel_lane == toe_lane {
                        continue;
                    }
                    if !pad.bracketable_other_toe(foot, heel_lane, toe_lane) {
                        continue;
                    }
                    let heel_kind = portion_kind(cur, heel_lane, FootPortion::Heel);
                    let toe_kind = portion_kind(cur, toe_lane, FootPortion::Toe);
                    let (Some(heel_kind), Some(toe_kind)) = (heel_kind, toe_kind) else {
                        continue;
                    };
                    if heel_kind == BracketPortionKind::Swap && !legal_swap_target(heel_lane, other, &other_holding_lane) {
                        continue;
                    }
                    if toe_kind == BracketPortionKind::Swap && !legal_swap_target(toe_lane, other, &other_holding_lane) {
                        continue;
                    }
                    if heel_kind != BracketPortionKind::Swap && other_occupies(heel_lane) {
                        continue;
                    }
                    if toe_kind != BracketPortionKind::Swap && other_occupies(toe_lane) {
                        continue;
                    }
                    let Some(step_kind) = bracket_step_kind(heel_kind, toe_kind) else {
                        continue;
                    };
                    let heel_cur_occ = portion_cur_occupancy(cur, heel_lane, heel_kind);
                    let toe_cur_occ = portion_cur_occupancy(cur, toe_lane, toe_kind);
                    for &heel_action in actions_for(heel_cur_occ) {
                        for &toe_action in actions_for(toe_cur_occ) {
                            out.push((
                                FootLinkState::Step {
                                    kind: step_kind,
                                    action: ActionSet::Dual {
                                        heel: heel_action,
                                        toe: toe_action,
                                    },
                                },
                                FootPosition::Bracket {
                                    heel_lane,
                                    heel_occupancy: occupancy_after(heel_action),
                                    toe_lane,
                                    toe_occupancy: occupancy_after(toe_action),
                                },
                            ));
                        }
                    }
                }
            }
        }
    }
}

fn for_one_arrow_moves(
    pad: &PadModel,
    foot: Foot,
    acting_cur_lane: usize,
    other_lane: Option<usize>,
    acting_portion: FootPortion,
    push: &mut dyn FnMut(StepKind, FootAction, usize),
) {
    let (same_kind, new_kind) = match acting_portion {
        FootPortion::Heel => (StepKind::BracketOneArrowHeelSame, StepKind::BracketOneArrowHeelNew),
        FootPortion::Toe => (StepKind::BracketOneArrowToeSame, StepKind::BracketOneArrowToeNew),
        FootPortion::Default => unreachable!("bracket-one-arrow always names Heel or Toe"),
    };
    // Same: re-tap/release the lane this portion already occupies. The
    // caller only calls this for the non-held portion, so it is always
    // currently at rest, not mid-hold.
    for &action in actions_for(None) {
        push(same_kind, action, acting_cur_lane);
    }
    for lane in 0..pad.lane_count() {
        if lane == acting_cur_lane || !pad.valid_next_arrow(acting_cur_lane, lane) {
            continue;
        }
        if Some(lane) == other_lane {
            continue;
        }
        let legal = match other_lane {
            Some(ol) => {
                pad.other_foot_pairing(foot, lane, ol) || pad.bracketable_other_heel(foot, lane, acting_cur_lane)
            }
            None => true,
        };
        if legal {
            for &action in actions_for(None) {
                push(new_kind, action, lane);
            }
        }
    }
}

fn portion_kind(cur: FootPosition, lane: usize, portion: FootPortion) -> Option<BracketPortionKind> {
    let already_here = match (cur, portion) {
        (
            FootPosition::Bracket {
                heel_lane, toe_lane, ..
            },
            FootPortion::Heel,
        ) => heel_lane == lane || toe_lane == lane,
        (
            FootPosition::Bracket {
                heel_lane, toe_lane, ..
            },
            FootPortion::Toe,
        ) => heel_lane == lane || toe_lane == lane,
        (FootPosition::Single { lane: l, .. }, _) => l == lane,
        _ => false,
    };
    if already_here {
        Some(BracketPortionKind::Same)
    } else {
        Some(BracketPortionKind::New)
    }
}

fn portion_cur_occupancy(
    cur: FootPosition,
    lane: usize,
    kind: BracketPortionKind,
) -> Option<OccupancyKind> {
    if kind != BracketPortionKind::Same {
        return None;
    }
    match cur {
        FootPosition::Single { lane: l, occupancy } if l == lane => Some(occupancy),
        FootPosition::Bracket {
            heel_lane,
            heel_occupancy,
            toe_lane,
            toe_occupancy,
        } => {
            if heel_lane == lane {
                Some(heel_occupancy)
            } else if toe_lane == lane {
                Some(toe_occupancy)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn legal_swap_target(
    lane: usize,
    other: FootPosition,
    other_holding_lane: &dyn Fn(usize) -> bool,
) -> bool {
    let occupied_by_other = match other {
        FootPosition::Single { lane: ol, .. } => ol == lane,
        FootPosition::Bracket {
            heel_lane, toe_lane, ..
        } => heel_lane == lane || toe_lane == lane,
        FootPosition::Lifted => false,
    };
    occupied_by_other && !other_holding_lane(lane)
}

fn bracket_step_kind(heel: BracketPortionKind, toe: BracketPortionKind) -> Option<StepKind> {
    use BracketPortionKind::*;
    Some(match (heel, toe) {
        (New, New) => StepKind::BracketHeelNewToeNew,
        (New, Same) => StepKind::BracketHeelNewToeSame,
        (New, Swap) => StepKind::BracketHeelNewToeSwap,
        (Same, New) => StepKind::BracketHeelSameToeNew,
        (Same, Same) => StepKind::BracketHeelSameToeSame,
        (Same, Swap) => StepKind::BracketHeelSameToeSwap,
        (Swap, New) => StepKind::BracketHeelSwapToeNew,
        (Swap, Same) => StepKind::BracketHeelSwapToeSame,
        (Swap, Swap) => StepKind::BracketHeelSwapToeSwap,
    })
}

/// Whether `kind` takes over one or more lanes from the other foot (§3's
/// `FootSwap` and the `*Swap` bracket sub-kinds), and if so, which lanes of
/// `resulting_pos` it vacates the other foot from.
fn swap_vacated_lanes(kind: StepKind, resulting_pos: FootPosition) -> Vec<usize> {
    if matches!(kind, StepKind::FootSwap) {
        return match resulting_pos {
            FootPosition::Single { lane, .. } => vec![lane],
            _ => vec![],
        };
    }
    if let Some((heel_kind, toe_kind)) = kind.bracket_parts() {
        if let FootPosition::Bracket {
            heel_lane, toe_lane, ..
        } = resulting_pos
        {
            let mut vacated = Vec::new();
            if heel_kind == BracketPortionKind::Swap {
                vacated.push(heel_lane);
            }
            if toe_kind == BracketPortionKind::Swap {
                vacated.push(toe_lane);
            }
            return vacated;
        }
    }
    Vec::new()
}

/// The position a foot is left in once `lane` is taken over from it by a
/// [`StepKind::FootSwap`] or a `*Swap` bracket portion (§4.2's `FootSwap`
/// legality rule: "the other foot's portion on that lane vacates").
fn vacate_lane(pos: FootPosition, lane: usize) -> FootPosition {
    match pos {
        FootPosition::Single { lane: l, .. } if l == lane => FootPosition::Lifted,
        FootPosition::Bracket {
            heel_lane,
            heel_occupancy,
            toe_lane,
            toe_occupancy,
        } if heel_lane == lane => FootPosition::Single {
            lane: toe_lane,
            occupancy: toe_occupancy,
        },
        FootPosition::Bracket {
            heel_lane,
            heel_occupancy,
            toe_lane,
            toe_occupancy,
        } if toe_lane == lane => FootPosition::Single {
            lane: heel_lane,
            occupancy: heel_occupancy,
        },
        other => other,
    }
}

/// Whether `kind` requires the other foot to stay put this step (a swap
/// legality check reads the other foot's *current* lane); such a step cannot
/// be combined with a simultaneous move by that other foot into a two-foot
/// jump.
fn requires_other_foot_stationary(kind: StepKind) -> bool {
    matches!(kind, StepKind::FootSwap)
        || kind
            .bracket_parts()
            .map(|(h, t)| h == BracketPortionKind::Swap || t == BracketPortionKind::Swap)
            .unwrap_or(false)
}

/// All legal edges out of `node`: single-foot steps and two-foot jumps.
fn enumerate_edges(pad: &PadModel, node: &GraphNode) -> Vec<(GraphLink, GraphNode)> {
    let left_opts = foot_candidates(pad, node, Foot::Left);
    let right_opts = foot_candidates(pad, node, Foot::Right);
    let mut out = Vec::new();

    for (st, pos) in &left_opts {
        let mut right_pos = node.right;
        if let Some(kind) = st.kind() {
            for lane in swap_vacated_lanes(kind, *pos) {
                right_pos = vacate_lane(right_pos, lane);
            }
        }
        out.push(make_edge(pad, (*st, *pos), (FootLinkState::Idle, right_pos)));
    }
    for (st, pos) in &right_opts {
        let mut left_pos = node.left;
        if let Some(kind) = st.kind() {
            for lane in swap_vacated_lanes(kind, *pos) {
                left_pos = vacate_lane(left_pos, lane);
            }
        }
        out.push(make_edge(pad, (FootLinkState::Idle, left_pos), (*st, *pos)));
    }
    for (lst, lpos) in &left_opts {
        if lst.kind().map(requires_other_foot_stationary).unwrap_or(false) {
            continue;
        }
        for (rst, rpos) in &right_opts {
            if rst.kind().map(requires_other_foot_stationary).unwrap_or(false) {
                continue;
            }
            if lanes_disjoint(*lpos, *rpos) {
                out.push(make_edge(pad, (*lst, *lpos), (*rst, *rpos)));
            }
        }
    }
    out
}

/// Whether the static pairing `(left, right)` is itself a crossed or
/// inverted stance, per the pad's own tables. Checked from both feet's side
/// since only the foot that is actually out of place shows up in its own
/// table.
fn resulting_twisted(pad: &PadModel, left: FootPosition, right: FootPosition) -> bool {
    let (Some(l), Some(r)) = (left.representative_lane(), right.representative_lane()) else {
        return false;
    };
    orientation_of(pad, Foot::Left, l, r).is_twisted() || orientation_of(pad, Foot::Right, r, l).is_twisted()
}

fn lanes_of(pos: FootPosition) -> Vec<usize> {
    match pos {
        FootPosition::Lifted => vec![],
        FootPosition::Single { lane, .. } => vec![lane],
        FootPosition::Bracket {
            heel_lane, toe_lane, ..
        } => vec![heel_lane, toe_lane],
    }
}

fn lanes_disjoint(a: FootPosition, b: FootPosition) -> bool {
    let la = lanes_of(a);
    let lb = lanes_of(b);
    la.iter().all(|l| !lb.contains(l))
}

/// Builds the `(GraphLink, GraphNode)` pair for one candidate edge.
///
/// `twisted` on the resulting node is derived straight from the resulting
/// `(left, right)` lanes against the pad's crossover/inverted tables, not
/// accumulated from this edge's `StepKind`s: orientation is a property of
/// the pair's final stance (§3's "persists until a step untwists it"), so
/// re-deriving it from scratch every edge gets that persistence for free,
/// including when only one foot acts and the other stays crossed in place.
fn make_edge(
    pad: &PadModel,
    left: (FootLinkState, FootPosition),
    right: (FootLinkState, FootPosition),
) -> (GraphLink, GraphNode) {
    let twisted = resulting_twisted(pad, left.1, right.1);
    (
        GraphLink {
            left: left.0,
            right: right.0,
        },
        GraphNode {
            left: left.1,
            right: right.1,
            twisted,
        },
    )
}
