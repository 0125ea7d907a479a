//! The Performer's lexicographic cost tiers (§4.4, tiers 1-6). Fields are
//! declared in tier-priority order, same pattern as `express::cost::ExpressCost`,
//! except ambiguity is declared *first* here rather than last — per spec,
//! a misleading/ambiguous lane assignment is worse than any comfort tradeoff,
//! so it dominates every other tier instead of only breaking final ties.

use crate::chart::Time;
use crate::config::PerformanceConfig;
use crate::graph::{GraphLink, GraphLinkInstance, GraphNode, NodeId, Orientation};
use crate::pad::{Foot, PadModel};
use ordered_float::OrderedFloat;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::hash::{Hash, Hasher};
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct PerformCost {
    pub ambiguity: OrderedFloat<f64>,
    pub step_tightening: OrderedFloat<f64>,
    pub lateral_tightening: OrderedFloat<f64>,
    pub facing: OrderedFloat<f64>,
    pub distribution: OrderedFloat<f64>,
    pub tiebreak: OrderedFloat<f64>,
}
impl Add for PerformCost {
    type Output = PerformCost;
    fn add(self, rhs: PerformCost) -> PerformCost {
        PerformCost {
            ambiguity: self.ambiguity + rhs.ambiguity,
            step_tightening: self.step_tightening + rhs.step_tightening,
            lateral_tightening: self.lateral_tightening + rhs.lateral_tightening,
            facing: self.facing + rhs.facing,
            distribution: self.distribution + rhs.distribution,
            tiebreak: self.tiebreak + rhs.tiebreak,
        }
    }
}

/// Per-conversion bookkeeping the cost tiers need about steps already taken:
/// each foot's last move (for tier 2), a capped window of recent lateral
/// movement (tier 3), running facing counts (tier 4), and per-lane tap
/// counts (tier 5). Cloned into each branch of the search the way the
/// Expressor threads `last_single_foot` through its `StateRecord`s, just with
/// more to carry.
#[derive(Debug, Clone)]
pub struct PerformState {
    last_move: [Option<(Time, usize)>; 2],
    lateral_history: Vec<(Time, f64)>,
    inward_steps: usize,
    outward_steps: usize,
    total_steps: usize,
    lane_counts: Vec<usize>,
}
impl PerformState {
    pub fn new(lane_count: usize) -> PerformState {
        PerformState {
            last_move: [None, None],
            lateral_history: Vec::new(),
            inward_steps: 0,
            outward_steps: 0,
            total_steps: 0,
            lane_counts: vec![0; lane_count],
        }
    }
}

/// The cost of taking `link` (landing in `succ`) from `state`, plus the
/// updated state, or `None` if a foot would have to stretch further than
/// `stretch_distance_max` (tier 2's hard infeasibility cutoff).
#[allow(clippy::too_many_arguments)]
pub fn step_cost(
    pad: &PadModel,
    config: &PerformanceConfig,
    state: &PerformState,
    link: GraphLink,
    succ: &GraphNode,
    time: Time,
    average_nps: f64,
    seed: u64,
    step_index: usize,
    succ_id: NodeId,
    instance: GraphLinkInstance,
) -> Option<(PerformCost, PerformState)> {
    let mut state = state.clone();
    let mut step_tightening = 0.0;
    let mut lateral_tightening = 0.0;

    for foot in [Foot::Left, Foot::Right] {
        let link_state = link.for_foot(foot);
        if link_state.is_idle() {
            continue;
        }
        let Some(&lane) = succ.acted_lanes(foot, link_state).first() else {
            continue;
        };
        let idx = foot.index();

        if let Some((last_time, last_lane)) = state.last_move[idx] {
            let dt = (time.as_f64() - last_time.as_f64()).max(1e-6);
            let dist = pad.lane_distance(last_lane, lane);
            let st = &config.step_tightening;
            if dist > st.stretch_distance_max {
                return None;
            }

            let speed_frac = if dt >= st.travel_speed_max_seconds {
                0.0
            } else if dt <= st.travel_speed_min_seconds {
                1.0
            } else {
                (st.travel_speed_max_seconds - dt) / (st.travel_speed_max_seconds - st.travel_speed_min_seconds)
            };
            step_tightening += speed_frac * (dist / dt);

            let dist_frac = if dist <= st.travel_distance_min {
                0.0
            } else if dist >= st.travel_distance_max {
                1.0
            } else {
                (dist - st.travel_distance_min) / (st.travel_distance_max - st.travel_distance_min)
            };
            step_tightening += dist_frac;
            if dist > st.stretch_distance_min {
                step_tightening +=
                    ((dist - st.stretch_distance_min) / (st.stretch_distance_max - st.stretch_distance_min)).clamp(0.0, 1.0);
            }

            let (lx, _) = pad.lane_coord(lane);
            let (plx, _) = pad.lane_coord(last_lane);
            state.lateral_history.push((time, (lx - plx) as f64));
            let lt = &config.lateral_tightening;
            if state.lateral_history.len() > lt.pattern_length {
                let excess = state.lateral_history.len() - lt.pattern_length;
                state.lateral_history.drain(0..excess);
            }
            if state.lateral_history.len() == lt.pattern_length {
                let all_positive = state.lateral_history.iter().all(|(_, d)| *d > 0.0);
                let all_negative = state.lateral_history.iter().all(|(_, d)| *d < 0.0);
                if all_positive || all_negative {
                    let span = (state.lateral_history.last().unwrap().0.as_f64()
                        - state.lateral_history.first().unwrap().0.as_f64())
                    .max(1e-6);
                    let lateral_speed = state.lateral_history.iter().map(|(_, d)| d.abs()).sum::<f64>() / span;
                    let local_nps = state.lateral_history.len() as f64 / span;
                    if lateral_speed > lt.speed && local_nps > lt.relative_nps * average_nps && local_nps > lt.absolute_nps {
                        lateral_tightening += lateral_speed;
                    }
                }
            }
        }

        state.last_move[idx] = Some((time, lane));
        state.lane_counts[lane] += 1;
    }

    state.total_steps += 1;
    match succ.orientation(pad) {
        Orientation::CrossedFront => state.outward_steps += 1,
        Orientation::CrossedBehind => state.inward_steps += 1,
        Orientation::Forward => {}
    }
    let f = &config.facing;
    let inward_frac = state.inward_steps as f64 / state.total_steps as f64;
    let outward_frac = state.outward_steps as f64 / state.total_steps as f64;
    let mut facing = 0.0;
    if inward_frac > f.max_inward_percentage {
        facing += (inward_frac - f.max_inward_percentage) * 10.0;
    }
    if outward_frac > f.max_outward_percentage {
        facing += (outward_frac - f.max_outward_percentage) * 10.0;
    }

    let weights = config.normalized_weights(pad.name(), pad.lane_count());
    let total_counts: usize = state.lane_counts.iter().sum();
    let distribution = if total_counts == 0 {
        0.0
    } else {
        state
            .lane_counts
            .iter()
            .zip(&weights)
            .map(|(&c, &w)| ((c as f64 / total_counts as f64) - w).abs())
            .sum()
    };

    // Per §4.4 tier 6: a deterministic pseudo-random value seeded by a hash
    // of the chart's identifier (here, the caller's `seed` plus this
    // candidate's own identity so that distinct branches of the same search
    // don't collide). Same two-step "hash then seed an RNG" shape as the
    // teacher's `simfile_rng` (`src/main.rs`), swapping `fxhash::hash64` for
    // a `FxHasher` so the per-candidate key can mix a `GraphLinkInstance`.
    let mut hasher = fxhash::FxHasher::default();
    seed.hash(&mut hasher);
    step_index.hash(&mut hasher);
    succ_id.hash(&mut hasher);
    instance.hash(&mut hasher);
    let mut rng = Xoshiro256Plus::seed_from_u64(hasher.finish());
    let tiebreak: f64 = rng.gen();

    Some((
        PerformCost {
            ambiguity: OrderedFloat(0.0),
            step_tightening: OrderedFloat(step_tightening),
            lateral_tightening: OrderedFloat(lateral_tightening),
            facing: OrderedFloat(facing),
            distribution: OrderedFloat(distribution),
            tiebreak: OrderedFloat(tiebreak),
        },
        state,
    ))
}
