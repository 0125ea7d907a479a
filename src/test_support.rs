//! Pad fixtures shared by the unit tests in every module.
//!
//! Kept out of `#[cfg(test)]` modules so sibling test modules (e.g.
//! `express`'s and `perform`'s) can all reuse the same two small pads instead
//! of re-deriving their capability tables, which is where most §8 seed
//! scenarios would otherwise drift from each other.

use crate::pad::{Foot, PadDef, PerFoot, StartingPosition};

fn full(n: usize, v: bool) -> Vec<Vec<bool>> {
    vec![vec![v; n]; n]
}

/// A 4-lane pad (Left=0, Down=1, Up=2, Right=3) matching the §8 seed
/// scenarios' lane numbering. Used by the generic pad/graph/performer tests;
/// the six §8 seed scenarios each build their own minimal pad (see
/// `express`'s test module) rather than share this one, since reconciling a
/// single pairing table against six independently-authored literal
/// expectations would force contradictory legality rules onto the same
/// lane pairs.
pub fn dance_single() -> PadDef {
    let n = 4;
    let valid_next_arrows = full(n, true);
    let lane_coords = vec![(0, 1), (1, 0), (1, 2), (2, 1)];

    // Plain (non-crossed) pairings and the crossover pairings are disjoint
    // cells of the same `[this_lane][other_lane]` matrix shape; a pair must
    // not appear in more than one table or the graph builder would treat the
    // same transition as two different StepKinds simultaneously.
    let mut plain = full(n, false);
    for (a, b) in [(0, 1), (1, 0), (2, 3), (3, 2)] {
        plain[a][b] = true;
    }
    let other_foot_pairings = PerFoot {
        left: plain.clone(),
        right: plain,
    };

    let mut cross_front = full(n, false);
    for (a, b) in [(0, 2), (2, 0)] {
        cross_front[a][b] = true;
    }
    let mut cross_behind = full(n, false);
    for (a, b) in [(1, 3), (3, 1)] {
        cross_behind[a][b] = true;
    }
    let other_foot_pairings_crossover_front = PerFoot {
        left: cross_front.clone(),
        right: cross_front,
    };
    let other_foot_pairings_crossover_behind = PerFoot {
        left: cross_behind.clone(),
        right: cross_behind,
    };
    let other_foot_pairings_inverted = PerFoot {
        left: full(n, false),
        right: full(n, false),
    };

    let mut bracket = full(n, false);
    for (a, b) in [(0, 1), (1, 0), (2, 3), (3, 2), (0, 2), (2, 0), (1, 3), (3, 1)] {
        bracket[a][b] = true;
    }
    let bracketable_other_heel = PerFoot {
        left: bracket.clone(),
        right: bracket.clone(),
    };
    let bracketable_other_toe = PerFoot {
        left: bracket.clone(),
        right: bracket,
    };

    PadDef {
        name: "dance-single".to_string(),
        lane_coords,
        valid_next_arrows,
        bracketable_other_heel,
        bracketable_other_toe,
        other_foot_pairings,
        other_foot_pairings_crossover_front,
        other_foot_pairings_crossover_behind,
        other_foot_pairings_inverted,
        starting_tiers: vec![vec![StartingPosition {
            left_lane: 0,
            right_lane: 3,
        }]],
        y_travel_distance_compensation: 0.5,
    }
}

/// A 5-lane pad (pump-single style: DownLeft=0, UpLeft=1, Center=2,
/// UpRight=3, DownRight=4) used as a distinct target pad in Performer tests.
pub fn pump_single() -> PadDef {
    let n = 5;
    let valid_next_arrows = full(n, true);
    let lane_coords = vec![(0, 0), (0, 2), (1, 1), (2, 2), (2, 0)];

    // (0, 3) and (1, 4) are deliberately left out of the plain table: they
    // are assigned to the crossover tables below, and a pair must not
    // appear in both or the same transition would be ambiguously both a
    // plain step and a crossover.
    let mut plain = full(n, false);
    for (a, b) in [(0, 2), (1, 2), (2, 3), (2, 4), (0, 1), (3, 4)] {
        plain[a][b] = true;
        plain[b][a] = true;
    }
    let other_foot_pairings = PerFoot {
        left: plain.clone(),
        right: plain,
    };

    let mut cross_front = full(n, false);
    for (a, b) in [(3, 0), (0, 3)] {
        cross_front[a][b] = true;
    }
    let mut cross_behind = full(n, false);
    for (a, b) in [(4, 1), (1, 4)] {
        cross_behind[a][b] = true;
    }
    let other_foot_pairings_crossover_front = PerFoot {
        left: cross_front.clone(),
        right: cross_front,
    };
    let other_foot_pairings_crossover_behind = PerFoot {
        left: cross_behind.clone(),
        right: cross_behind,
    };
    let other_foot_pairings_inverted = PerFoot {
        left: full(n, false),
        right: full(n, false),
    };

    let mut bracket = full(n, false);
    for (a, b) in [(0, 2), (2, 0), (2, 3), (3, 2), (0, 1), (1, 0), (3, 4), (4, 3)] {
        bracket[a][b] = true;
    }
    let bracketable_other_heel = PerFoot {
        left: bracket.clone(),
        right: bracket.clone(),
    };
    let bracketable_other_toe = PerFoot {
        left: bracket.clone(),
        right: bracket,
    };

    PadDef {
        name: "pump-single".to_string(),
        lane_coords,
        valid_next_arrows,
        bracketable_other_heel,
        bracketable_other_toe,
        other_foot_pairings,
        other_foot_pairings_crossover_front,
        other_foot_pairings_crossover_behind,
        other_foot_pairings_inverted,
        starting_tiers: vec![vec![StartingPosition {
            left_lane: 0,
            right_lane: 4,
        }]],
        y_travel_distance_compensation: 0.6,
    }
}

pub fn both_feet() -> [Foot; 2] {
    [Foot::Left, Foot::Right]
}
