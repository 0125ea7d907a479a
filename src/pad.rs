//! Static per-pad geometry and per-lane legality tables (component C1).
//!
//! A [`PadModel`] is constructed once per pad layout (e.g. "dance-single",
//! "pump-single") and shared read-only for the rest of the process's
//! lifetime; see §5 of the design notes. It is pure data plus trivial query
//! accessors, same shape as the teacher's [`crate::simfile::Gamemode`] lookup
//! tables but data-driven instead of hardcoded per variant, since a pad's
//! capability tables are too large to hand-author as match arms.

use crate::error::PadModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which foot is stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Foot {
    Left,
    Right,
}
impl Foot {
    pub fn other(self) -> Foot {
        match self {
            Foot::Left => Foot::Right,
            Foot::Right => Foot::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Foot::Left => 0,
            Foot::Right => 1,
        }
    }
}
impl fmt::Display for Foot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Foot::Left => "Left",
            Foot::Right => "Right",
        })
    }
}

/// Which part of a foot is under consideration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FootPortion {
    Default,
    Heel,
    Toe,
}

/// An `N x N` boolean matrix indexed `[this_lane][other_lane]`.
pub type LaneMatrix = Vec<Vec<bool>>;

/// A per-foot pair of [`LaneMatrix`]es.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerFoot<T> {
    pub left: T,
    pub right: T,
}
impl<T> PerFoot<T> {
    pub fn get(&self, foot: Foot) -> &T {
        match foot {
            Foot::Left => &self.left,
            Foot::Right => &self.right,
        }
    }
}

/// A starting position: one lane for each foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingPosition {
    pub left_lane: usize,
    pub right_lane: usize,
}

/// The raw, unvalidated definition of a pad layout.
///
/// This is what a `load_pad_model` collaborator (§6, out of scope here)
/// would deserialize from a layout file before handing it to
/// [`PadModel::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadDef {
    pub name: String,
    /// `(x, y)` coordinate of each lane, in abstract panel units.
    pub lane_coords: Vec<(i32, i32)>,
    /// `valid_next_arrows[from][to]`: can a foot move to `to` at all from `from`.
    pub valid_next_arrows: LaneMatrix,
    pub bracketable_other_heel: PerFoot<LaneMatrix>,
    pub bracketable_other_toe: PerFoot<LaneMatrix>,
    pub other_foot_pairings: PerFoot<LaneMatrix>,
    pub other_foot_pairings_crossover_front: PerFoot<LaneMatrix>,
    pub other_foot_pairings_crossover_behind: PerFoot<LaneMatrix>,
    pub other_foot_pairings_inverted: PerFoot<LaneMatrix>,
    /// Tiers of preferred starting positions, most-preferred first.
    pub starting_tiers: Vec<Vec<StartingPosition>>,
    /// Scalar used to discount Y-axis (forward/back) travel distance relative to X.
    pub y_travel_distance_compensation: f64,
}

/// A validated, immutable pad layout.
///
/// Construction fails (see [`PadModelError`]) if the capability tables have
/// inconsistent dimensions or reference lanes out of range, or if no
/// starting position is well-formed.
#[derive(Debug, Clone)]
pub struct PadModel {
    def: PadDef,
}
impl PadModel {
    pub fn build(def: PadDef) -> Result<PadModel, PadModelError> {
        let n = def.lane_coords.len();
        check_matrix("valid_next_arrows", &def.valid_next_arrows, n)?;
        for (name, pf) in [
            ("bracketable_other_heel", &def.bracketable_other_heel),
            ("bracketable_other_toe", &def.bracketable_other_toe),
            ("other_foot_pairings", &def.other_foot_pairings),
            (
                "other_foot_pairings_crossover_front",
                &def.other_foot_pairings_crossover_front,
            ),
            (
                "other_foot_pairings_crossover_behind",
                &def.other_foot_pairings_crossover_behind,
            ),
            (
                "other_foot_pairings_inverted",
                &def.other_foot_pairings_inverted,
            ),
        ] {
            check_matrix(name, &pf.left, n)?;
            check_matrix(name, &pf.right, n)?;
        }
        if def.starting_tiers.is_empty() || def.starting_tiers.iter().all(|t| t.is_empty()) {
            return Err(PadModelError::NoStartingTiers);
        }
        for (tier_idx, tier) in def.starting_tiers.iter().enumerate() {
            for pos in tier {
                if pos.left_lane >= n || pos.right_lane >= n {
                    return Err(PadModelError::UnknownStartingLane {
                        tier: tier_idx,
                        left: pos.left_lane,
                        right: pos.right_lane,
                    });
                }
            }
        }
        Ok(PadModel { def })
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn lane_count(&self) -> usize {
        self.def.lane_coords.len()
    }

    pub fn lane_coord(&self, lane: usize) -> (i32, i32) {
        self.def.lane_coords[lane]
    }

    pub fn y_travel_distance_compensation(&self) -> f64 {
        self.def.y_travel_distance_compensation
    }

    /// Weighted Euclidean distance between two lanes, per §4.4 tier 2.
    pub fn lane_distance(&self, a: usize, b: usize) -> f64 {
        let (ax, ay) = self.lane_coord(a);
        let (bx, by) = self.lane_coord(b);
        let dx = (ax - bx) as f64;
        let dy = (ay - by) as f64 * self.def.y_travel_distance_compensation;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn valid_next_arrow(&self, from: usize, to: usize) -> bool {
        self.def.valid_next_arrows[from][to]
    }

    pub fn bracketable_other_heel(&self, foot: Foot, this_lane: usize, other_lane: usize) -> bool {
        self.def.bracketable_other_heel.get(foot)[this_lane][other_lane]
    }

    pub fn bracketable_other_toe(&self, foot: Foot, this_lane: usize, other_lane: usize) -> bool {
        self.def.bracketable_other_toe.get(foot)[this_lane][other_lane]
    }

    pub fn other_foot_pairing(&self, foot: Foot, this_lane: usize, other_lane: usize) -> bool {
        self.def.other_foot_pairings.get(foot)[this_lane][other_lane]
    }

    pub fn other_foot_pairing_crossover_front(
        &self,
        foot: Foot,
        this_lane: usize,
        other_lane: usize,
    ) -> bool {
        self.def.other_foot_pairings_crossover_front.get(foot)[this_lane][other_lane]
    }

    pub fn other_foot_pairing_crossover_behind(
        &self,
        foot: Foot,
        this_lane: usize,
        other_lane: usize,
    ) -> bool {
        self.def.other_foot_pairings_crossover_behind.get(foot)[this_lane][other_lane]
    }

    pub fn other_foot_pairing_inverted(
        &self,
        foot: Foot,
        this_lane: usize,
        other_lane: usize,
    ) -> bool {
        self.def.other_foot_pairings_inverted.get(foot)[this_lane][other_lane]
    }

    pub fn starting_tiers(&self) -> &[Vec<StartingPosition>] {
        &self.def.starting_tiers
    }

    /// The pad's primary starting position: tier 0's first entry.
    pub fn primary_starting_position(&self) -> StartingPosition {
        self.def.starting_tiers[0][0]
    }
}

fn check_matrix(name: &'static str, m: &LaneMatrix, n: usize) -> Result<(), PadModelError> {
    if m.len() != n {
        return Err(PadModelError::DimensionMismatch {
            table: name,
            rows: m.len(),
            expected: n,
        });
    }
    for row in m {
        if row.len() != n {
            return Err(PadModelError::DimensionMismatch {
                table: name,
                rows: row.len(),
                expected: n,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dance_single;

    #[test]
    fn build_succeeds_on_well_formed_def() {
        let model = PadModel::build(dance_single()).expect("valid pad");
        assert_eq!(model.lane_count(), 4);
        assert_eq!(
            model.primary_starting_position(),
            StartingPosition {
                left_lane: 0,
                right_lane: 3
            }
        );
    }

    #[test]
    fn build_rejects_dimension_mismatch() {
        let mut def = dance_single();
        def.valid_next_arrows.pop();
        let err = PadModel::build(def).unwrap_err();
        assert!(matches!(err, PadModelError::DimensionMismatch { .. }));
    }

    #[test]
    fn build_rejects_out_of_range_starting_lane() {
        let mut def = dance_single();
        def.starting_tiers = vec![vec![StartingPosition {
            left_lane: 0,
            right_lane: 9,
        }]];
        let err = PadModel::build(def).unwrap_err();
        assert!(matches!(err, PadModelError::UnknownStartingLane { .. }));
    }

    #[test]
    fn build_rejects_no_starting_tiers() {
        let mut def = dance_single();
        def.starting_tiers = vec![];
        let err = PadModel::build(def).unwrap_err();
        assert!(matches!(err, PadModelError::NoStartingTiers));
    }
}
