//! The Expressor's lexicographic cost tiers (§4.3, tiers 2-7; tier 1
//! infeasibility is handled by discarding candidates rather than scoring
//! them). Fields are declared in tier-priority order so the derived `Ord`
//! gives exactly the lexicographic comparison the search needs — the pattern
//! `Glubus-rvsrg` uses `OrderedFloat` tuples for.

use crate::graph::{FootPosition, GraphLink, GraphNode, OccupancyKind, StepKind};
use crate::config::{BracketParsingMethod, ExpressionConfig};
use crate::pad::Foot;
use fxhash::FxHashSet;
use ordered_float::OrderedFloat;
use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct ExpressCost {
    /// The jump-to-step disambiguation's "mine following" signal (§4.3):
    /// placed ahead of every other tier so it decides the foot assignment
    /// outright whenever it applies, the same way a hold's structural
    /// unavailability does.
    pub mine_tag: OrderedFloat<f64>,
    pub bracket_policy: OrderedFloat<f64>,
    pub double_step: OrderedFloat<f64>,
    pub footswap_vs_jack: OrderedFloat<f64>,
    pub twisting: OrderedFloat<f64>,
    pub orientation_continuity: OrderedFloat<f64>,
    pub ambiguity: OrderedFloat<f64>,
}
impl Add for ExpressCost {
    type Output = ExpressCost;
    fn add(self, rhs: ExpressCost) -> ExpressCost {
        ExpressCost {
            mine_tag: self.mine_tag + rhs.mine_tag,
            bracket_policy: self.bracket_policy + rhs.bracket_policy,
            double_step: self.double_step + rhs.double_step,
            footswap_vs_jack: self.footswap_vs_jack + rhs.footswap_vs_jack,
            twisting: self.twisting + rhs.twisting,
            orientation_continuity: self.orientation_continuity + rhs.orientation_continuity,
            ambiguity: self.ambiguity + rhs.ambiguity,
        }
    }
}

/// Whether `foot` is the sole acting foot on `link` (not idle, not part of a
/// jump); `None` when both feet act (a jump) or neither does.
pub fn single_acting_foot(link: GraphLink) -> Option<Foot> {
    match (link.left.is_idle(), link.right.is_idle()) {
        (false, true) => Some(Foot::Left),
        (true, false) => Some(Foot::Right),
        _ => None,
    }
}

/// The per-step contribution to tiers 2-6 for taking `link` from a state
/// where `last_single_foot` last acted alone, landing in `succ`.
///
/// `group_note_count` is the number of simultaneous step-notes `link` is
/// covering; when it exceeds two (a simultaneous group that cannot be
/// covered without at least one foot bracketing) and
/// `config.use_aggressive_when_simultaneous_exceeds_two_feet` is set, a
/// bracket reading is forced to the `Aggressive` cost regardless of the
/// configured method, since `NoBrackets`/`Balanced` costs would otherwise
/// fight the only readings that can physically cover the group.
pub fn edge_cost(
    config: &ExpressionConfig,
    method: BracketParsingMethod,
    link: GraphLink,
    succ: &GraphNode,
    last_single_foot: Option<Foot>,
    group_note_count: usize,
) -> ExpressCost {
    let mut cost = ExpressCost::default();

    let is_bracket = [link.left, link.right].iter().any(|st| {
        st.kind()
            .map(|k| k.is_bracket() || k.is_bracket_one_arrow())
            .unwrap_or(false)
    });
    if is_bracket {
        let forced_aggressive =
            group_note_count > 2 && config.use_aggressive_when_simultaneous_exceeds_two_feet;
        cost.bracket_policy = OrderedFloat(if forced_aggressive {
            0.0
        } else {
            match method {
                BracketParsingMethod::Aggressive => 0.0,
                BracketParsingMethod::Balanced => 1.0,
                BracketParsingMethod::NoBrackets => 1000.0,
            }
        });
    }

    let acted_foot = single_acting_foot(link);
    if let (Some(prev), Some(acted)) = (last_single_foot, acted_foot) {
        // §4.3 tier 3 penalizes consecutive same-foot steps "to unoccupied
        // new lanes" specifically — a same-foot jack (repeated `SameArrow`)
        // is not a move to a new lane and must go unpenalized, or the search
        // would prefer alternating footswaps over a plain jack.
        if prev == acted && matches!(link.for_foot(acted).kind(), Some(StepKind::NewArrow)) {
            cost.double_step = OrderedFloat(5.0);
        }
    }

    if let Some(acted) = acted_foot {
        if matches!(link.for_foot(acted).kind(), Some(StepKind::FootSwap)) {
            cost.footswap_vs_jack = OrderedFloat(2.0);
        }
    }

    let twisting_now = [link.left, link.right]
        .iter()
        .any(|st| st.kind().map(StepKind::is_twisting).unwrap_or(false));
    if twisting_now {
        cost.twisting = OrderedFloat(3.0);
    }
    if succ.twisted {
        cost.orientation_continuity = OrderedFloat(1.0);
    }

    cost
}

/// The "mine following" half of §4.3's jump-to-step disambiguation: a mine
/// landing between the previous step and this one, in a lane a foot is
/// currently resting on, tags that foot as the one that stepped there —
/// which, for picking the *next* step, makes it unavailable exactly like a
/// hold would. `tagged_lanes` is the set of such lanes for this transition;
/// moving a resting foot off one of them costs heavily, so the search prefers
/// the other foot whenever both a mine tag and an ambiguous alternative
/// exist. Mine tags dominate hold signals simply by applying independently
/// of them: a held foot already can't produce this candidate at all (no
/// `NewArrow`/`CrossoverFront`/etc. edge exists for a foot mid-hold), so this
/// penalty only ever has to arbitrate the no-hold case.
pub fn mine_tag_cost(parent: &GraphNode, link: GraphLink, tagged_lanes: &FxHashSet<usize>) -> f64 {
    let mut cost = 0.0;
    for foot in [Foot::Left, Foot::Right] {
        if link.for_foot(foot).is_idle() {
            continue;
        }
        if let FootPosition::Single {
            lane,
            occupancy: OccupancyKind::Resting,
        } = parent.position(foot)
        {
            if tagged_lanes.contains(&lane) {
                cost += 50.0;
            }
        }
    }
    cost
}
