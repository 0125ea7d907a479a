//! [`StepKind`], [`FootAction`] and [`GraphLink`]: the labelled edges of a
//! step graph.
//!
//! Per §9, the source models step-types as a class hierarchy; here they are
//! a plain tagged union with table-driven legality (in `graph::build`)
//! instead of one struct-per-variant with virtual dispatch.

use crate::pad::FootPortion;
use serde::{Deserialize, Serialize};

/// The closed set of labelled movements the core recognizes (§3). About
/// twenty variants: seven "simple" one-portion moves, nine two-portion
/// bracket moves (the cross product of {New, Same, Swap} for heel and toe),
/// and four "bracket-one-arrow" moves (one portion already holding, the
/// other taps solo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    SameArrow,
    NewArrow,
    CrossoverFront,
    CrossoverBehind,
    InvertFront,
    InvertBehind,
    FootSwap,
    BracketHeelNewToeNew,
    BracketHeelNewToeSame,
    BracketHeelNewToeSwap,
    BracketHeelSameToeNew,
    BracketHeelSameToeSame,
    BracketHeelSameToeSwap,
    BracketHeelSwapToeNew,
    BracketHeelSwapToeSame,
    BracketHeelSwapToeSwap,
    BracketOneArrowHeelNew,
    BracketOneArrowHeelSame,
    BracketOneArrowToeNew,
    BracketOneArrowToeSame,
}
impl StepKind {
    pub fn is_bracket(self) -> bool {
        matches!(
            self,
            StepKind::BracketHeelNewToeNew
                | StepKind::BracketHeelNewToeSame
                | StepKind::BracketHeelNewToeSwap
                | StepKind::BracketHeelSameToeNew
                | StepKind::BracketHeelSameToeSame
                | StepKind::BracketHeelSameToeSwap
                | StepKind::BracketHeelSwapToeNew
                | StepKind::BracketHeelSwapToeSame
                | StepKind::BracketHeelSwapToeSwap
        )
    }

    pub fn is_bracket_one_arrow(self) -> bool {
        matches!(
            self,
            StepKind::BracketOneArrowHeelNew
                | StepKind::BracketOneArrowHeelSame
                | StepKind::BracketOneArrowToeNew
                | StepKind::BracketOneArrowToeSame
        )
    }

    pub fn is_crossover(self) -> bool {
        matches!(self, StepKind::CrossoverFront | StepKind::CrossoverBehind)
    }

    pub fn is_invert(self) -> bool {
        matches!(self, StepKind::InvertFront | StepKind::InvertBehind)
    }

    /// Whether taking this step leaves the body twisted (crossed/inverted).
    pub fn is_twisting(self) -> bool {
        self.is_crossover() || self.is_invert()
    }

    /// The `(heel, toe)` sub-kinds for a two-portion bracket step, used by
    /// `graph::build` to decide each portion's resulting lane kind.
    pub fn bracket_parts(self) -> Option<(BracketPortionKind, BracketPortionKind)> {
        use BracketPortionKind::*;
        use StepKind::*;
        Some(match self {
            BracketHeelNewToeNew => (New, New),
            BracketHeelNewToeSame => (New, Same),
            BracketHeelNewToeSwap => (New, Swap),
            BracketHeelSameToeNew => (Same, New),
            BracketHeelSameToeSame => (Same, Same),
            BracketHeelSameToeSwap => (Same, Swap),
            BracketHeelSwapToeNew => (Swap, New),
            BracketHeelSwapToeSame => (Swap, Same),
            BracketHeelSwapToeSwap => (Swap, Swap),
            _ => return None,
        })
    }

    /// The acting portion and its sub-kind for a bracket-one-arrow step.
    pub fn bracket_one_arrow_part(self) -> Option<(FootPortion, BracketPortionKind)> {
        use BracketPortionKind::*;
        use StepKind::*;
        Some(match self {
            BracketOneArrowHeelNew => (FootPortion::Heel, New),
            BracketOneArrowHeelSame => (FootPortion::Heel, Same),
            BracketOneArrowToeNew => (FootPortion::Toe, New),
            BracketOneArrowToeSame => (FootPortion::Toe, Same),
            _ => return None,
        })
    }
}

/// Whether a bracket portion lands on a new lane, stays on the lane it
/// already held, or swaps in from the other foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketPortionKind {
    New,
    Same,
    Swap,
}

/// `{Tap, Hold, Release}`, attached to each moving portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FootAction {
    Tap,
    Hold,
    Release,
}

/// Which portion(s) of an acting foot move, and with what action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSet {
    /// One portion acts. `portion` is `Default` for every simple `StepKind`
    /// and `Heel`/`Toe` for `BracketOneArrow*`.
    Single { portion: FootPortion, action: FootAction },
    /// Both portions of a bracketing foot act.
    Dual { heel: FootAction, toe: FootAction },
}

/// Whether a foot acts on a given step, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootLinkState {
    Idle,
    Step { kind: StepKind, action: ActionSet },
}
impl FootLinkState {
    pub fn is_idle(self) -> bool {
        matches!(self, FootLinkState::Idle)
    }

    pub fn kind(self) -> Option<StepKind> {
        match self {
            FootLinkState::Idle => None,
            FootLinkState::Step { kind, .. } => Some(kind),
        }
    }
}

/// A labelled edge between two [`crate::graph::node::GraphNode`]s: for each
/// foot, either "not acting this step" or a `(StepKind, action)` pair.
/// Structural equality is used as a cache key for the Performer's
/// substitution table (§4.4), so this type deliberately excludes roll bits
/// (link *identity* does not vary with rolls; see [`GraphLinkInstance`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphLink {
    pub left: FootLinkState,
    pub right: FootLinkState,
}
impl GraphLink {
    pub fn for_foot(&self, foot: crate::pad::Foot) -> FootLinkState {
        match foot {
            crate::pad::Foot::Left => self.left,
            crate::pad::Foot::Right => self.right,
        }
    }

    pub fn is_jump(&self) -> bool {
        !self.left.is_idle() && !self.right.is_idle()
    }
}

/// Which acting portions are rolls, shaped like the [`ActionSet`] of the
/// [`FootLinkState`] it decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RollBits {
    #[default]
    None,
    Single(bool),
    Dual {
        heel: bool,
        toe: bool,
    },
}

/// A [`GraphLink`] plus its roll bits: rolls vary with the chart being
/// converted, link identity does not (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphLinkInstance {
    pub link: GraphLink,
    pub left_rolls: RollBits,
    pub right_rolls: RollBits,
}
impl GraphLinkInstance {
    pub fn plain(link: GraphLink) -> GraphLinkInstance {
        GraphLinkInstance {
            link,
            left_rolls: RollBits::None,
            right_rolls: RollBits::None,
        }
    }
}
