//! Step-kind substitution for the Performer (§4.4).
//!
//! Whether a target pad's `GraphLink` can stand in for an expressed source
//! `GraphLink`, under a fallback table that maps each source `StepKind` to
//! the set of target `StepKind`s allowed to replace it (§9's "fallback
//! step-kind replacement", lifted from the source's implicit table into
//! explicit configuration — see `config::default_step_type_replacements`).

use crate::graph::{ActionSet, FootLinkState, GraphLink, GraphLinkInstance, RollBits, StepKind};
use fxhash::{FxHashMap, FxHashSet};

/// Whether `target` satisfies `source`, per foot: both idle, the identical
/// `StepKind` with the identical action shape, or a configured substitution
/// whose expected action shape (after any heel/toe remapping) matches.
pub fn link_satisfies(
    source: GraphLink,
    target: GraphLink,
    replacements: &FxHashMap<StepKind, FxHashSet<StepKind>>,
) -> bool {
    foot_satisfies(source.left, target.left, replacements) && foot_satisfies(source.right, target.right, replacements)
}

fn foot_satisfies(
    source: FootLinkState,
    target: FootLinkState,
    replacements: &FxHashMap<StepKind, FxHashSet<StepKind>>,
) -> bool {
    match (source, target) {
        (FootLinkState::Idle, FootLinkState::Idle) => true,
        (FootLinkState::Idle, FootLinkState::Step { .. }) | (FootLinkState::Step { .. }, FootLinkState::Idle) => false,
        (
            FootLinkState::Step { kind: sk, action: sa },
            FootLinkState::Step { kind: tk, action: ta },
        ) => {
            if sk == tk {
                return sa == ta;
            }
            let allowed = replacements.get(&sk).map(|set| set.contains(&tk)).unwrap_or(false);
            if !allowed {
                return false;
            }
            match expected_target_action(sk, sa, tk) {
                Some(expected) => expected == ta,
                None => false,
            }
        }
    }
}

/// The `ActionSet` a substitution from `source_kind` (acting with
/// `source_action`) to `target_kind` must produce to be a faithful
/// replacement: identity for non-bracket custom substitutions (the action
/// shape doesn't change), heel/toe-swapped for a two-portion bracket mirror,
/// portion-swapped for a bracket-one-arrow mirror.
fn expected_target_action(source_kind: StepKind, source_action: ActionSet, target_kind: StepKind) -> Option<ActionSet> {
    if let (Some((sh, st)), Some((th, tt))) = (source_kind.bracket_parts(), target_kind.bracket_parts()) {
        let ActionSet::Dual { heel, toe } = source_action else {
            return None;
        };
        if (sh, st) == (tt, th) {
            return Some(ActionSet::Dual { heel: toe, toe: heel });
        }
        return Some(ActionSet::Dual { heel, toe });
    }
    if let (Some((_, _)), Some((target_portion, _))) = (
        source_kind.bracket_one_arrow_part(),
        target_kind.bracket_one_arrow_part(),
    ) {
        let ActionSet::Single { action, .. } = source_action else {
            return None;
        };
        return Some(ActionSet::Single {
            portion: target_portion,
            action,
        });
    }
    Some(source_action)
}

/// Roll bits mirror the same heel/toe (or portion) remapping as
/// [`expected_target_action`]; used when building the performed
/// [`GraphLinkInstance`] rather than just validating it.
fn remap_foot_rolls(source_kind: StepKind, target_kind: StepKind, source_rolls: RollBits) -> RollBits {
    if source_kind == target_kind {
        return source_rolls;
    }
    if let (Some((sh, st)), Some((th, tt))) = (source_kind.bracket_parts(), target_kind.bracket_parts()) {
        if (sh, st) == (tt, th) {
            if let RollBits::Dual { heel, toe } = source_rolls {
                return RollBits::Dual { heel: toe, toe: heel };
            }
        }
    }
    source_rolls
}

/// Builds the performed `GraphLinkInstance` for `target`, carrying `source`'s
/// roll bits across, remapped per foot if the substitution mirrored heel/toe.
pub fn remap_instance(source: GraphLinkInstance, target: GraphLink) -> GraphLinkInstance {
    let left_rolls = match (source.link.left.kind(), target.left.kind()) {
        (Some(sk), Some(tk)) => remap_foot_rolls(sk, tk, source.left_rolls),
        _ => RollBits::None,
    };
    let right_rolls = match (source.link.right.kind(), target.right.kind()) {
        (Some(sk), Some(tk)) => remap_foot_rolls(sk, tk, source.right_rolls),
        _ => RollBits::None,
    };
    GraphLinkInstance {
        link: target,
        left_rolls,
        right_rolls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_step_type_replacements;
    use crate::graph::FootAction;
    use crate::pad::FootPortion;

    fn single(kind: StepKind, action: FootAction) -> FootLinkState {
        FootLinkState::Step {
            kind,
            action: ActionSet::Single {
                portion: FootPortion::Default,
                action,
            },
        }
    }

    #[test]
    fn identity_substitution_requires_exact_action_match() {
        let table = default_step_type_replacements();
        let source = GraphLink {
            left: single(StepKind::NewArrow, FootAction::Tap),
            right: FootLinkState::Idle,
        };
        let same = source;
        assert!(link_satisfies(source, same, &table));

        let different_action = GraphLink {
            left: single(StepKind::NewArrow, FootAction::Hold),
            right: FootLinkState::Idle,
        };
        assert!(!link_satisfies(source, different_action, &table));
    }

    #[test]
    fn bracket_mirror_swaps_heel_and_toe_actions() {
        let table = default_step_type_replacements();
        let source = GraphLink {
            left: FootLinkState::Step {
                kind: StepKind::BracketHeelNewToeSame,
                action: ActionSet::Dual {
                    heel: FootAction::Tap,
                    toe: FootAction::Release,
                },
            },
            right: FootLinkState::Idle,
        };
        let mirrored = GraphLink {
            left: FootLinkState::Step {
                kind: StepKind::BracketHeelSameToeNew,
                action: ActionSet::Dual {
                    heel: FootAction::Release,
                    toe: FootAction::Tap,
                },
            },
            right: FootLinkState::Idle,
        };
        assert!(link_satisfies(source, mirrored, &table));

        let unmirrored = GraphLink {
            left: FootLinkState::Step {
                kind: StepKind::BracketHeelSameToeNew,
                action: ActionSet::Dual {
                    heel: FootAction::Tap,
                    toe: FootAction::Release,
                },
            },
            right: FootLinkState::Idle,
        };
        assert!(!link_satisfies(source, unmirrored, &table));
    }

    #[test]
    fn unrelated_kinds_are_never_satisfied() {
        let table = default_step_type_replacements();
        let source = GraphLink {
            left: single(StepKind::NewArrow, FootAction::Tap),
            right: FootLinkState::Idle,
        };
        let target = GraphLink {
            left: single(StepKind::CrossoverFront, FootAction::Tap),
            right: FootLinkState::Idle,
        };
        assert!(!link_satisfies(source, target, &table));
    }

    #[test]
    fn idle_feet_must_match_on_both_sides() {
        let table = default_step_type_replacements();
        let source = GraphLink {
            left: single(StepKind::NewArrow, FootAction::Tap),
            right: FootLinkState::Idle,
        };
        let both_act = GraphLink {
            left: single(StepKind::NewArrow, FootAction::Tap),
            right: single(StepKind::NewArrow, FootAction::Tap),
        };
        assert!(!link_satisfies(source, both_act, &table));
    }
}
