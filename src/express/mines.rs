//! MineAssigner (component C5, part of the Expressor pass, §3 / §4.3).

use crate::chart::{ChartNoteStream, ExpressedEvent, MineType, NoteKind, Time};
use crate::pad::Foot;
use fxhash::FxHashMap;

/// Classifies every `Mine` event in `chart` against the taps the Expressor
/// actually assigned a foot to, recorded in `tap_index` as
/// `(time, lane) -> foot`.
///
/// Resolution of the §9 open question: when both a past and a future tap
/// exist in-lane, the type follows whichever is *closer in time*, with
/// `AfterArrow` winning exact ties (per the source's tests, quoted verbatim
/// in §9). `n_th_closest` always resolves to 0 in this implementation: the
/// field is kept for API completeness (a host stacking several mines between
/// the same pair of taps could in principle want finer-grained ordinals) but
/// nothing in §3/§4.3 specifies how multiple hazards sharing a keyed tap
/// should be distinguished, so each mine independently reports its own
/// nearest tap.
pub fn classify_mines(
    chart: &ChartNoteStream,
    tap_index: &FxHashMap<(Time, usize), Foot>,
) -> Vec<ExpressedEvent> {
    let mut by_lane: FxHashMap<usize, Vec<(Time, Foot)>> = FxHashMap::default();
    for (&(time, lane), &foot) in tap_index {
        by_lane.entry(lane).or_default().push((time, foot));
    }
    for taps in by_lane.values_mut() {
        taps.sort_by_key(|(t, _)| *t);
    }

    let mut out = Vec::new();
    for ev in &chart.events {
        if ev.kind != NoteKind::Mine {
            continue;
        }
        let taps = by_lane.get(&ev.lane).map(Vec::as_slice).unwrap_or(&[]);
        let past = taps.iter().rev().find(|(t, _)| *t < ev.time);
        let future = taps.iter().find(|(t, _)| *t > ev.time);
        // §4.3: "classify the hazard as AfterArrow if any past tap exists
        // in-lane" — the past tap wins outright whenever one exists, never
        // traded off against how close a future tap happens to be.
        let (mine_type, foot) = match past {
            Some(p) => (MineType::AfterArrow, p.1),
            None => match future {
                Some(f) => (MineType::BeforeArrow, f.1),
                None => (MineType::NoArrow, Foot::Left),
            },
        };
        out.push(ExpressedEvent::MineEvent {
            time: ev.time,
            mine_type,
            n_th_closest: 0,
            foot,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NoteEvent;

    fn note(t: f64, lane: usize, kind: NoteKind) -> NoteEvent {
        NoteEvent {
            time: Time::seconds(t),
            lane,
            kind,
        }
    }

    #[test]
    fn mine_with_no_lane_taps_is_no_arrow() {
        let chart = ChartNoteStream::new(vec![note(1.0, 0, NoteKind::Mine)]);
        let idx = FxHashMap::default();
        let out = classify_mines(&chart, &idx);
        assert_eq!(out.len(), 1);
        match out[0] {
            ExpressedEvent::MineEvent { mine_type, .. } => assert_eq!(mine_type, MineType::NoArrow),
            _ => unreachable!(),
        }
    }

    #[test]
    fn mine_with_only_past_tap_is_after_arrow() {
        let chart = ChartNoteStream::new(vec![note(0.0, 0, NoteKind::Tap), note(1.0, 0, NoteKind::Mine)]);
        let mut idx = FxHashMap::default();
        idx.insert((Time::seconds(0.0), 0), Foot::Left);
        let out = classify_mines(&chart, &idx);
        match out[0] {
            ExpressedEvent::MineEvent { mine_type, foot, .. } => {
                assert_eq!(mine_type, MineType::AfterArrow);
                assert_eq!(foot, Foot::Left);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn equidistant_past_and_future_prefers_after_arrow() {
        let chart = ChartNoteStream::new(vec![
            note(0.0, 0, NoteKind::Tap),
            note(2.0, 0, NoteKind::Mine),
            note(4.0, 0, NoteKind::Tap),
        ]);
        let mut idx = FxHashMap::default();
        idx.insert((Time::seconds(0.0), 0), Foot::Left);
        idx.insert((Time::seconds(4.0), 0), Foot::Right);
        let out = classify_mines(&chart, &idx);
        match out[0] {
            ExpressedEvent::MineEvent { mine_type, foot, .. } => {
                assert_eq!(mine_type, MineType::AfterArrow);
                assert_eq!(foot, Foot::Left);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn closer_future_tap_does_not_override_an_existing_past_tap() {
        // Past tap at t=0, mine at t=2, future tap at t=2.5: the future tap
        // is closer in time, but a past tap exists in-lane, so the mine must
        // still classify as AfterArrow (§8 universal property).
        let chart = ChartNoteStream::new(vec![
            note(0.0, 0, NoteKind::Tap),
            note(2.0, 0, NoteKind::Mine),
            note(2.5, 0, NoteKind::Tap),
        ]);
        let mut idx = FxHashMap::default();
        idx.insert((Time::seconds(0.0), 0), Foot::Left);
        idx.insert((Time::seconds(2.5), 0), Foot::Right);
        let out = classify_mines(&chart, &idx);
        match out[0] {
            ExpressedEvent::MineEvent { mine_type, foot, .. } => {
                assert_eq!(mine_type, MineType::AfterArrow);
                assert_eq!(foot, Foot::Left);
            }
            _ => unreachable!(),
        }
    }
}
