//! Input/output chart data model (§3): note events, the expressed
//! body-motion lift, and the performed lane-level realization.

use crate::error::ExpressError;
use crate::graph::{GraphLinkInstance, NodeId};
use crate::pad::Foot;
use ordered_float::OrderedFloat;
use std::fmt;

/// A monotonic ordering key for a note event. Modeled as elapsed seconds
/// rather than the source's row/beat-plus-seconds pair, since nothing in this
/// core needs a tempo map (that belongs to the `parse_chart` collaborator of
/// §6); any caller with a beat-based format converts to seconds before
/// calling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Time(pub OrderedFloat<f64>);
impl Time {
    pub fn seconds(s: f64) -> Time {
        Time(OrderedFloat(s))
    }

    pub fn as_f64(self) -> f64 {
        self.0 .0
    }
}
impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.3}s", self.as_f64())
    }
}

/// The kind of an authored note event (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    Tap,
    HoldStart,
    HoldEnd,
    RollStart,
    RollEnd,
    Mine,
    Fake,
    Lift,
}
impl NoteKind {
    pub fn is_tap_like(self) -> bool {
        matches!(self, NoteKind::Tap | NoteKind::HoldStart | NoteKind::RollStart)
    }

    pub fn is_long_note_start(self) -> bool {
        matches!(self, NoteKind::HoldStart | NoteKind::RollStart)
    }

    pub fn is_long_note_end(self) -> bool {
        matches!(self, NoteKind::HoldEnd | NoteKind::RollEnd)
    }
}

/// `(time, lane, kind)`: one authored note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    pub time: Time,
    pub lane: usize,
    pub kind: NoteKind,
}

/// A time-sorted authored note stream, as produced by the `parse_chart`
/// collaborator of §6.
#[derive(Debug, Clone, Default)]
pub struct ChartNoteStream {
    pub events: Vec<NoteEvent>,
}
impl ChartNoteStream {
    pub fn new(events: Vec<NoteEvent>) -> ChartNoteStream {
        ChartNoteStream { events }
    }

    /// Checks §7's input-shape invariants: non-decreasing time, and every
    /// `HoldEnd`/`RollEnd` preceded by a matching same-lane start.
    pub fn validate(&self) -> Result<(), ExpressError> {
        let mut last_time: Option<Time> = None;
        let mut open: std::collections::HashMap<usize, NoteKind> = std::collections::HashMap::new();
        for (index, ev) in self.events.iter().enumerate() {
            if let Some(prev) = last_time {
                if ev.time < prev {
                    return Err(ExpressError::NonMonotonicTime {
                        index,
                        time: ev.time.to_string(),
                    });
                }
            }
            last_time = Some(ev.time);
            match ev.kind {
                NoteKind::HoldStart => {
                    open.insert(ev.lane, NoteKind::HoldStart);
                }
                NoteKind::RollStart => {
                    open.insert(ev.lane, NoteKind::RollStart);
                }
                NoteKind::HoldEnd => {
                    if open.remove(&ev.lane) != Some(NoteKind::HoldStart) {
                        return Err(ExpressError::UnmatchedHoldEnd {
                            lane: ev.lane as i32,
                            time: ev.time.to_string(),
                        });
                    }
                }
                NoteKind::RollEnd => {
                    if open.remove(&ev.lane) != Some(NoteKind::RollStart) {
                        return Err(ExpressError::UnmatchedHoldEnd {
                            lane: ev.lane as i32,
                            time: ev.time.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Groups events by exactly-equal timestamp, in time order.
    pub fn groups(&self) -> Vec<&[NoteEvent]> {
        let mut groups = Vec::new();
        let mut start = 0;
        while start < self.events.len() {
            let mut end = start + 1;
            while end < self.events.len() && self.events[end].time == self.events[start].time {
                end += 1;
            }
            groups.push(&self.events[start..end]);
            start = end;
        }
        groups
    }
}

/// Whether a hazard is keyed to an upcoming note, a past note, or neither, in
/// its own lane (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MineType {
    BeforeArrow,
    AfterArrow,
    NoArrow,
}

/// Either a step (a `GraphLinkInstance` taken on the source graph) or a mine
/// classification, both stamped with the original event time (§3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpressedEvent {
    StepEvent(Time, GraphLinkInstance),
    MineEvent {
        time: Time,
        mine_type: MineType,
        n_th_closest: usize,
        foot: Foot,
    },
}
impl ExpressedEvent {
    pub fn time(&self) -> Time {
        match self {
            ExpressedEvent::StepEvent(t, _) => *t,
            ExpressedEvent::MineEvent { time, .. } => *time,
        }
    }
}

/// The body-motion-level lift of an input chart (output of the Expressor).
#[derive(Debug, Clone, Default)]
pub struct ExpressedChart {
    pub events: Vec<ExpressedEvent>,
}
impl ExpressedChart {
    pub fn steps(&self) -> impl Iterator<Item = (Time, &GraphLinkInstance)> {
        self.events.iter().filter_map(|e| match e {
            ExpressedEvent::StepEvent(t, link) => Some((*t, link)),
            _ => None,
        })
    }
}

/// One performed event: either a re-targeted step or a mine classification
/// carried through unchanged (the Emitter resolves its output lane from the
/// performed foot-position track; see `emit.rs`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerformedEvent {
    StepEvent(Time, GraphLinkInstance),
    MineEvent {
        time: Time,
        mine_type: MineType,
        n_th_closest: usize,
        foot: Foot,
    },
}

/// The lane-level realization of an `ExpressedChart` on a target pad (output
/// of the Performer, input to the Emitter).
///
/// `node_after_step` runs parallel to the `StepEvent`s in `events` (in the
/// same order, skipping `MineEvent`s): it is the target `StepGraph` node each
/// step landed in, which the Emitter needs to read off each acting foot's
/// resulting lane, and which it also uses to key a carried-through mine to
/// the lane its tagged foot was last on.
#[derive(Debug, Clone, Default)]
pub struct PerformedChart {
    pub events: Vec<PerformedEvent>,
    pub node_after_step: Vec<NodeId>,
}
