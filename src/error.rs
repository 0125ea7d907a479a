//! Error types for every fallible public operation.
//!
//! Each stage gets its own `thiserror` enum (mirrors `bms-rs`'s error surface
//! more closely than the teacher's blanket `anyhow::Error`, since this crate
//! is consumed as a library rather than run as a standalone tool). `anyhow`
//! is still used at the CLI edge in `main.rs`, the way the teacher uses it.

use thiserror::Error;

/// Failures building a [`crate::pad::PadModel`] from a [`crate::pad::PadDef`].
#[derive(Debug, Error)]
pub enum PadModelError {
    #[error("capability table \"{table}\" has {rows} rows, expected {expected}")]
    DimensionMismatch {
        table: &'static str,
        rows: usize,
        expected: usize,
    },
    #[error("starting tier {tier} references an unknown lane pair ({left}, {right})")]
    UnknownStartingLane {
        tier: usize,
        left: usize,
        right: usize,
    },
    #[error("pad defines no starting tiers")]
    NoStartingTiers,
}

/// Failures building a [`crate::graph::StepGraph`].
#[derive(Debug, Error)]
pub enum GraphBuildError {
    #[error("pad data is inconsistent: {0}")]
    PadDataInconsistent(String),
}

/// Failures lifting a note stream to an [`crate::express::ExpressedChart`].
#[derive(Debug, Error)]
pub enum ExpressError {
    #[error("times are non-monotonic: event at index {index} has time {time:?} which does not follow the previous event")]
    NonMonotonicTime { index: usize, time: String },
    #[error("hold/roll end at lane {lane}, time {time:?} has no matching start")]
    UnmatchedHoldEnd { lane: i32, time: String },
    #[error("cannot express group {group_index} at time {time:?}: {reason}")]
    CannotExpress {
        group_index: usize,
        time: String,
        reason: String,
    },
}

/// Failures performing an [`crate::express::ExpressedChart`] onto a target pad.
#[derive(Debug, Error)]
pub enum PerformError {
    #[error("no path through the target step graph covers the expressed chart")]
    NoPathFound,
    #[error("performance configuration is invalid: {0}")]
    ConfigInvalid(String),
    #[error("performance was cancelled")]
    Cancelled,
}

/// Failures reassembling a [`crate::perform::PerformedChart`] into lane events.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("hold/release imbalance at lane {lane}: {reason}")]
    HoldImbalance { lane: i32, reason: String },
}

/// The composed one-shot [`crate::convert::convert`] error.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    PadModel(#[from] PadModelError),
    #[error(transparent)]
    GraphBuild(#[from] GraphBuildError),
    #[error(transparent)]
    Express(#[from] ExpressError),
    #[error(transparent)]
    Perform(#[from] PerformError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}
