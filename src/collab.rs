//! Narrow traits naming the external collaborators of §6.
//!
//! None of these ship an implementation: file-format parsing, pad-layout
//! loading, batch orchestration, HTML rendering and asset copying are
//! explicitly out of scope (§1). They exist here purely as documentation-grade
//! seams a host application implements, the way `src/node.rs`'s `Node` trait
//! names a seam the rest of the teacher's node graph plugs into.

use crate::chart::ChartNoteStream;
use crate::pad::PadDef;

/// Parses a chart file into a time-sorted note stream plus song metadata.
/// Concrete metadata (tempo map, time-signature map) is host-specific and
/// deliberately not modeled here.
pub trait ChartSource {
    type Error;
    fn parse_chart(&self, source_bytes: &[u8]) -> Result<ChartNoteStream, Self::Error>;
}

/// Serializes a note stream back to whatever persistent form the host uses.
pub trait ChartSink {
    type Error;
    fn emit_chart(&mut self, notes: &ChartNoteStream) -> Result<(), Self::Error>;
}

/// Resolves a pad layout name to its raw definition.
pub trait PadModelLoader {
    type Error;
    fn load_pad_model(&self, name: &str) -> Result<PadDef, Self::Error>;
}
