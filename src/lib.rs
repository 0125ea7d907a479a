//! Two-stage step-graph chart lifter (§1-§2).
//!
//! Converts an authored dance-pad chart for one pad layout into a chart for a
//! different layout while preserving authorial intent. The conversion is a
//! pure, single-threaded function of `(chart, source pad, target pad, config,
//! seed)` (§5): build each pad's [`graph::StepGraph`] once, lift the input
//! note stream to a body-motion stream with [`express::express`] (component
//! C3), replay that motion stream onto the target pad with
//! [`perform::perform`] (component C4), and reassemble the result into a lane
//! event stream with [`emit::emit`] (component C6).
//!
//! File-format parsing, pad-layout loading, batch orchestration, HTML
//! visualization and logging setup are collaborators outside this crate (§1,
//! §6); see [`collab`] for the narrow traits a host implements.

pub mod cancel;
pub mod chart;
pub mod collab;
pub mod config;
pub mod emit;
pub mod error;
pub mod express;
pub mod graph;
pub mod pad;
pub mod perform;

#[cfg(test)]
pub mod test_support;

use cancel::{CancellationToken, Never};
use chart::ChartNoteStream;
use config::{ExpressionConfig, PerformanceConfig};
use error::ConvertError;
use graph::StepGraph;
use pad::PadModel;

/// The composed one-shot conversion (§6): `express` the input chart against
/// the source graph, `perform` the result onto the target graph, then `emit`
/// lane events. Each stage's errors are wrapped into [`ConvertError`] via
/// `#[from]`.
pub fn convert(
    chart: &ChartNoteStream,
    source_pad: &PadModel,
    source_graph: &StepGraph,
    target_pad: &PadModel,
    target_graph: &StepGraph,
    expression_config: &ExpressionConfig,
    performance_config: &PerformanceConfig,
    seed: u64,
) -> Result<ChartNoteStream, ConvertError> {
    convert_cancellable(
        chart,
        source_pad,
        source_graph,
        target_pad,
        target_graph,
        expression_config,
        performance_config,
        seed,
        &Never,
    )
}

/// As [`convert`], but checking `cancel` at least once per expressed-event
/// iteration (§5), so a caller running many conversions concurrently can
/// abandon one in bounded time.
#[allow(clippy::too_many_arguments)]
pub fn convert_cancellable(
    chart: &ChartNoteStream,
    source_pad: &PadModel,
    source_graph: &StepGraph,
    target_pad: &PadModel,
    target_graph: &StepGraph,
    expression_config: &ExpressionConfig,
    performance_config: &PerformanceConfig,
    seed: u64,
    cancel: &dyn CancellationToken,
) -> Result<ChartNoteStream, ConvertError> {
    log::info!(
        "converting chart ({} events) from \"{}\" to \"{}\"",
        chart.events.len(),
        source_pad.name(),
        target_pad.name()
    );

    let expressed = express::express(chart, source_graph, expression_config, cancel)?;
    log::debug!("expressed {} step(s)", expressed.steps().count());

    let performed = perform::perform(
        &expressed,
        target_pad,
        target_graph,
        performance_config,
        seed,
        cancel,
    )?;
    log::debug!("performed onto \"{}\"", target_pad.name());

    let events = emit::emit(&performed, target_graph)?;
    log::info!("emitted {} event(s)", events.len());

    Ok(ChartNoteStream::new(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{NoteEvent, NoteKind, Time};
    use crate::test_support::{dance_single, pump_single};

    fn tap(t: f64, lane: usize) -> NoteEvent {
        NoteEvent {
            time: Time::seconds(t),
            lane,
            kind: NoteKind::Tap,
        }
    }

    #[test]
    fn convert_is_deterministic_given_the_same_seed() {
        let source_pad = PadModel::build(dance_single()).unwrap();
        let source_graph = StepGraph::build(&source_pad).unwrap();
        let target_pad = PadModel::build(pump_single()).unwrap();
        let target_graph = StepGraph::build(&target_pad).unwrap();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 3), tap(2.0, 1), tap(3.0, 2)]);

        let a = convert(
            &chart,
            &source_pad,
            &source_graph,
            &target_pad,
            &target_graph,
            &ExpressionConfig::default(),
            &PerformanceConfig::default(),
            11,
        )
        .unwrap();
        let b = convert(
            &chart,
            &source_pad,
            &source_graph,
            &target_pad,
            &target_graph,
            &ExpressionConfig::default(),
            &PerformanceConfig::default(),
            11,
        )
        .unwrap();
        assert_eq!(a.events.len(), b.events.len());
        for (ea, eb) in a.events.iter().zip(&b.events) {
            assert_eq!(ea.time, eb.time);
            assert_eq!(ea.lane, eb.lane);
            assert_eq!(ea.kind, eb.kind);
        }
    }

    #[test]
    fn convert_output_is_time_monotonic() {
        let pad = PadModel::build(dance_single()).unwrap();
        let graph = StepGraph::build(&pad).unwrap();
        let chart = ChartNoteStream::new(vec![tap(0.0, 0), tap(1.0, 1), tap(2.0, 0), tap(3.0, 3)]);

        let out = convert(
            &chart,
            &pad,
            &graph,
            &pad,
            &graph,
            &ExpressionConfig::default(),
            &PerformanceConfig::default(),
            0,
        )
        .unwrap();
        let mut times: Vec<_> = out.events.iter().map(|e| e.time).collect();
        let sorted = {
            let mut t = times.clone();
            t.sort();
            t
        };
        assert_eq!(times, sorted);
        times.dedup();
    }

    #[test]
    fn pad_model_and_step_graph_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PadModel>();
        assert_send_sync::<StepGraph>();
    }
}
