//! Demo binary: a trivial host for `step_lift`, wiring up the collaborators
//! named in §6 (`ChartSource`, `ChartSink`, `PadModelLoader`) with in-memory
//! stand-ins good enough for a manual smoke test. Real parsing, pad-layout
//! loading and batch orchestration over song directories are explicitly out
//! of scope for the library (§1) and for this binary; a host application
//! would replace every collaborator here with a real one while reusing
//! `step_lift::convert` unchanged.

use anyhow::{Context, Result};
use log::{error, info};
use std::time::Instant;
use step_lift::cancel::Never;
use step_lift::chart::{ChartNoteStream, NoteEvent, NoteKind, Time};
use step_lift::collab::{ChartSink, ChartSource, PadModelLoader};
use step_lift::config::{ExpressionConfig, PerformanceConfig};
use step_lift::error::ConvertError;
use step_lift::graph::StepGraph;
use step_lift::pad::{PadDef, PadModel, PerFoot, StartingPosition};

/// Top-level options, same shape as the teacher's `Opts`: a literal
/// `Default` impl rather than a builder, serialized with `ron` if a host
/// wants to persist it (not exercised here, since config-file loading is a
/// collaborator concern per §6).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Opts {
    source_pad: String,
    target_pad: String,
    seed: u64,
    expression: ExpressionConfig,
    performance: PerformanceConfig,
    /// A logspec string (see flexi_logger's `LogSpecification`).
    log: String,
    log_stderr: bool,
}
impl Default for Opts {
    fn default() -> Opts {
        Opts {
            source_pad: "dance-single".to_string(),
            target_pad: "pump-single".to_string(),
            seed: 0,
            expression: ExpressionConfig::default(),
            performance: PerformanceConfig::default(),
            log: "info".to_string(),
            log_stderr: true,
        }
    }
}
impl Opts {
    fn apply_logging(&self) {
        let duplicate = if self.log_stderr {
            flexi_logger::Duplicate::All
        } else {
            flexi_logger::Duplicate::None
        };
        if let Err(err) = flexi_logger::Logger::with_str(&self.log)
            .log_target(flexi_logger::LogTarget::DevNull)
            .duplicate_to_stderr(duplicate)
            .start()
        {
            eprintln!("error initializing logger: {:#}", err);
        }
    }
}

/// An in-memory `ChartSource` that ignores `source_bytes` and always hands
/// back the same small built-in chart, standing in for a real file parser.
struct BuiltinChartSource;
impl ChartSource for BuiltinChartSource {
    type Error = std::convert::Infallible;
    fn parse_chart(&self, _source_bytes: &[u8]) -> Result<ChartNoteStream, Self::Error> {
        let lanes = [0usize, 3, 1, 3, 0, 1, 2, 3];
        Ok(ChartNoteStream::new(
            lanes
                .iter()
                .enumerate()
                .map(|(i, &lane)| NoteEvent {
                    time: Time::seconds(i as f64 * 0.5),
                    lane,
                    kind: NoteKind::Tap,
                })
                .collect(),
        ))
    }
}

/// Prints the emitted note stream instead of writing it to a simfile, a
/// stand-in for the real `emit_chart` collaborator.
struct StdoutChartSink;
impl ChartSink for StdoutChartSink {
    type Error = std::convert::Infallible;
    fn emit_chart(&mut self, notes: &ChartNoteStream) -> Result<(), Self::Error> {
        for ev in &notes.events {
            println!("{:>8} lane {} {:?}", ev.time, ev.lane, ev.kind);
        }
        Ok(())
    }
}

/// Resolves the two built-in pad names this demo knows about. A real host
/// would instead deserialize a layout file per `name` (§6).
struct BuiltinPadModelLoader;
impl PadModelLoader for BuiltinPadModelLoader {
    type Error = anyhow::Error;
    fn load_pad_model(&self, name: &str) -> Result<PadDef> {
        match name {
            "dance-single" => Ok(dance_single()),
            "pump-single" => Ok(pump_single()),
            other => Err(anyhow::anyhow!("unknown built-in pad \"{}\"", other)),
        }
    }
}

fn full(n: usize, v: bool) -> Vec<Vec<bool>> {
    vec![vec![v; n]; n]
}

/// `dance-single`: Left=0, Down=1, Up=2, Right=3.
fn dance_single() -> PadDef {
    let n = 4;
    let mut plain = full(n, false);
    for (a, b) in [(0, 1), (1, 0), (2, 3), (3, 2)] {
        plain[a][b] = true;
    }
    let mut cross_front = full(n, false);
    for (a, b) in [(0, 2), (2, 0)] {
        cross_front[a][b] = true;
    }
    let mut cross_behind = full(n, false);
    for (a, b) in [(1, 3), (3, 1)] {
        cross_behind[a][b] = true;
    }
    let mut bracket = full(n, false);
    for (a, b) in [(0, 1), (1, 0), (2, 3), (3, 2), (0, 2), (2, 0), (1, 3), (3, 1)] {
        bracket[a][b] = true;
    }
    PadDef {
        name: "dance-single".to_string(),
        lane_coords: vec![(0, 1), (1, 0), (1, 2), (2, 1)],
        valid_next_arrows: full(n, true),
        bracketable_other_heel: PerFoot {
            left: bracket.clone(),
            right: bracket.clone(),
        },
        bracketable_other_toe: PerFoot {
            left: bracket.clone(),
            right: bracket,
        },
        other_foot_pairings: PerFoot {
            left: plain.clone(),
            right: plain,
        },
        other_foot_pairings_crossover_front: PerFoot {
            left: cross_front.clone(),
            right: cross_front,
        },
        other_foot_pairings_crossover_behind: PerFoot {
            left: cross_behind.clone(),
            right: cross_behind,
        },
        other_foot_pairings_inverted: PerFoot {
            left: full(n, false),
            right: full(n, false),
        },
        starting_tiers: vec![vec![StartingPosition {
            left_lane: 0,
            right_lane: 3,
        }]],
        y_travel_distance_compensation: 0.5,
    }
}

/// `pump-single`: DownLeft=0, UpLeft=1, Center=2, UpRight=3, DownRight=4.
fn pump_single() -> PadDef {
    let n = 5;
    let mut plain = full(n, false);
    for (a, b) in [(0, 2), (1, 2), (2, 3), (2, 4), (0, 1), (3, 4)] {
        plain[a][b] = true;
        plain[b][a] = true;
    }
    let mut cross_front = full(n, false);
    for (a, b) in [(3, 0), (0, 3)] {
        cross_front[a][b] = true;
    }
    let mut cross_behind = full(n, false);
    for (a, b) in [(4, 1), (1, 4)] {
        cross_behind[a][b] = true;
    }
    let mut bracket = full(n, false);
    for (a, b) in [(0, 2), (2, 0), (2, 3), (3, 2), (0, 1), (1, 0), (3, 4), (4, 3)] {
        bracket[a][b] = true;
    }
    PadDef {
        name: "pump-single".to_string(),
        lane_coords: vec![(0, 0), (0, 2), (1, 1), (2, 2), (2, 0)],
        valid_next_arrows: full(n, true),
        bracketable_other_heel: PerFoot {
            left: bracket.clone(),
            right: bracket.clone(),
        },
        bracketable_other_toe: PerFoot {
            left: bracket.clone(),
            right: bracket,
        },
        other_foot_pairings: PerFoot {
            left: plain.clone(),
            right: plain,
        },
        other_foot_pairings_crossover_front: PerFoot {
            left: cross_front.clone(),
            right: cross_front,
        },
        other_foot_pairings_crossover_behind: PerFoot {
            left: cross_behind.clone(),
            right: cross_behind,
        },
        other_foot_pairings_inverted: PerFoot {
            left: full(n, false),
            right: full(n, false),
        },
        starting_tiers: vec![vec![StartingPosition {
            left_lane: 0,
            right_lane: 4,
        }]],
        y_travel_distance_compensation: 0.6,
    }
}

fn convert_error_stage(err: &ConvertError) -> &'static str {
    match err {
        ConvertError::PadModel(_) => "pad model",
        ConvertError::GraphBuild(_) => "graph build",
        ConvertError::Express(_) => "express",
        ConvertError::Perform(_) => "perform",
        ConvertError::Emit(_) => "emit",
    }
}

fn run(opts: &Opts) -> Result<()> {
    let loader = BuiltinPadModelLoader;
    let source_def = loader
        .load_pad_model(&opts.source_pad)
        .with_context(|| format!("loading source pad \"{}\"", opts.source_pad))?;
    let target_def = loader
        .load_pad_model(&opts.target_pad)
        .with_context(|| format!("loading target pad \"{}\"", opts.target_pad))?;

    let source_pad = PadModel::build(source_def).context("building source pad model")?;
    let target_pad = PadModel::build(target_def).context("building target pad model")?;
    let source_graph = StepGraph::build(&source_pad).context("building source step graph")?;
    let target_graph = StepGraph::build(&target_pad).context("building target step graph")?;

    let chart = BuiltinChartSource
        .parse_chart(&[])
        .expect("the built-in chart source never fails");

    match step_lift::convert_cancellable(
        &chart,
        &source_pad,
        &source_graph,
        &target_pad,
        &target_graph,
        &opts.expression,
        &opts.performance,
        opts.seed,
        &Never,
    ) {
        Ok(converted) => {
            let mut sink = StdoutChartSink;
            sink.emit_chart(&converted)
                .expect("the built-in chart sink never fails");
        }
        Err(err) => {
            let stage = convert_error_stage(&err);
            error!("chart conversion failed at stage \"{}\": {:#}", stage, err);
        }
    }

    Ok(())
}

fn main() {
    let opts = Opts::default();
    opts.apply_logging();
    let start = Instant::now();
    match run(&opts) {
        Ok(()) => {
            info!("finished in {}s", start.elapsed().as_millis() as f64 / 1000.0);
        }
        Err(err) => {
            error!("fatal error: {:#}", err);
        }
    }
}
