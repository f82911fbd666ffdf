use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use web_time::{Duration, Instant};

use crate::cli::output::{EndJson, GestureReport, MoveJson};
use crate::gesture::{GestureClassifier, GestureSession};
use crate::model::gesture::TouchSample;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse trace: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("event {index}: `{kind}` outside a gesture (expected `start`)")]
    NoOpenGesture { index: usize, kind: &'static str },
    #[error("event {index}: `start` while the gesture from event {open} is still open")]
    NestedStart { index: usize, open: usize },
    #[error("trace ends inside the gesture started at event {open}")]
    Unterminated { open: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceEventKind {
    Start,
    Move,
    End,
}

impl TraceEventKind {
    fn as_str(&self) -> &'static str {
        match self {
            TraceEventKind::Start => "start",
            TraceEventKind::Move => "move",
            TraceEventKind::End => "end",
        }
    }
}

/// One recorded touch event. `t_ms` is relative to the start of the trace.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceEvent {
    pub kind: TraceEventKind,
    pub x: f32,
    pub y: f32,
    pub t_ms: u64,
    #[serde(default = "one")]
    pub contacts: usize,
    #[serde(default)]
    pub blocked: bool,
}

fn one() -> usize {
    1
}

pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>, TraceError> {
    let text = fs::read_to_string(path).map_err(|e| TraceError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_str(&text)?)
}

struct Open {
    index: usize,
    session: GestureSession,
    report: GestureReport,
}

/// Replay a trace. A trace may hold several gestures, each a `start`
/// followed by any number of `move`s and one `end`.
pub fn classify_trace(
    classifier: &GestureClassifier,
    events: &[TraceEvent],
) -> Result<Vec<GestureReport>, TraceError> {
    let base = Instant::now();
    let at = |ms: u64| base + Duration::from_millis(ms);

    let mut reports = Vec::new();
    let mut open: Option<Open> = None;

    for (index, event) in events.iter().enumerate() {
        let sample = TouchSample::new(event.x, event.y, at(event.t_ms));
        match event.kind {
            TraceEventKind::Start => {
                if let Some(o) = &open {
                    return Err(TraceError::NestedStart {
                        index,
                        open: o.index,
                    });
                }
                let session = classifier.start(sample, event.contacts, event.blocked);
                open = Some(Open {
                    index,
                    report: GestureReport {
                        start_ms: event.t_ms,
                        initial_phase: session.phase(),
                        moves: Vec::new(),
                        end: None,
                    },
                    session,
                });
            }
            TraceEventKind::Move => {
                let Some(o) = open.as_mut() else {
                    return Err(TraceError::NoOpenGesture {
                        index,
                        kind: event.kind.as_str(),
                    });
                };
                let action = classifier.update(&mut o.session, sample, event.contacts);
                o.report.moves.push(MoveJson {
                    t_ms: event.t_ms,
                    phase: o.session.phase(),
                    action,
                });
            }
            TraceEventKind::End => {
                let Some(mut o) = open.take() else {
                    return Err(TraceError::NoOpenGesture {
                        index,
                        kind: event.kind.as_str(),
                    });
                };
                let final_delta_x = event.x - o.session.start_sample().x;
                let action = classifier.end(o.session, final_delta_x, sample.t);
                o.report.end = Some(EndJson {
                    t_ms: event.t_ms,
                    action,
                });
                reports.push(o.report);
            }
        }
    }

    match open {
        Some(o) => Err(TraceError::Unterminated { open: o.index }),
        None => Ok(reports),
    }
}
