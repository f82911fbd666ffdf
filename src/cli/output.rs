use serde::Serialize;

use crate::model::gesture::{EndAction, GesturePhase, MoveAction};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// Classification of one gesture in a replayed trace.
#[derive(Debug, Serialize)]
pub struct GestureReport {
    pub start_ms: u64,
    /// `disabled` when the start was multi-touch or on a blocked target.
    pub initial_phase: GesturePhase,
    pub moves: Vec<MoveJson>,
    pub end: Option<EndJson>,
}

#[derive(Debug, Serialize)]
pub struct MoveJson {
    pub t_ms: u64,
    pub phase: GesturePhase,
    #[serde(flatten)]
    pub action: MoveAction,
}

#[derive(Debug, Serialize)]
pub struct EndJson {
    pub t_ms: u64,
    #[serde(flatten)]
    pub action: EndAction,
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn phase_label(phase: GesturePhase) -> &'static str {
    match phase {
        GesturePhase::Undetermined => "undetermined",
        GesturePhase::Scrolling => "scrolling",
        GesturePhase::Swiping => "swiping",
        GesturePhase::Disabled => "disabled",
    }
}

pub fn format_move_action(action: &MoveAction) -> String {
    match action {
        MoveAction::None => "none".to_string(),
        MoveAction::Scroll => "scroll".to_string(),
        MoveAction::Swipe {
            delta_x,
            progress,
            suppress_scroll,
        } => {
            let mut s = format!("swipe dx={delta_x:.1} progress={progress:.2}");
            if *suppress_scroll {
                s.push_str(" suppress-scroll");
            }
            s
        }
    }
}

pub fn format_end_action(action: &EndAction) -> String {
    match action {
        EndAction::None => "none".to_string(),
        EndAction::Cancel { velocity }
        | EndAction::SwipeLeft { velocity }
        | EndAction::SwipeRight { velocity } => {
            format!("{} velocity={velocity:.3}px/ms", action.as_str())
        }
    }
}

fn event_line(t_ms: u64, label: &str, detail: &str) -> String {
    format!("{t_ms:>8}ms {label:<12} {detail}")
}

pub fn format_reports(reports: &[GestureReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, report) in reports.iter().enumerate() {
        if report.initial_phase == GesturePhase::Disabled {
            lines.push(format!("gesture {} (start {}ms, disabled)", i + 1, report.start_ms));
        } else {
            lines.push(format!("gesture {} (start {}ms)", i + 1, report.start_ms));
        }
        for m in &report.moves {
            lines.push(event_line(
                m.t_ms,
                phase_label(m.phase),
                &format_move_action(&m.action),
            ));
        }
        if let Some(end) = &report.end {
            lines.push(event_line(end.t_ms, "end", &format_end_action(&end.action)));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn sample_reports() -> Vec<GestureReport> {
        vec![
            GestureReport {
                start_ms: 0,
                initial_phase: GesturePhase::Undetermined,
                moves: vec![
                    MoveJson {
                        t_ms: 20,
                        phase: GesturePhase::Swiping,
                        action: MoveAction::Swipe {
                            delta_x: -30.0,
                            progress: 0.3,
                            suppress_scroll: true,
                        },
                    },
                    MoveJson {
                        t_ms: 80,
                        phase: GesturePhase::Swiping,
                        action: MoveAction::Swipe {
                            delta_x: -120.0,
                            progress: 1.2,
                            suppress_scroll: true,
                        },
                    },
                ],
                end: Some(EndJson {
                    t_ms: 100,
                    action: EndAction::SwipeLeft { velocity: 1.4 },
                }),
            },
            GestureReport {
                start_ms: 200,
                initial_phase: GesturePhase::Undetermined,
                moves: vec![MoveJson {
                    t_ms: 210,
                    phase: GesturePhase::Scrolling,
                    action: MoveAction::Scroll,
                }],
                end: Some(EndJson {
                    t_ms: 260,
                    action: EndAction::None,
                }),
            },
            GestureReport {
                start_ms: 300,
                initial_phase: GesturePhase::Disabled,
                moves: Vec::new(),
                end: Some(EndJson {
                    t_ms: 320,
                    action: EndAction::None,
                }),
            },
        ]
    }

    #[test]
    fn text_report() {
        assert_snapshot!(format_reports(&sample_reports()).join("\n"), @r"
gesture 1 (start 0ms)
      20ms swiping      swipe dx=-30.0 progress=0.30 suppress-scroll
      80ms swiping      swipe dx=-120.0 progress=1.20 suppress-scroll
     100ms end          swipe-left velocity=1.400px/ms
gesture 2 (start 200ms)
     210ms scrolling    scroll
     260ms end          none
gesture 3 (start 300ms, disabled)
     320ms end          none
");
    }

    #[test]
    fn json_flattens_actions() {
        let end = EndJson {
            t_ms: 100,
            action: EndAction::SwipeLeft { velocity: 1.5 },
        };
        assert_eq!(
            serde_json::to_value(&end).unwrap(),
            serde_json::json!({"t_ms": 100, "action": "swipe-left", "velocity": 1.5})
        );
        let reports = sample_reports();
        let value = serde_json::to_value(&reports[1].moves[0]).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"t_ms": 210, "phase": "scrolling", "action": "scroll"})
        );
    }

    #[test]
    fn cancel_shows_velocity() {
        assert_eq!(
            format_end_action(&EndAction::Cancel { velocity: 0.25 }),
            "cancel velocity=0.250px/ms"
        );
        assert_eq!(
            format_move_action(&MoveAction::Swipe {
                delta_x: 5.0,
                progress: 0.05,
                suppress_scroll: false,
            }),
            "swipe dx=5.0 progress=0.05"
        );
    }
}
