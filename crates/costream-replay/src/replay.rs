//! Drive a board through a parsed script.
//!
//! The replayer plays the host: it owns the global pointer listener that the
//! resize controller asks for, so pointer moves and releases only reach the
//! board while a listener is attached. At the end of a run every gesture is
//! shut down, and the number of listeners still attached at that point is
//! reported.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use costream::layout::DragNoopReason;
use costream::{
    Board, DragEffect, ListenerCommand, PanelRecord, Point, PointerEventKind, ResizeDispatch,
    ResizeEffect, ResizeSessionId,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cli::BoardArgs;
use crate::error::{ReplayError, Result};
use crate::script::{ScriptLine, Step, load_script};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// JSONL gesture script.
    #[arg(long)]
    pub script: PathBuf,

    #[command(flatten)]
    pub board: BoardArgs,

    /// Also write the summary as JSON.
    #[arg(long = "output-json")]
    pub output_json: Option<PathBuf>,

    /// Stop at the first rejected step.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Applied,
    /// Delivered but dropped by a controller, or never delivered.
    Ignored,
    /// The board returned an error.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub line: usize,
    pub op: &'static str,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub load_source: &'static str,
    pub steps: usize,
    pub applied: usize,
    pub ignored: usize,
    pub rejected: usize,
    pub commits: u64,
    pub save_failures: u64,
    /// Listeners still attached when the script ran out.
    pub listeners_outstanding: usize,
    pub panels: Vec<PanelRecord>,
    pub outcomes: Vec<StepOutcome>,
}

impl ReplaySummary {
    fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Host-side driver for one board.
#[derive(Debug)]
pub struct Replayer {
    board: Board,
    listener: Option<ResizeSessionId>,
    outcomes: Vec<StepOutcome>,
    strict: bool,
}

impl Replayer {
    #[must_use]
    pub fn new(board: Board, strict: bool) -> Self {
        Self {
            board,
            listener: None,
            outcomes: Vec::new(),
            strict,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Session whose global listener is currently attached.
    #[must_use]
    pub const fn attached_listener(&self) -> Option<ResizeSessionId> {
        self.listener
    }

    #[must_use]
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }

    /// Apply every step in order.
    pub fn run(&mut self, script: &[ScriptLine]) -> Result<()> {
        for line in script {
            self.apply(line)?;
        }
        Ok(())
    }

    /// Apply one step. Fails only in strict mode, on a rejected step.
    pub fn apply(&mut self, line: &ScriptLine) -> Result<StepStatus> {
        let (status, detail) = self.dispatch(&line.step);
        match status {
            StepStatus::Rejected => {
                warn!(line = line.line, op = line.step.op(), detail = detail.as_deref(), "step rejected");
            }
            _ => {
                debug!(line = line.line, op = line.step.op(), ?status, detail = detail.as_deref(), "step");
            }
        }
        if status == StepStatus::Rejected && self.strict {
            return Err(ReplayError::StepRejected {
                step: line.line,
                message: detail.unwrap_or_default(),
            });
        }
        self.outcomes.push(StepOutcome {
            line: line.line,
            op: line.step.op(),
            status,
            detail,
        });
        Ok(status)
    }

    fn dispatch(&mut self, step: &Step) -> (StepStatus, Option<String>) {
        match step {
            Step::Drag { panel, .. } => {
                let Some(event) = step.drag_event() else {
                    return (StepStatus::Rejected, None);
                };
                match self.board.drag(panel, event) {
                    Ok(transition) => match transition.effect {
                        DragEffect::Noop { reason } => (
                            StepStatus::Ignored,
                            Some(
                                match reason {
                                    DragNoopReason::IdleWithoutActiveDrag => "no active drag",
                                    DragNoopReason::DragAlreadyInProgress => "drag already active",
                                }
                                .to_string(),
                            ),
                        ),
                        DragEffect::Committed { position, .. } => (
                            StepStatus::Applied,
                            Some(format!("committed at ({}, {})", position.x, position.y)),
                        ),
                        _ => (StepStatus::Applied, None),
                    },
                    Err(error) => (StepStatus::Rejected, Some(error.to_string())),
                }
            }
            Step::Pointer {
                panel,
                kind,
                pointer_id,
                x,
                y,
            } => self.pointer(panel.as_ref(), *kind, *pointer_id, Point::new(*x, *y)),
            Step::Window { .. } => {
                let Some(metrics) = step.window_metrics() else {
                    return (StepStatus::Rejected, None);
                };
                match self.board.set_window_metrics(metrics) {
                    Ok(true) => (StepStatus::Applied, Some("default layout re-seeded".into())),
                    Ok(false) => (StepStatus::Applied, None),
                    Err(error) => (StepStatus::Rejected, Some(error.to_string())),
                }
            }
            Step::AddPanel => match self.board.add_panel() {
                Ok(id) => (StepStatus::Applied, Some(format!("added panel {id}"))),
                Err(error) => (StepStatus::Rejected, Some(error.to_string())),
            },
            Step::Detach { panel } => {
                let dispatch = self.board.detach_panel(panel);
                self.host_listener(dispatch.as_ref());
                (StepStatus::Applied, None)
            }
            Step::Shutdown => {
                let dispatch = self.board.shutdown();
                self.host_listener(dispatch.as_ref());
                (StepStatus::Applied, None)
            }
        }
    }

    fn pointer(
        &mut self,
        panel: Option<&costream::PanelId>,
        kind: PointerEventKind,
        pointer_id: u32,
        position: Point,
    ) -> (StepStatus, Option<String>) {
        let dispatch = match kind {
            PointerEventKind::Down => {
                let Some(panel) = panel else {
                    return (
                        StepStatus::Rejected,
                        Some("pointer down needs a panel".into()),
                    );
                };
                match self.board.resize_pointer_down(panel, pointer_id, position) {
                    Ok(dispatch) => dispatch,
                    Err(error) => return (StepStatus::Rejected, Some(error.to_string())),
                }
            }
            PointerEventKind::Move | PointerEventKind::Up => {
                let Some(session) = self.listener else {
                    return (StepStatus::Ignored, Some("no listener attached".into()));
                };
                if kind == PointerEventKind::Move {
                    self.board.resize_pointer_move(session, pointer_id, position)
                } else {
                    self.board.resize_pointer_up(session, pointer_id, position)
                }
            }
        };
        self.host_listener(Some(&dispatch));
        describe(&dispatch)
    }

    fn host_listener(&mut self, dispatch: Option<&ResizeDispatch>) {
        match dispatch.and_then(|d| d.listener) {
            Some(ListenerCommand::Attach { session, .. }) => self.listener = Some(session),
            Some(ListenerCommand::Detach { session, .. }) if self.listener == Some(session) => {
                self.listener = None;
            }
            _ => {}
        }
    }

    /// Shut down remaining gestures and summarize the run.
    #[must_use]
    pub fn finish(mut self) -> ReplaySummary {
        let listeners_outstanding = usize::from(self.listener.is_some());
        let dispatch = self.board.shutdown();
        self.host_listener(dispatch.as_ref());

        let mut summary = ReplaySummary {
            load_source: self.board.load_source().as_str(),
            steps: self.outcomes.len(),
            applied: 0,
            ignored: 0,
            rejected: 0,
            commits: self.board.commits(),
            save_failures: self.board.persistence_stats().save_failures,
            listeners_outstanding,
            panels: self.board.panels().map(PanelRecord::from_panel).collect(),
            outcomes: self.outcomes,
        };
        summary.applied = summary.count(StepStatus::Applied);
        summary.ignored = summary.count(StepStatus::Ignored);
        summary.rejected = summary.count(StepStatus::Rejected);
        summary
    }
}

fn describe(dispatch: &ResizeDispatch) -> (StepStatus, Option<String>) {
    match dispatch.effect {
        ResizeEffect::Ignored { reason } => (StepStatus::Ignored, Some(format!("{reason:?}"))),
        ResizeEffect::Committed { size } => (
            StepStatus::Applied,
            Some(format!("resized to {}x{}", size.width, size.height)),
        ),
        ResizeEffect::TornDown { reason } => {
            (StepStatus::Applied, Some(format!("torn down: {reason:?}")))
        }
        ResizeEffect::Started { .. } | ResizeEffect::Preview { .. } => (StepStatus::Applied, None),
    }
}

/// Human-readable summary.
#[must_use]
pub fn render_summary(summary: &ReplaySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "booted from: {}", summary.load_source);
    let _ = writeln!(
        out,
        "steps: {} (applied {}, ignored {}, rejected {})",
        summary.steps, summary.applied, summary.ignored, summary.rejected
    );
    let _ = writeln!(
        out,
        "commits: {} (save failures {})",
        summary.commits, summary.save_failures
    );
    if summary.listeners_outstanding > 0 {
        let _ = writeln!(
            out,
            "listeners released at exit: {}",
            summary.listeners_outstanding
        );
    }
    for outcome in summary
        .outcomes
        .iter()
        .filter(|o| o.status == StepStatus::Rejected)
    {
        let _ = writeln!(
            out,
            "  line {}: {} rejected: {}",
            outcome.line,
            outcome.op,
            outcome.detail.as_deref().unwrap_or("")
        );
    }
    out.push_str(&crate::inspect::render_panels(&summary.panels));
    out
}

pub fn run_replay(args: ReplayArgs) -> Result<()> {
    if let Some(path) = &args.output_json
        && path.is_dir()
    {
        return Err(ReplayError::invalid(format!(
            "--output-json {} is a directory",
            path.display()
        )));
    }
    let script = load_script(&args.script)?;
    let board = args.board.boot()?;
    info!(
        script = %args.script.display(),
        steps = script.len(),
        state_dir = %args.board.state_dir.display(),
        "replay started"
    );

    let mut replayer = Replayer::new(board, args.strict);
    replayer.run(&script)?;
    let summary = replayer.finish();

    print!("{}", render_summary(&summary));
    if let Some(path) = &args.output_json {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&summary)? + "\n")?;
    }
    Ok(())
}
