use std::fmt::Write as _;

use clap::Args;
use costream::{Board, PanelRecord};
use serde::Serialize;

use crate::cli::BoardArgs;
use crate::error::Result;

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub board: BoardArgs,
}

/// What `show` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardReport {
    pub load_source: &'static str,
    pub window: [i32; 2],
    pub panels: Vec<PanelRecord>,
}

impl BoardReport {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let window = board.window();
        Self {
            load_source: board.load_source().as_str(),
            window: [window.width, window.height],
            panels: board.panels().map(PanelRecord::from_panel).collect(),
        }
    }
}

/// Fixed-width panel table.
#[must_use]
pub fn render_panels(panels: &[PanelRecord]) -> String {
    let mut out = String::from("id        x      y  width height\n");
    for panel in panels {
        let _ = writeln!(
            out,
            "{:<6}{:>5}{:>7}{:>7}{:>7}",
            panel.id.as_str(),
            panel.x,
            panel.y,
            panel.width,
            panel.height
        );
    }
    out
}

pub fn run_show(args: ShowArgs) -> Result<()> {
    let board = args.board.boot()?;
    let report = BoardReport::from_board(&board);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "layout: {} ({}x{})",
            report.load_source, report.window[0], report.window[1]
        );
        print!("{}", render_panels(&report.panels));
    }
    Ok(())
}

pub fn run_reset(args: ResetArgs) -> Result<()> {
    let mut board = args.board.boot()?;
    board.reset_layout()?;
    println!(
        "stored layout cleared; {} default panels",
        board.store().len()
    );
    Ok(())
}
