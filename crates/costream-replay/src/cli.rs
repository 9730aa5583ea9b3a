use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use costream::runtime::FileStorage;
use costream::{Board, BoardConfig};

use crate::error::{ReplayError, Result};
use crate::inspect::{ResetArgs, ShowArgs, run_reset, run_show};
use crate::logging;
use crate::replay::{ReplayArgs, run_replay};

#[derive(Debug, Parser)]
#[command(
    name = "costream-replay",
    about = "Replay drag and resize gestures against a persisted Costream board",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    /// Raise log verbosity (-v, -vv). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a JSONL gesture script and report the committed layout.
    Replay(ReplayArgs),

    /// Print the layout a board would boot with.
    Show(ShowArgs),

    /// Delete the stored layout.
    Reset(ResetArgs),
}

/// Where a board keeps its layout and how it is configured.
#[derive(Debug, Clone, Args)]
pub struct BoardArgs {
    /// Directory holding the stored layout.
    #[arg(long = "state-dir", default_value = ".costream")]
    pub state_dir: PathBuf,

    /// TOML board configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl BoardArgs {
    pub fn load_config(&self) -> Result<BoardConfig> {
        match &self.config {
            Some(path) => Ok(BoardConfig::from_toml_file(path)?),
            None => Ok(BoardConfig::default()),
        }
    }

    pub fn boot(&self) -> Result<Board> {
        if self.state_dir.is_file() {
            return Err(ReplayError::invalid(format!(
                "--state-dir {} is a file",
                self.state_dir.display()
            )));
        }
        let config = self.load_config()?;
        let storage = FileStorage::new(&self.state_dir);
        Ok(Board::boot(config, Box::new(storage))?)
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose, cli.log_json);
    match cli.command {
        Commands::Replay(args) => run_replay(args),
        Commands::Show(args) => run_show(args),
        Commands::Reset(args) => run_reset(args),
    }
}
