#![forbid(unsafe_code)]

//! Scripted gesture replay for Costream boards.
//!
//! `costream-replay` boots a [`Board`](costream::Board) on a state directory,
//! feeds it a JSONL script of drag and resize-handle events, and reports what
//! was committed. Running the same script twice against the same directory
//! shows the reload path: the second run boots from the stored layout.

pub mod cli;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod replay;
pub mod script;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{ReplayError, Result};
