//! Chat-room scripts for the Parley mediator.
//!
//! The `parley` binary parses a small line-based script (see [`script`]),
//! runs it against a [`ChatRoom`](parley_core::ChatRoom) with [`Runner`], and
//! prints one transcript line per delivery.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod runner;
pub mod script;

pub use runner::{CommandsFailed, Runner, ScriptOutcome, run_script};
pub use script::{Command, DEMO_SCRIPT, ScriptError, parse};
