//! Console front end for the scorecard access core.
//!
//! Plays the part of the UI layer: it holds one authorization context,
//! renders the profile badge and the gated business actions, and drives the
//! login prompt from typed commands.

pub mod config;
pub mod console;

pub use config::{ConsoleConfig, StorageConfig};
pub use console::{Command, Console, Flow};
