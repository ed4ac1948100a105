//! Library side of the code harvester CLI.
//!
//! The binary is thin: argument parsing and printing live in `main.rs`,
//! everything that can be tested without a terminal lives here.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
