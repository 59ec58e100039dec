// ABOUTME: Library root for keelson - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod runner;
pub mod tag;
pub mod types;
pub mod watch;

mod process;
