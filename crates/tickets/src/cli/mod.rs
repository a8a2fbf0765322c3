//! # CLI Behavior
//!
//! This is **one possible UI client** for the ticket store. It is the only
//! place that knows about terminal I/O and exit codes.
//!
//! ## Output
//!
//! Every command prints one JSON document to stdout. Removals that find
//! nothing print their outcome with the error list instead of failing, so
//! scripts can tell "gone already" from a real error.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: config loading, logging, API construction and dispatch
//! - `handlers`: per-command calls into the API
//! - `render`: JSON output

mod commands;
mod handlers;
mod render;
pub mod setup;

pub use commands::run;
