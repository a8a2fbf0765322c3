//! # Tickets CLI
//!
//! The binary is thin: the CLI lives in `src/cli/`, and this file only runs
//! it and handles process termination.
//!
//! ## Layering
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/tickets/src/cli/)                      │
//! │  - clap argument parsing (setup.rs)                       │
//! │  - config, logging and API wiring (commands.rs)           │
//! │  - one handler per command (handlers.rs)                  │
//! │  - JSON output (render.rs)                                │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  API Layer (crates/ticketsapp/src/api.rs)                 │
//! │  - Dispatches to command modules                          │
//! │  - Commits after every mutation                           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. Results go to stdout as
//! JSON, logs go to stderr.

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
