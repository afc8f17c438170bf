//! scytale-bridge
//!
//! HTTP/JSON front door for device commands routed over WRP.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──POST /api/v1/{deviceID}/send/{service}──▶ ┌──────────────────────────┐
//!                                                      │ request id · trace ·     │
//!                                                      │ timeout                  │
//!                                                      ├──────────────────────────┤
//!                                                      │ metrics (sampled)        │
//!                                                      │ admission (token bucket) │
//!                                                      ├──────────────────────────┤
//!                                                      │ translator               │──WRP/msgpack──▶ Scytale
//!   Client ◀───────────────── JSON payload ─────────── │  JSON ⇄ WRP envelope     │◀──────────────
//!                                                      └──────────────────────────┘
//!
//!   GET /health  → TCP probe of the backend
//!   GET /metrics → Prometheus exposition
//! ```

use clap::Parser;

use scytale_bridge::config::Cli;
use scytale_bridge::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    startup::run(cli).await?;
    Ok(())
}
