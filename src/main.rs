//! Funds Ledger - HTTP service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Config  │───▶│   Gateway    │───▶│   Services   │───▶│ Ledger Store │
//! │  (YAML)  │    │ (axum HTTP)  │    │(account/xfer)│    │ (PG / memory)│
//! └──────────┘    └──────────────┘    └──────┬───────┘    └──────────────┘
//!                                            │
//!                                      ┌─────▼──────────┐
//!                                      │ Cache (memory/ │
//!                                      │     redis)     │
//!                                      └────────────────┘
//! ```
//!
//! Usage: `funds_ledger [--env dev] [--port 8080]`

use funds_ledger::config::AppConfig;
use funds_ledger::{bootstrap, gateway};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = funds_ledger::logging::init_logging(&app_config);

    tracing::info!(
        "Starting Funds Ledger in {} mode (build {})",
        env,
        env!("GIT_HASH")
    );

    let state = bootstrap::build_state(&app_config).await?;
    let port = get_port_override().unwrap_or(app_config.server.port);

    gateway::run_server(&app_config.server.host, port, state).await
}
