//! Litchi Mission Generator - Backend
//!
//! REST API that turns scripted waypoint missions into Litchi-compatible
//! mission CSV files.
//!
//! Licensed under the GNU Affero General Public License v3.0. See the LICENSE file for details.

use litchi_mission_lib::server::{self, ServerConfig};

// ============================================================================
// WEB SERVER MODE
// ============================================================================

async fn run_web() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    log::info!(
        "Configuration: addr={}, max_body_bytes={}",
        config.addr(),
        config.max_body_bytes
    );

    if let Err(e) = server::start_server(config).await {
        log::error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

fn main() {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    runtime.block_on(run_web());
}
