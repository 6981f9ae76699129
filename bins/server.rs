use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

use common::utils::logging::{init_logging, LogFormat};

fn main() -> std::process::ExitCode {
    // load .env before reading RUST_LOG / CONFIG_PATH
    dotenv().ok();

    let cfg = configs::AppConfig::load_or_env();
    let format = cfg
        .as_ref()
        .ok()
        .and_then(|c| c.logging.format.parse::<LogFormat>().ok())
        .unwrap_or_default();
    init_logging(format);

    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "invalid configuration");
            return std::process::ExitCode::FAILURE;
        }
    };

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "server",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "message store starting"
    );

    rt.block_on(async move {
        let shutdown = async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(service = "server", event = "signal_error", error = %e, "cannot listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            info!(service = "server", event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
        };

        match server::run(cfg, shutdown).await {
            Ok(()) => {
                info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
