//! Process entry shared by the service binaries: logging, panic hook,
//! runtime construction and exit code.

use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use service::records::EntityProfile;
use tracing::{error, info};
use uuid::Uuid;

fn init_logging(service: &str) {
    // load .env first so RUST_LOG / LOG_FORMAT apply
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service, event = "logger_init", "tracing subscriber initialized");
}

pub fn launch(profile: EntityProfile) -> ExitCode {
    let service = profile.plural;
    init_logging(service);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service,
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let cfg = match AppConfig::load_and_validate(&profile.defaults) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service, event = "config_invalid", error = %e, "refusing to start");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(
                service,
                event = "runtime_build_failed",
                error = %e,
                "failed to build tokio runtime"
            );
            return ExitCode::FAILURE;
        }
    };

    info!(
        service,
        event = "start",
        %service_id,
        pid,
        version,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "service starting"
    );

    match rt.block_on(crate::serve(cfg, profile)) {
        Ok(()) => {
            info!(service, event = "stop", %service_id, pid, "service stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service, event = "run_failed", error = %e, "service failed to start or serve");
            ExitCode::FAILURE
        }
    }
}
