//! labsync-service
//!
//! Sends the weekly lab-result sync reports on a cron schedule.
//!
//! `labsync-service --once` runs a single batch for today and exits.

mod settings;
mod wiring;

use std::process::ExitCode;

use labsync::Scheduler;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env is fine
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,labsync=debug")),
        )
        .init();

    let once = std::env::args().skip(1).any(|a| a == "--once");

    let settings = match Settings::load().and_then(|s| s.validate().map(|()| s)) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "invalid settings");
            return ExitCode::FAILURE;
        }
    };

    let labsync = match wiring::build(&settings) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(error = %e, "failed to assemble pipeline");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        channel = labsync.channel_name(),
        concurrency = labsync.config().max_concurrent_tenants,
        "labsync ready"
    );

    if once {
        return match labsync.run_batch().await {
            Ok(report) => {
                tracing::info!(
                    delivered = report.delivered(),
                    failed = report.failed(),
                    "single run complete"
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(stage = %e.stage(), error = %e, "single run failed");
                ExitCode::FAILURE
            }
        };
    }

    let scheduler = match Scheduler::parse(&settings.schedule, labsync.config().timezone) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "invalid schedule");
            return ExitCode::FAILURE;
        }
    };
    let fired = scheduler.run_until(&labsync, shutdown_signal()).await;
    tracing::info!(fired, "labsync stopped");
    ExitCode::SUCCESS
}
