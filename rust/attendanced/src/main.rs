mod clock;
mod config;
mod db;
mod error;
mod ipc;
mod model;
mod policy;
mod roster;
mod seed;
mod service;
mod stats;
mod store;
mod validate;

use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_filter: &str) {
    // stdout carries the protocol, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn build_service(cfg: &config::Config) -> anyhow::Result<service::AttendanceService> {
    let clock: Box<dyn clock::Clock> = match cfg.today {
        Some(d) => Box::new(clock::FixedClock(d)),
        None => Box::new(clock::SystemClock),
    };
    let roster = roster::Roster::demo();
    let seeded = if cfg.workspace.is_none() && cfg.seed_days > 0 {
        seed::demo_history(&roster, clock.today(), cfg.seed_days)
    } else {
        Vec::new()
    };
    let store = store::AttendanceStore::from_records(seeded);
    let mut svc = service::AttendanceService::new(roster, store, clock)
        .with_low_attendance_threshold(cfg.low_attendance_threshold);
    if let Some(ws) = cfg.workspace.as_deref() {
        svc.attach_workspace(ws)?;
    }
    Ok(svc)
}

fn main() -> anyhow::Result<()> {
    let cfg = config::Config::parse();
    init_tracing(&cfg.log_level);

    let svc = build_service(&cfg)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        today = %svc.today(),
        records = svc.record_count(),
        "attendanced ready"
    );
    let mut state = ipc::AppState::new(svc);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                tracing::warn!(error = %e, "unparsable request line");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    tracing::info!("stdin closed, shutting down");
    Ok(())
}
