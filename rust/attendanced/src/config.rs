use crate::validate;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Attendance sidecar. Reads one JSON request per line on stdin and writes
/// one JSON response per line on stdout. Logs go to stderr.
#[derive(Clone, Debug, Parser)]
#[command(name = "attendanced", version)]
pub struct Config {
    /// Workspace directory holding attendance.sqlite3. Without it records
    /// live in memory only.
    #[arg(long, env = "ATTENDANCED_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Days of demo history to generate at startup when no workspace is
    /// given. 0 starts with an empty store.
    #[arg(
        long,
        env = "ATTENDANCED_SEED_DAYS",
        default_value_t = crate::seed::DEFAULT_SEED_DAYS,
        value_parser = clap::value_parser!(u32).range(0..=crate::seed::MAX_SEED_DAYS as i64)
    )]
    pub seed_days: u32,

    /// Pin "today" (YYYY-MM-DD) instead of reading the system clock.
    #[arg(long, env = "ATTENDANCED_TODAY", value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Present-day percentage below which a student is flagged.
    #[arg(
        long,
        env = "ATTENDANCED_LOW_ATTENDANCE_THRESHOLD",
        default_value_t = crate::stats::DEFAULT_LOW_ATTENDANCE_THRESHOLD,
        value_parser = clap::value_parser!(u32).range(0..=100)
    )]
    pub low_attendance_threshold: u32,

    /// Tracing filter, e.g. `info` or `attendanced=debug`. RUST_LOG wins when set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn parse_today(raw: &str) -> Result<NaiveDate, String> {
    validate::parse_date(raw).map_err(|e| e.to_string())
}
