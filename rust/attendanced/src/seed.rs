use crate::model::{AttendanceRecord, AttendanceStatus};
use crate::roster::Roster;
use chrono::{Duration, NaiveDate};
use sha2::{Digest, Sha256};

pub const DEFAULT_SEED_DAYS: u32 = 7;
/// Upper bound for `--seed-days`.
pub const MAX_SEED_DAYS: u32 = 3660;
pub const LEAVE_REMARK: &str = "Sick Leave";

/// Status for one student-day, stable across runs. Roughly 90% present,
/// 5% absent, 5% leave.
pub fn seeded_status(date: NaiveDate, student_id: &str) -> AttendanceStatus {
    let digest = Sha256::digest(format!("{}|{}", date.format("%Y-%m-%d"), student_id).as_bytes());
    match digest[0] {
        0..=229 => AttendanceStatus::Present,
        230..=242 => AttendanceStatus::Absent,
        _ => AttendanceStatus::Leave,
    }
}

/// Demo history for every roster student over the `days` days ending
/// `today`, newest day first.
pub fn demo_history(roster: &Roster, today: NaiveDate, days: u32) -> Vec<AttendanceRecord> {
    let mut out = Vec::with_capacity(days as usize * roster.total_students());
    for offset in 0..i64::from(days) {
        let date = today - Duration::days(offset);
        for s in roster.all_students() {
            let status = seeded_status(date, &s.id);
            let remarks = (status == AttendanceStatus::Leave).then(|| LEAVE_REMARK.to_string());
            out.push(AttendanceRecord::new(date, s.id.clone(), status, remarks));
        }
    }
    out
}
