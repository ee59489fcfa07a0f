use crate::model::{
    AttendanceStatus, LowAttendanceAlert, StatusDistribution, StatusTally, SystemStats,
    WeeklyDatapoint,
};
use crate::roster::Roster;
use crate::store::AttendanceStore;
use chrono::{Duration, NaiveDate};

pub const WEEK_DAYS: i64 = 7;
pub const DEFAULT_LOW_ATTENDANCE_THRESHOLD: u32 = 75;

/// `round(100 * part / whole)`, 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((100.0 * part as f64) / whole as f64).round() as u32
}

/// The seven days ending `today` inclusive, oldest first.
pub fn week_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..WEEK_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

pub fn system_stats(
    roster: &Roster,
    store: &AttendanceStore,
    today: NaiveDate,
    low_threshold: u32,
) -> SystemStats {
    let total_students = roster.total_students();
    let present_today = store.daily_stats(today).tally.present;
    SystemStats {
        total_students,
        total_teachers: roster.total_teachers(),
        today_percentage: percentage(present_today, total_students),
        low_attendance_alerts: low_attendance_alerts(roster, store, today, low_threshold).len(),
    }
}

pub fn weekly_data(store: &AttendanceStore, today: NaiveDate) -> Vec<WeeklyDatapoint> {
    week_window(today)
        .into_iter()
        .map(|date| {
            let t = store.daily_stats(date).tally;
            WeeklyDatapoint {
                label: date.format("%m-%d").to_string(),
                date,
                present: t.present,
                absent: t.absent,
                leave: t.leave,
            }
        })
        .collect()
}

pub fn status_distribution(store: &AttendanceStore, today: NaiveDate) -> StatusDistribution {
    let mut tally = StatusTally::default();
    for date in week_window(today) {
        for r in store.on_date(date) {
            tally.add(r.status);
        }
    }
    let total = tally.total();
    StatusDistribution {
        present: tally.present,
        absent: tally.absent,
        leave: tally.leave,
        total,
        present_pct: percentage(tally.present, total),
        absent_pct: percentage(tally.absent, total),
        leave_pct: percentage(tally.leave, total),
    }
}

/// Students whose present ratio over their recorded days in the week window
/// is strictly below `threshold` percent. Lowest first; roster order breaks ties.
pub fn low_attendance_alerts(
    roster: &Roster,
    store: &AttendanceStore,
    today: NaiveDate,
    threshold: u32,
) -> Vec<LowAttendanceAlert> {
    let window = week_window(today);
    let mut alerts: Vec<LowAttendanceAlert> = roster
        .all_students()
        .iter()
        .filter_map(|s| {
            let mut recorded_days = 0;
            let mut present_days = 0;
            for date in &window {
                if let Some(r) = store.record(*date, &s.id) {
                    recorded_days += 1;
                    if r.status == AttendanceStatus::Present {
                        present_days += 1;
                    }
                }
            }
            if recorded_days == 0 || present_days * 100 >= threshold as usize * recorded_days {
                return None;
            }
            Some(LowAttendanceAlert {
                student_id: s.id.clone(),
                name: s.name.clone(),
                present_days,
                recorded_days,
                percentage: percentage(present_days, recorded_days),
            })
        })
        .collect();
    alerts.sort_by_key(|a| a.percentage);
    alerts
}
