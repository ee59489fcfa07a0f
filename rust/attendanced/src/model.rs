use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Leave,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Leave => "Leave",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendance status: {0:?}")]
pub struct ParseStatusError(pub String);

/// Accepts the full names in any case, plus the single-letter sheet codes
/// `P`, `A` and `L`.
impl FromStr for AttendanceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" | "p" => Ok(AttendanceStatus::Present),
            "absent" | "a" => Ok(AttendanceStatus::Absent),
            "leave" | "l" => Ok(AttendanceStatus::Leave),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub email: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub roll_no: String,
    pub class: String,
    pub section: String,
    /// Relation only; the roster owns both sides.
    pub teacher_id: String,
}

/// One student's status on one day. Keyed by `(date, student_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl AttendanceRecord {
    pub fn new(
        date: NaiveDate,
        student_id: impl Into<String>,
        status: AttendanceStatus,
        remarks: Option<String>,
    ) -> Self {
        let student_id = student_id.into();
        AttendanceRecord {
            id: record_id(date, &student_id),
            student_id,
            date,
            status,
            remarks,
        }
    }
}

pub fn record_id(date: NaiveDate, student_id: &str) -> String {
    format!("{}_{}", date.format("%Y-%m-%d"), student_id)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub present: usize,
    pub absent: usize,
    pub leave: usize,
}

impl StatusTally {
    pub fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Leave => self.leave += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.present + self.absent + self.leave
    }
}

impl<'a> FromIterator<&'a AttendanceRecord> for StatusTally {
    fn from_iter<I: IntoIterator<Item = &'a AttendanceRecord>>(iter: I) -> Self {
        let mut tally = StatusTally::default();
        for r in iter {
            tally.add(r.status);
        }
        tally
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub tally: StatusTally,
}

/// One bar group of the weekly chart; `label` is `MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyDatapoint {
    pub label: String,
    pub date: NaiveDate,
    pub present: usize,
    pub absent: usize,
    pub leave: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_students: usize,
    pub total_teachers: usize,
    pub today_percentage: u32,
    pub low_attendance_alerts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub present: usize,
    pub absent: usize,
    pub leave: usize,
    pub total: usize,
    pub present_pct: u32,
    pub absent_pct: u32,
    pub leave_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowAttendanceAlert {
    pub student_id: String,
    pub name: String,
    pub present_days: usize,
    pub recorded_days: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRow {
    pub student_id: String,
    pub roll_no: String,
    pub name: String,
    pub status: AttendanceStatus,
    pub remarks: String,
    /// False when the row shows the default rather than a stored record.
    pub recorded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSheet {
    pub date: NaiveDate,
    pub rows: Vec<SheetRow>,
    pub tally: StatusTally,
}
