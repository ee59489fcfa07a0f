use crate::clock::Clock;
use crate::db;
use crate::error::{AttendanceError, Result};
use crate::model::{
    AttendanceRecord, AttendanceSheet, AttendanceStatus, LowAttendanceAlert, SheetRow,
    StatusDistribution, StatusTally, Student, SystemStats, User, WeeklyDatapoint,
};
use crate::roster::Roster;
use crate::stats;
use crate::store::AttendanceStore;
use crate::validate;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Roster, record store, clock and optional workspace database, constructed
/// once at startup and handed to the request loop.
pub struct AttendanceService {
    roster: Roster,
    store: AttendanceStore,
    clock: Box<dyn Clock>,
    db: Option<Connection>,
    workspace: Option<PathBuf>,
    low_attendance_threshold: u32,
}

impl AttendanceService {
    pub fn new(roster: Roster, store: AttendanceStore, clock: Box<dyn Clock>) -> Self {
        AttendanceService {
            roster,
            store,
            clock,
            db: None,
            workspace: None,
            low_attendance_threshold: stats::DEFAULT_LOW_ATTENDANCE_THRESHOLD,
        }
    }

    pub fn with_low_attendance_threshold(mut self, pct: u32) -> Self {
        self.low_attendance_threshold = pct;
        self
    }

    /// Switches to write-through persistence; the in-memory records are
    /// replaced with what the connection holds. Rows for students outside
    /// the roster are left in the file but not loaded.
    fn use_db(&mut self, conn: Connection) -> Result<()> {
        let (known, unknown): (Vec<_>, Vec<_>) = db::load_records(&conn)?
            .into_iter()
            .partition(|r| self.roster.contains_student(&r.student_id));
        if !unknown.is_empty() {
            tracing::warn!(
                skipped = unknown.len(),
                "persisted attendance for unknown students not loaded"
            );
        }
        self.store = AttendanceStore::from_records(known);
        self.db = Some(conn);
        Ok(())
    }

    pub fn attach_workspace(&mut self, path: &Path) -> anyhow::Result<usize> {
        self.use_db(db::open_db(path)?)?;
        self.workspace = Some(path.to_path_buf());
        tracing::info!(
            workspace = %path.display(),
            records = self.store.len(),
            "workspace attached"
        );
        Ok(self.store.len())
    }

    pub fn workspace(&self) -> Option<&Path> {
        self.workspace.as_deref()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn low_attendance_threshold(&self) -> u32 {
        self.low_attendance_threshold
    }

    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    pub fn login(&self, username: &str) -> Result<User> {
        self.roster.login(username)
    }

    pub fn all_students(&self) -> Vec<Student> {
        self.roster.all_students().to_vec()
    }

    pub fn students_by_teacher(&self, teacher_id: &str) -> Result<Vec<Student>> {
        self.roster.students_by_teacher(teacher_id)
    }

    pub fn get_attendance<S: AsRef<str>>(
        &self,
        date: NaiveDate,
        student_ids: &[S],
    ) -> Vec<AttendanceRecord> {
        self.store.get(date, student_ids)
    }

    /// Validates the whole batch, persists it when a workspace is attached,
    /// then applies it to the store. A failure at any step leaves the store
    /// as it was.
    pub fn save_attendance(&mut self, records: Vec<AttendanceRecord>) -> Result<usize> {
        for r in &records {
            validate::require_non_empty("studentId", &r.student_id)?;
            if !self.roster.contains_student(&r.student_id) {
                return Err(AttendanceError::not_found("student", r.student_id.clone()));
            }
        }
        if let Some(conn) = self.db.as_ref() {
            if let Err(e) = db::save_records(conn, &records) {
                tracing::error!(error = %e, batch = records.len(), "attendance batch not persisted");
                return Err(e);
            }
        }
        Ok(self.store.save(records))
    }

    pub fn student_history(&self, student_id: &str) -> Result<Vec<AttendanceRecord>> {
        if !self.roster.contains_student(student_id) {
            return Err(AttendanceError::not_found("student", student_id));
        }
        Ok(self.store.history(student_id))
    }

    pub fn system_stats(&self) -> SystemStats {
        stats::system_stats(
            &self.roster,
            &self.store,
            self.today(),
            self.low_attendance_threshold,
        )
    }

    pub fn weekly_data(&self) -> Vec<WeeklyDatapoint> {
        stats::weekly_data(&self.store, self.today())
    }

    pub fn status_distribution(&self) -> StatusDistribution {
        stats::status_distribution(&self.store, self.today())
    }

    pub fn low_attendance_alerts(&self) -> Vec<LowAttendanceAlert> {
        stats::low_attendance_alerts(
            &self.roster,
            &self.store,
            self.today(),
            self.low_attendance_threshold,
        )
    }

    /// Rows for marking `date`. Students without a record default to present.
    pub fn open_sheet(&self, date: NaiveDate, teacher_id: Option<&str>) -> Result<AttendanceSheet> {
        let students = match teacher_id {
            Some(t) => self.roster.students_by_teacher(t)?,
            None => self.all_students(),
        };
        let mut tally = StatusTally::default();
        let rows: Vec<SheetRow> = students
            .into_iter()
            .map(|s| {
                let existing = self.store.record(date, &s.id);
                let status = existing.map(|r| r.status).unwrap_or(AttendanceStatus::Present);
                tally.add(status);
                SheetRow {
                    remarks: existing
                        .and_then(|r| r.remarks.clone())
                        .unwrap_or_default(),
                    recorded: existing.is_some(),
                    status,
                    student_id: s.id,
                    roll_no: s.roll_no,
                    name: s.name,
                }
            })
            .collect();
        Ok(AttendanceSheet { date, rows, tally })
    }
}
