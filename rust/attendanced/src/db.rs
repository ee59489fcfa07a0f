use crate::error::Result;
use crate::model::{AttendanceRecord, AttendanceStatus};
use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE: &str = "attendance.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let conn = Connection::open(workspace.join(DB_FILE))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance_records(
            date TEXT NOT NULL,
            student_id TEXT NOT NULL,
            status TEXT NOT NULL,
            remarks TEXT,
            seq INTEGER NOT NULL,
            updated_at TEXT,
            PRIMARY KEY(date, student_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_records_student ON attendance_records(student_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_records_seq ON attendance_records(seq)",
        [],
    )?;
    Ok(())
}

fn conversion_err(col: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(e))
}

/// All records in write order, so replaying them into a store reproduces
/// the in-memory insertion order.
pub fn load_records(conn: &Connection) -> Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT date, student_id, status, remarks
         FROM attendance_records
         ORDER BY seq",
    )?;
    let rows = stmt
        .query_map([], |r| {
            let date_raw: String = r.get(0)?;
            let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
                .map_err(|e| conversion_err(0, e))?;
            let student_id: String = r.get(1)?;
            let status_raw: String = r.get(2)?;
            let status = status_raw
                .parse::<AttendanceStatus>()
                .map_err(|e| conversion_err(2, e))?;
            let remarks: Option<String> = r.get(3)?;
            Ok(AttendanceRecord::new(date, student_id, status, remarks))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Upserts the batch in one transaction. Either every record is written or
/// none is.
pub fn save_records(conn: &Connection, records: &[AttendanceRecord]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let mut seq: i64 = tx.query_row(
        "SELECT COALESCE(MAX(seq), 0) FROM attendance_records",
        [],
        |r| r.get(0),
    )?;
    let now = Utc::now().to_rfc3339();
    {
        let mut stmt = tx.prepare(
            "INSERT INTO attendance_records(date, student_id, status, remarks, seq, updated_at)
             VALUES(?, ?, ?, ?, ?, ?)
             ON CONFLICT(date, student_id) DO UPDATE SET
               status = excluded.status,
               remarks = excluded.remarks,
               seq = excluded.seq,
               updated_at = excluded.updated_at",
        )?;
        for r in records {
            seq += 1;
            stmt.execute((
                r.date.format("%Y-%m-%d").to_string(),
                &r.student_id,
                r.status.as_str(),
                &r.remarks,
                seq,
                &now,
            ))?;
        }
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttendanceError;
    use crate::model::AttendanceStatus::{Absent, Leave, Present};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record_count(conn: &Connection) -> usize {
        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM attendance_records", [], |r| r.get(0))
            .unwrap();
        n as usize
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        init_schema(&conn).expect("schema");
        conn
    }

    #[test]
    fn saved_records_load_in_write_order() {
        let conn = memory_db();
        save_records(
            &conn,
            &[
                AttendanceRecord::new(d("2024-01-10"), "s1", Present, None),
                AttendanceRecord::new(d("2024-01-10"), "s2", Leave, Some("Sick Leave".into())),
            ],
        )
        .expect("save");
        save_records(
            &conn,
            &[AttendanceRecord::new(d("2024-01-10"), "s1", Absent, None)],
        )
        .expect("save again");

        let loaded = load_records(&conn).expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].student_id, "s2");
        assert_eq!(loaded[0].remarks.as_deref(), Some("Sick Leave"));
        assert_eq!(loaded[1].student_id, "s1");
        assert_eq!(loaded[1].status, Absent);
        assert_eq!(record_count(&conn), 2);
    }

    #[test]
    fn failed_batch_writes_nothing() {
        let conn = memory_db();
        conn.execute(
            "CREATE TRIGGER reject_s9 BEFORE INSERT ON attendance_records
             WHEN NEW.student_id = 's9'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
            [],
        )
        .expect("trigger");

        let err = save_records(
            &conn,
            &[
                AttendanceRecord::new(d("2024-01-10"), "s1", Present, None),
                AttendanceRecord::new(d("2024-01-10"), "s9", Present, None),
            ],
        )
        .unwrap_err();
        assert_eq!(err.code(), "db_update_failed");
        assert_eq!(record_count(&conn), 0);
    }

    #[test]
    fn corrupt_status_is_reported_not_skipped() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO attendance_records(date, student_id, status, seq) VALUES('2024-01-10', 's1', 'Tardy', 1)",
            [],
        )
        .expect("insert");
        assert!(matches!(
            load_records(&conn),
            Err(AttendanceError::Persistence(_))
        ));
    }

    #[test]
    fn schema_init_is_repeatable() {
        let conn = memory_db();
        save_records(
            &conn,
            &[AttendanceRecord::new(d("2024-01-10"), "s1", Present, None)],
        )
        .expect("save");
        init_schema(&conn).expect("second init");
        assert_eq!(record_count(&conn), 1);
    }
}
