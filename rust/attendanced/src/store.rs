use crate::model::{AttendanceRecord, DailyStats, StatusTally};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Authoritative set of attendance records, indexed by date.
///
/// Within a date records keep insertion order. An upsert removes the
/// existing record for the same student and appends the new one, so a
/// replaced record moves to the end of its day.
#[derive(Debug, Clone, Default)]
pub struct AttendanceStore {
    by_date: BTreeMap<NaiveDate, Vec<AttendanceRecord>>,
    len: usize,
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AttendanceRecord>,
    {
        let mut store = Self::new();
        store.save(records);
        store
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn upsert(&mut self, record: AttendanceRecord) {
        let day = self.by_date.entry(record.date).or_default();
        if let Some(pos) = day.iter().position(|r| r.student_id == record.student_id) {
            day.remove(pos);
            self.len -= 1;
        }
        day.push(record);
        self.len += 1;
    }

    /// Applies each upsert in input order; later records with the same key win.
    pub fn save<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = AttendanceRecord>,
    {
        let mut n = 0;
        for r in records {
            self.upsert(r);
            n += 1;
        }
        n
    }

    pub fn get<S: AsRef<str>>(&self, date: NaiveDate, student_ids: &[S]) -> Vec<AttendanceRecord> {
        let wanted: HashSet<&str> = student_ids.iter().map(|s| s.as_ref()).collect();
        self.on_date(date)
            .iter()
            .filter(|r| wanted.contains(r.student_id.as_str()))
            .cloned()
            .collect()
    }

    pub fn record(&self, date: NaiveDate, student_id: &str) -> Option<&AttendanceRecord> {
        self.on_date(date)
            .iter()
            .find(|r| r.student_id == student_id)
    }

    pub fn on_date(&self, date: NaiveDate) -> &[AttendanceRecord] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Newest first.
    pub fn history(&self, student_id: &str) -> Vec<AttendanceRecord> {
        self.by_date
            .values()
            .rev()
            .filter_map(|day| day.iter().find(|r| r.student_id == student_id))
            .cloned()
            .collect()
    }

    pub fn daily_stats(&self, date: NaiveDate) -> DailyStats {
        DailyStats {
            date,
            tally: self.on_date(date).iter().collect::<StatusTally>(),
        }
    }
}
