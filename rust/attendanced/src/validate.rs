use crate::error::{AttendanceError, Result};
use crate::model::AttendanceStatus;
use chrono::NaiveDate;

/// Strict `YYYY-MM-DD`; zero padding is required.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let t = raw.trim();
    let shape_ok = t.len() == 10
        && t.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(AttendanceError::validation(format!(
            "date must be YYYY-MM-DD, got {:?}",
            raw
        )));
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d").map_err(|_| {
        AttendanceError::validation(format!("not a calendar date: {:?}", raw))
    })
}

pub fn parse_status(raw: &str) -> Result<AttendanceStatus> {
    raw.parse::<AttendanceStatus>()
        .map_err(|e| AttendanceError::validation(e.to_string()))
}

pub fn normalize_remarks(raw: Option<&str>) -> Option<String> {
    let t = raw?.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

pub fn require_non_empty<'a>(key: &str, value: &'a str) -> Result<&'a str> {
    let t = value.trim();
    if t.is_empty() {
        return Err(AttendanceError::validation(format!("{} must not be empty", key)));
    }
    Ok(t)
}
