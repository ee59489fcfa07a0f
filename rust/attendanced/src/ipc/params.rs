use crate::error::{AttendanceError, Result};
use crate::model::AttendanceRecord;
use crate::validate;
use chrono::NaiveDate;
use serde::Deserialize;

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| AttendanceError::validation(format!("missing {}", key)))
}

/// Missing and `null` both read as `None`.
pub fn get_optional_str(params: &serde_json::Value, key: &str) -> Result<Option<String>> {
    match params.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| AttendanceError::validation(format!("{} must be string or null", key))),
    }
}

pub fn get_required_date(params: &serde_json::Value, key: &str) -> Result<NaiveDate> {
    validate::parse_date(&get_required_str(params, key)?)
}

pub fn get_str_array(params: &serde_json::Value, key: &str) -> Result<Vec<String>> {
    let Some(items) = params.get(key).and_then(|v| v.as_array()) else {
        return Err(AttendanceError::validation(format!("missing {}", key)));
    };
    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| AttendanceError::validation(format!("{} must contain strings", key)))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordInput {
    date: String,
    student_id: String,
    status: String,
    #[serde(default)]
    remarks: Option<String>,
}

/// Parses `params.records`. Any client-supplied `id` is ignored; ids are
/// derived from the key.
pub fn get_records(params: &serde_json::Value) -> Result<Vec<AttendanceRecord>> {
    let Some(items) = params.get("records").and_then(|v| v.as_array()) else {
        return Err(AttendanceError::validation("missing records"));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let input = RecordInput::deserialize(v)
                .map_err(|e| AttendanceError::validation(format!("records[{}]: {}", i, e)))?;
            let at = |e: AttendanceError| AttendanceError::validation(format!("records[{}]: {}", i, e));
            let date = validate::parse_date(&input.date).map_err(at)?;
            let status = validate::parse_status(&input.status).map_err(at)?;
            let student_id = validate::require_non_empty("studentId", &input.student_id)
                .map_err(at)?
                .to_string();
            Ok(AttendanceRecord::new(
                date,
                student_id,
                status,
                validate::normalize_remarks(input.remarks.as_deref()),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttendanceStatus;
    use serde_json::json;

    #[test]
    fn records_parse_and_normalize() {
        let params = json!({
            "records": [
                { "id": "client-id", "date": "2024-01-10", "studentId": "s1", "status": "Present", "remarks": "" },
                { "date": "2024-01-10", "studentId": "s2", "status": "L", "remarks": "Sick Leave" }
            ]
        });
        let got = get_records(&params).unwrap();
        assert_eq!(got[0].id, "2024-01-10_s1");
        assert_eq!(got[0].remarks, None);
        assert_eq!(got[1].status, AttendanceStatus::Leave);
        assert_eq!(got[1].remarks.as_deref(), Some("Sick Leave"));
    }

    #[test]
    fn bad_record_names_its_index() {
        let params = json!({
            "records": [
                { "date": "2024-01-10", "studentId": "s1", "status": "Present" },
                { "date": "2024-01-10", "studentId": "s2", "status": "Late" }
            ]
        });
        let e = get_records(&params).unwrap_err();
        assert_eq!(e.code(), "bad_params");
        assert!(e.to_string().starts_with("records[1]:"), "{}", e);

        let missing = json!({ "records": [ { "date": "2024-01-10", "status": "Present" } ] });
        assert!(get_records(&missing).is_err());
        assert!(get_records(&json!({})).is_err());
    }

    #[test]
    fn string_array_rejects_non_strings() {
        assert_eq!(
            get_str_array(&json!({ "ids": ["s1", "s2"] }), "ids").unwrap(),
            vec!["s1", "s2"]
        );
        assert!(get_str_array(&json!({ "ids": ["s1", 2] }), "ids").is_err());
        assert!(get_str_array(&json!({}), "ids").is_err());
    }

    #[test]
    fn optional_str_accepts_null() {
        assert_eq!(get_optional_str(&json!({ "t": null }), "t").unwrap(), None);
        assert_eq!(get_optional_str(&json!({}), "t").unwrap(), None);
        assert_eq!(get_optional_str(&json!({ "t": "u2" }), "t").unwrap().as_deref(), Some("u2"));
        assert!(get_optional_str(&json!({ "t": 2 }), "t").is_err());
    }
}
