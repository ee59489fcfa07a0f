use crate::error::{AttendanceError, Result};
use crate::ipc::error::respond;
use crate::ipc::params::{
    get_optional_str, get_records, get_required_date, get_required_str, get_str_array,
};
use crate::ipc::types::{AppState, Request};
use crate::policy::{self, Resource};
use serde_json::json;

fn attendance_get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value> {
    let date = get_required_date(params, "date")?;
    let student_ids = get_str_array(params, "studentIds")?;
    Ok(json!({ "records": state.service.get_attendance(date, &student_ids) }))
}

fn attendance_save(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value> {
    let Some(user) = state.session.as_ref() else {
        return Err(AttendanceError::Forbidden("log in first".to_string()));
    };
    if !policy::can_write(user.role, Resource::Attendance) {
        return Err(AttendanceError::Forbidden(format!(
            "{} may not record attendance",
            user.username
        )));
    }
    let username = user.username.clone();
    let records = get_records(params)?;
    let saved = state.service.save_attendance(records)?;
    tracing::info!(user = %username, saved, "attendance saved");
    Ok(json!({ "saved": saved }))
}

fn attendance_history(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value> {
    let student_id = get_required_str(params, "studentId")?;
    Ok(json!({ "records": state.service.student_history(&student_id)? }))
}

fn attendance_sheet_open(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value> {
    let date = get_required_date(params, "date")?;
    let teacher_id = get_optional_str(params, "teacherId")?;
    Ok(json!(state.service.open_sheet(date, teacher_id.as_deref())?))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.get" => attendance_get(state, &req.params),
        "attendance.save" => attendance_save(state, &req.params),
        "attendance.history" => attendance_history(state, &req.params),
        "attendance.sheetOpen" => attendance_sheet_open(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::roster::Roster;
    use crate::service::AttendanceService;
    use crate::store::AttendanceStore;
    use chrono::NaiveDate;

    fn state() -> AppState {
        AppState::new(AttendanceService::new(
            Roster::demo(),
            AttendanceStore::new(),
            Box::new(FixedClock(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())),
        ))
    }

    fn save_params() -> serde_json::Value {
        json!({ "records": [ { "date": "2024-01-10", "studentId": "s1", "status": "Absent" } ] })
    }

    #[test]
    fn save_requires_session() {
        let mut st = state();
        let e = attendance_save(&mut st, &save_params()).unwrap_err();
        assert_eq!(e.code(), "forbidden");
        assert_eq!(st.service.record_count(), 0);
    }

    #[test]
    fn students_cannot_save_but_teachers_can() {
        let mut st = state();
        st.session = Some(st.service.login("student").unwrap());
        assert_eq!(
            attendance_save(&mut st, &save_params()).unwrap_err().code(),
            "forbidden"
        );

        st.session = Some(st.service.login("teacher").unwrap());
        let v = attendance_save(&mut st, &save_params()).unwrap();
        assert_eq!(v["saved"], 1);
        assert_eq!(st.service.record_count(), 1);
    }
}
