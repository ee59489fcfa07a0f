use crate::error::Result;
use crate::ipc::error::respond;
use crate::ipc::params::get_required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn students_list(state: &AppState) -> Result<serde_json::Value> {
    Ok(json!({ "students": state.service.all_students() }))
}

fn students_by_teacher(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value> {
    let teacher_id = get_required_str(params, "teacherId")?;
    Ok(json!({ "students": state.service.students_by_teacher(&teacher_id)? }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => students_list(state),
        "students.byTeacher" => students_by_teacher(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
