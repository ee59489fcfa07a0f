use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let svc = &state.service;
    let result = match req.method.as_str() {
        "stats.system" => json!(svc.system_stats()),
        "stats.weekly" => json!({ "days": svc.weekly_data() }),
        "stats.distribution" => json!(svc.status_distribution()),
        "stats.lowAttendance" => json!({
            "alerts": svc.low_attendance_alerts(),
            "threshold": svc.low_attendance_threshold(),
        }),
        _ => return None,
    };
    Some(ok(&req.id, result))
}
