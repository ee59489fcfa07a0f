use crate::error::Result;
use crate::ipc::error::respond;
use crate::ipc::params::get_required_str;
use crate::ipc::types::{AppState, Request};
use crate::policy;
use serde_json::json;

fn auth_login(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value> {
    let username = get_required_str(params, "username")?;
    let user = state.service.login(&username)?;
    tracing::info!(user = %user.username, role = ?user.role, "login");
    let sections = policy::visible_sections(user.role);
    let result = json!({ "user": user, "sections": sections });
    state.session = Some(user);
    Ok(result)
}

fn auth_logout(state: &mut AppState) -> Result<serde_json::Value> {
    if let Some(user) = state.session.take() {
        tracing::info!(user = %user.username, "logout");
    }
    Ok(json!({ "ok": true }))
}

fn auth_who_am_i(state: &AppState) -> Result<serde_json::Value> {
    let sections = state
        .session
        .as_ref()
        .map(|u| policy::visible_sections(u.role))
        .unwrap_or_default();
    Ok(json!({ "user": state.session, "sections": sections }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "auth.login" => auth_login(state, &req.params),
        "auth.logout" => auth_logout(state),
        "auth.whoAmI" => auth_who_am_i(state),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
