use crate::model::User;
use crate::service::AttendanceService;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub service: AttendanceService,
    /// Set by `auth.login`, cleared by `auth.logout`.
    pub session: Option<User>,
}

impl AppState {
    pub fn new(service: AttendanceService) -> Self {
        AppState {
            service,
            session: None,
        }
    }
}
