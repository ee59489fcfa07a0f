use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid username {username:?}. Try: {}", .accepted.join(", "))]
    UnknownUser {
        username: String,
        accepted: Vec<String>,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("persistence failed: {0}")]
    Persistence(#[from] rusqlite::Error),
}

impl AttendanceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AttendanceError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AttendanceError::Validation(message.into())
    }

    /// Error code carried in the IPC envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceError::NotFound { .. } | AttendanceError::UnknownUser { .. } => "not_found",
            AttendanceError::Validation(_) => "bad_params",
            AttendanceError::Forbidden(_) => "forbidden",
            AttendanceError::Persistence(_) => "db_update_failed",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            AttendanceError::NotFound { entity, id } => Some(json!({ "entity": entity, "id": id })),
            AttendanceError::UnknownUser { accepted, .. } => {
                Some(json!({ "acceptedUsernames": accepted }))
            }
            AttendanceError::Persistence(_) => Some(json!({ "retryable": true })),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AttendanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_message_names_accepted_identities() {
        let e = AttendanceError::UnknownUser {
            username: "bob".into(),
            accepted: vec!["admin".into(), "teacher".into(), "student".into()],
        };
        assert_eq!(e.code(), "not_found");
        assert_eq!(
            e.to_string(),
            "invalid username \"bob\". Try: admin, teacher, student"
        );
    }

    #[test]
    fn codes_follow_error_kind() {
        assert_eq!(AttendanceError::not_found("student", "s9").code(), "not_found");
        assert_eq!(AttendanceError::validation("bad date").code(), "bad_params");
        assert_eq!(AttendanceError::Forbidden("no".into()).code(), "forbidden");
        let e = AttendanceError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(e.code(), "db_update_failed");
        assert_eq!(e.details(), Some(json!({ "retryable": true })));
    }
}
