//! Role capabilities per resource.

use crate::model::Role;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Dashboard,
    Attendance,
    Students,
    Reports,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Dashboard,
        Resource::Attendance,
        Resource::Students,
        Resource::Reports,
    ];
}

pub fn can_view(role: Role, resource: Resource) -> bool {
    match resource {
        Resource::Dashboard | Resource::Reports => true,
        Resource::Attendance | Resource::Students => matches!(role, Role::Admin | Role::Teacher),
    }
}

pub fn can_write(role: Role, resource: Resource) -> bool {
    match resource {
        Resource::Attendance => matches!(role, Role::Admin | Role::Teacher),
        Resource::Students => role == Role::Admin,
        Resource::Dashboard | Resource::Reports => false,
    }
}

/// Navigation sections shown to `role`, in menu order.
pub fn visible_sections(role: Role) -> Vec<Resource> {
    Resource::ALL
        .into_iter()
        .filter(|r| can_view(role, *r))
        .collect()
}
