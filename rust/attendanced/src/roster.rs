use crate::error::{AttendanceError, Result};
use crate::model::{Role, Student, User};

/// Users and students known to the process. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    users: Vec<User>,
    students: Vec<Student>,
}

fn user(id: &str, username: &str, full_name: &str, role: Role, email: &str, n: u32) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        full_name: full_name.to_string(),
        role,
        email: email.to_string(),
        avatar: format!("https://picsum.photos/200/200?random={}", n),
    }
}

fn student(id: &str, name: &str, roll_no: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        roll_no: roll_no.to_string(),
        class: "10".to_string(),
        section: "A".to_string(),
        teacher_id: "u2".to_string(),
    }
}

impl Roster {
    /// Demo identities (`admin`, `teacher`, `student`) and one class of
    /// eight students taught by `u2`.
    pub fn demo() -> Self {
        let users = vec![
            user("u1", "admin", "James Anderson", Role::Admin, "admin@edumatrix.com", 1),
            user("u2", "teacher", "Sarah Jenkins", Role::Teacher, "sarah.j@edumatrix.com", 2),
            user("u3", "student", "Michael Key", Role::Student, "michael.k@edumatrix.com", 3),
        ];
        let students = vec![
            student("s1", "Aarav Patel", "101"),
            student("s2", "Aditi Sharma", "102"),
            student("s3", "Benjamin Hayes", "103"),
            student("s4", "Chloe Kim", "104"),
            student("s5", "David Loop", "105"),
            student("s6", "Emily Chen", "106"),
            student("s7", "Frank Wright", "107"),
            student("s8", "Grace Ho", "108"),
        ];
        Roster { users, students }
    }

    /// Exact username match. There is no credential check.
    pub fn login(&self, username: &str) -> Result<User> {
        self.users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| AttendanceError::UnknownUser {
                username: username.to_string(),
                accepted: self.usernames(),
            })
    }

    pub fn usernames(&self) -> Vec<String> {
        self.users.iter().map(|u| u.username.clone()).collect()
    }

    pub fn all_students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn contains_student(&self, id: &str) -> bool {
        self.student(id).is_some()
    }

    pub fn teacher(&self, id: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.id == id && u.role == Role::Teacher)
    }

    pub fn students_by_teacher(&self, teacher_id: &str) -> Result<Vec<Student>> {
        if self.teacher(teacher_id).is_none() {
            return Err(AttendanceError::not_found("teacher", teacher_id));
        }
        Ok(self
            .students
            .iter()
            .filter(|s| s.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    pub fn total_students(&self) -> usize {
        self.students.len()
    }

    pub fn total_teachers(&self) -> usize {
        self.users.iter().filter(|u| u.role == Role::Teacher).count()
    }
}
