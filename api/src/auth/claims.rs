use serde::{Deserialize, Serialize};

/// Who a token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A row in `users`: proctors and administrators.
    Staff,
    /// A row in `students`, signed in through the exam client.
    Student,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// `users.id` for staff tokens, `students.id` for student tokens.
    pub sub: i64,
    pub exp: usize,
    pub admin: bool,
    pub role: Role,
    /// Unique token id, used for revocation on logout.
    pub jti: String,
}

impl Claims {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
