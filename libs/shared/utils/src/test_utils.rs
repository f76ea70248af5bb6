use std::sync::Arc;

use shared_models::session::{Role, User};

use crate::session::SessionManager;

pub struct TestUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(id: &str, name: &str, email: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn admin() -> Self {
        Self::new("U001", "Avery Admin", "admin@carepoint.test", Role::Admin)
    }

    pub fn doctor() -> Self {
        Self::new("D001", "Dr. Sarah Wilson", "doctor@carepoint.test", Role::Doctor)
    }

    pub fn patient() -> Self {
        Self::new("P001", "John Smith", "patient@carepoint.test", Role::Patient)
    }

    pub fn receptionist() -> Self {
        Self::new("U002", "Riley Reception", "reception@carepoint.test", Role::Receptionist)
    }

    pub fn staff() -> Self {
        Self::new("U003", "Sam Staff", "staff@carepoint.test", Role::Staff)
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Session manager with `user` already signed in.
pub async fn signed_in(user: &TestUser) -> Arc<SessionManager> {
    let sessions = Arc::new(SessionManager::in_memory());
    sessions
        .login(user.to_user())
        .await
        .expect("in-memory session store never fails");
    sessions
}
