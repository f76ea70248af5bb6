use shared_models::session::{Role, User};

/// Accounts that can sign in. Sign-in is by email only.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// One account per dashboard role.
    pub fn demo() -> Self {
        let user = |id: &str, name: &str, email: &str, role: Role| User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        };

        Self::new(vec![
            user("U001", "Avery Admin", "admin@carepoint.health", Role::Admin),
            user("D001", "Dr. Sarah Wilson", "doctor@carepoint.health", Role::Doctor),
            user("P001", "John Smith", "patient@carepoint.health", Role::Patient),
            user("U002", "Riley Reception", "reception@carepoint.health", Role::Receptionist),
            user("U003", "Sam Staff", "staff@carepoint.health", Role::Staff),
        ])
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users.iter().find(|user| user.email.eq_ignore_ascii_case(email))
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }
}
