//! Roles, the role hierarchy and scope derivation.
//!
//! The role set is closed: admin ⊇ editor ⊇ user, reflexive. Scopes are
//! derived from the role at token-issue time, never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown role")]
pub struct UnknownRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::User => "user",
        }
    }

    /// Hierarchy check: does this role satisfy `required`?
    ///
    /// admin satisfies everything, editor satisfies editor and user,
    /// user satisfies only user. Reflexive by construction.
    pub fn satisfies(&self, required: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Editor => matches!(required, Role::Editor | Role::User),
            Role::User => matches!(required, Role::User),
        }
    }

    /// Scope set for a role. Strictly increasing along user → editor → admin.
    pub fn scopes(&self) -> Vec<Scope> {
        let mut scopes = vec![Scope::BooksRead, Scope::ReviewsRead, Scope::ReviewsWrite];

        if matches!(self, Role::Editor | Role::Admin) {
            scopes.extend([Scope::BooksWrite, Scope::ReviewsDelete]);
        }
        if matches!(self, Role::Admin) {
            scopes.extend([Scope::UsersRead, Scope::UsersWrite, Scope::UsersDelete]);
        }

        scopes
    }
}

// A token without a role claim is treated as a plain user.
impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or(UnknownRole)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained permission carried inside the token, e.g. `books:write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "books:read")]
    BooksRead,
    #[serde(rename = "books:write")]
    BooksWrite,
    #[serde(rename = "reviews:read")]
    ReviewsRead,
    #[serde(rename = "reviews:write")]
    ReviewsWrite,
    #[serde(rename = "reviews:delete")]
    ReviewsDelete,
    #[serde(rename = "users:read")]
    UsersRead,
    #[serde(rename = "users:write")]
    UsersWrite,
    #[serde(rename = "users:delete")]
    UsersDelete,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::BooksRead => "books:read",
            Scope::BooksWrite => "books:write",
            Scope::ReviewsRead => "reviews:read",
            Scope::ReviewsWrite => "reviews:write",
            Scope::ReviewsDelete => "reviews:delete",
            Scope::UsersRead => "users:read",
            Scope::UsersWrite => "users:write",
            Scope::UsersDelete => "users:delete",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hierarchy_is_reflexive() {
        for role in Role::ALL {
            assert!(role.satisfies(role), "{role} must satisfy itself");
        }
    }

    #[test]
    fn hierarchy_matches_containment_order() {
        // admin ⊇ editor ⊇ user, and nothing upward.
        assert!(Role::Admin.satisfies(Role::Editor));
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::Editor.satisfies(Role::User));

        assert!(!Role::Editor.satisfies(Role::Admin));
        assert!(!Role::User.satisfies(Role::Admin));
        assert!(!Role::User.satisfies(Role::Editor));
    }

    #[test]
    fn scopes_are_monotone_along_hierarchy() {
        let user = Role::User.scopes();
        let editor = Role::Editor.scopes();
        let admin = Role::Admin.scopes();

        for s in &user {
            assert!(editor.contains(s), "editor missing user scope {s}");
        }
        for s in &editor {
            assert!(admin.contains(s), "admin missing editor scope {s}");
        }
        assert!(user.len() < editor.len());
        assert!(editor.len() < admin.len());
    }

    #[test]
    fn base_scopes_for_user() {
        assert_eq!(
            Role::User.scopes(),
            vec![Scope::BooksRead, Scope::ReviewsRead, Scope::ReviewsWrite]
        );
    }

    #[test]
    fn only_admin_touches_users() {
        for scope in [Scope::UsersRead, Scope::UsersWrite, Scope::UsersDelete] {
            assert!(Role::Admin.scopes().contains(&scope));
            assert!(!Role::Editor.scopes().contains(&scope));
            assert!(!Role::User.scopes().contains(&scope));
        }
    }

    #[test]
    fn role_parsing_round_trips_and_rejects_unknown() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn scopes_serialize_as_permission_strings() {
        let json = serde_json::to_string(&Role::Admin.scopes()).unwrap();
        assert!(json.contains("\"books:write\""));
        assert!(json.contains("\"users:delete\""));
    }
}
