/*
 * Responsibility
 * - register/login request and response DTOs
 * - Fields are Options so missing values become 400s with a message
 *   instead of serde rejections
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(&str, &str), &'static str> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password))
                if !username.trim().is_empty() && !password.is_empty() =>
            {
                Ok((username, password))
            }
            _ => Err("Username and password are required"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_username_and_password() {
        let ok = RegisterRequest {
            username: Some("alice".into()),
            password: Some("pw".into()),
            role: None,
        };
        assert_eq!(ok.validate().unwrap(), ("alice", "pw"));

        let missing_password = RegisterRequest {
            username: Some("alice".into()),
            password: None,
            role: None,
        };
        assert!(missing_password.validate().is_err());

        let blank_username = RegisterRequest {
            username: Some("   ".into()),
            password: Some("pw".into()),
            role: None,
        };
        assert!(blank_username.validate().is_err());
    }
}
