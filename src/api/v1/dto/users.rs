/*
 * Responsibility
 * - User の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::UserRow;

/// `?email=...`
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

impl EmailQuery {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub email: String,
}

impl UserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_email(&self.email)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self { email: row.email }
    }
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("email is required");
    }
    if email.len() > 256 {
        return Err("email must be <= 256 chars");
    }
    Ok(())
}
