//! Account form requests and their local validation.

use crate::error::{BlogError, Result};
use serde::{Deserialize, Serialize};

/// Login form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

impl SignInRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both email and password must be filled in.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(BlogError::validation(
                "credentials",
                "Please fill in both email and password.",
            ));
        }
        Ok(())
    }
}

/// Registration form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub business_name: Option<String>,
}

impl SignUpRequest {
    /// Checks password length and confirmation before any provider call.
    ///
    /// # Arguments
    ///
    /// * `min_password_length` - Minimum accepted password length in characters
    pub fn validate(&self, min_password_length: usize) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(BlogError::validation("email", "Email is required."));
        }
        check_new_password(&self.password, &self.confirm_password, min_password_length)
    }

    /// Display name stored on the new account.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Password change form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn validate(&self, min_password_length: usize) -> Result<()> {
        if self.old_password.is_empty() {
            return Err(BlogError::validation(
                "old_password",
                "Current password is required.",
            ));
        }
        check_new_password(
            &self.new_password,
            &self.confirm_password,
            min_password_length,
        )
    }
}

fn check_new_password(password: &str, confirm: &str, min_length: usize) -> Result<()> {
    if password.chars().count() < min_length {
        return Err(BlogError::validation(
            "password",
            format!("Password must be at least {} characters long.", min_length),
        ));
    }
    if password != confirm {
        return Err(BlogError::validation(
            "confirm_password",
            "Passwords do not match.",
        ));
    }
    Ok(())
}
