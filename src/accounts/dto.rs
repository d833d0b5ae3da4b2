use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::accounts::domain::model::{AccountEntity, SessionEntity};
use crate::core::library::{LibraryError, LibraryResult, Role};
use crate::utils::date::serializer;

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AccountDto {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "serializer")]
    pub joined_at: NaiveDateTime,
}

impl From<&AccountEntity> for AccountDto {
    fn from(other: &AccountEntity) -> Self {
        Self {
            user_id: other.user_id,
            username: other.username.to_string(),
            email: other.email.to_string(),
            role: other.role,
            joined_at: other.joined_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SessionDto {
    pub session_id: String,
    #[serde(with = "serializer")]
    pub expires_at: NaiveDateTime,
}

impl From<&SessionEntity> for SessionDto {
    fn from(other: &SessionEntity) -> Self {
        Self {
            session_id: other.session_id.to_string(),
            expires_at: other.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(crate) struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub role: Role,
}

impl SignupForm {
    pub fn new(username: &str, email: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password1: password.to_string(),
            password2: password.to_string(),
            role,
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(LibraryError::invalid_field("username", "This field is required."));
        }
        if username.chars().count() > 150 {
            return Err(LibraryError::invalid_field("username", "Ensure this value has at most 150 characters."));
        }
        if !username.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)) {
            return Err(LibraryError::invalid_field("username",
                                                   "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."));
        }
        let email = self.email.trim();
        if !email.is_empty() && !valid_email(email) {
            return Err(LibraryError::invalid_field("email", "Enter a valid email address."));
        }
        if self.password1.is_empty() {
            return Err(LibraryError::invalid_field("password1", "This field is required."));
        }
        if self.password1 != self.password2 {
            return Err(LibraryError::invalid_field("password2", "The two password fields didn't match."));
        }
        if self.password1.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(LibraryError::invalid_field("password2",
                                                   "This password is too short. It must contain at least 8 characters."));
        }
        if self.password1.chars().all(|c| c.is_ascii_digit()) {
            return Err(LibraryError::invalid_field("password2", "This password is entirely numeric."));
        }
        Ok(())
    }
}

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') &&
            !domain.starts_with('.') && !domain.ends_with('.') && !domain.contains('@'),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
