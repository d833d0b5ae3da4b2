use chrono::{Duration, NaiveDateTime, Utc};
use pbkdf2::Pbkdf2;
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::{Identifiable, Identity};
use crate::core::library::{LibraryError, LibraryResult, Role};
use crate::utils::date::serializer;

// AccountEntity is a login together with its role profile. The role is fixed at signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AccountEntity {
    pub account_id: String,
    pub version: i64,
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    // PHC string: algorithm, rounds, salt and digest
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(with = "serializer")]
    pub joined_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl AccountEntity {
    pub fn new(user_id: i64, username: &str, email: &str, password: &str, role: Role) -> LibraryResult<Self> {
        Ok(Self {
            account_id: user_id.to_string(),
            version: 0,
            user_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role,
            joined_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(self.password_hash.as_str()) {
            Ok(parsed) => Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id, self.username.as_str(), self.email.as_str(), self.role)
    }
}

impl Identifiable for AccountEntity {
    fn id(&self) -> String {
        self.account_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

// SessionEntity binds an opaque token to an account until it expires or the user logs out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SessionEntity {
    pub session_id: String,
    pub version: i64,
    pub user_id: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub expires_at: NaiveDateTime,
}

impl SessionEntity {
    pub fn new(user_id: i64, ttl_hours: i64) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            session_id: format!("{}{}", Uuid::new_v4().simple(), random_hex(16)),
            version: 0,
            user_id,
            created_at: now,
            expires_at: now + Duration::hours(ttl_hours),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }
}

impl Identifiable for SessionEntity {
    fn id(&self) -> String {
        self.session_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(not(test))]
const PASSWORD_ROUNDS: u32 = 600_000;
#[cfg(test)]
const PASSWORD_ROUNDS: u32 = 1_000;

fn hash_password(password: &str) -> LibraryResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let params = pbkdf2::Params { rounds: PASSWORD_ROUNDS, output_length: 32 };
    Pbkdf2.hash_password_customized(password.as_bytes(), None, None, params, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| LibraryError::runtime(format!("could not hash password {}", err).as_str(), None))
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
