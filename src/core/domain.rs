use std::env;
use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::core::library::{LibraryError, LibraryResult, Role};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

// Identity is the authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: i64, username: &str, email: &str, role: Role) -> Self {
        Self {
            user_id,
            username: username.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }

    pub fn require_staff(&self) -> LibraryResult<()> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(LibraryError::access_denied(
                format!("{} is not staff", self.username).as_str(), Some(self.role.to_string())))
        }
    }
}

// ReturnStockPolicy decides what happens when a return would push available_quantity
// above total_quantity.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub enum ReturnStockPolicy {
    // clamp to total_quantity and report the absorbed drift
    Clamp,
    // reject the return and leave the counter untouched
    Strict,
}

impl From<String> for ReturnStockPolicy {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "strict" => ReturnStockPolicy::Strict,
            _ => ReturnStockPolicy::Clamp,
        }
    }
}

impl Display for ReturnStockPolicy {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ReturnStockPolicy::Clamp => write!(f, "clamp"),
            ReturnStockPolicy::Strict => write!(f, "strict"),
        }
    }
}

pub(crate) const MAX_LOAN_DAYS: i64 = 3_650;
pub(crate) const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

// Configuration abstracts config options for library system
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub book_loan_days: i64,
    pub issue_quantity: i64,
    pub return_policy: ReturnStockPolicy,
    pub session_ttl_hours: i64,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            book_loan_days: 15,
            issue_quantity: 1,
            return_policy: ReturnStockPolicy::Clamp,
            session_ttl_hours: 24,
        }
    }

    // overlays INVENTORY_* environment variables on top of the defaults
    pub fn from_env() -> Self {
        let branch = env::var("INVENTORY_BRANCH").unwrap_or_else(|_| "dev".to_string());
        let mut config = Configuration::new(branch.as_str());
        if let Some(days) = env_number("INVENTORY_LOAN_DAYS", MAX_LOAN_DAYS) {
            config.book_loan_days = days;
        }
        if let Some(hours) = env_number("INVENTORY_SESSION_TTL_HOURS", MAX_SESSION_TTL_HOURS) {
            config.session_ttl_hours = hours;
        }
        if let Ok(policy) = env::var("INVENTORY_RETURN_POLICY") {
            config.return_policy = ReturnStockPolicy::from(policy);
        }
        config
    }
}

// positive whole numbers only, capped so date arithmetic on them cannot overflow
fn env_number(name: &str, max: i64) -> Option<i64> {
    let value = bounded_number(env::var(name).ok().as_deref(), max);
    if value == Some(max) {
        warn!("{} capped at {}", name, max);
    }
    value
}

fn bounded_number(raw: Option<&str>, max: i64) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n.min(max))
}
