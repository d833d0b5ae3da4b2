use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// formats the membership id of an account, e.g. user 7 is M0007
pub(crate) fn membership_id(user_id: i64) -> String {
    format!("M{:04}", user_id)
}

// MemberEntity is the borrowing side of an account; it is keyed by its membership id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MemberEntity {
    pub member_id: String,
    pub version: i64,
    pub user_id: i64,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub active: bool,
    #[serde(with = "serializer")]
    pub joined_on: NaiveDateTime,
}

impl MemberEntity {
    pub fn new(user_id: i64) -> Self {
        Self {
            member_id: membership_id(user_id),
            version: 0,
            user_id,
            phone: "".to_string(),
            address: "".to_string(),
            active: true,
            joined_on: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for MemberEntity {
    fn id(&self) -> String {
        self.member_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use crate::members::domain::model::{MemberEntity, membership_id};

    #[tokio::test]
    async fn test_should_format_membership_id() {
        assert_eq!("M0001", membership_id(1));
        assert_eq!("M0042", membership_id(42));
        assert_eq!("M12345", membership_id(12345));
    }

    #[tokio::test]
    async fn test_should_build_active_member() {
        let member = MemberEntity::new(7);
        assert_eq!("M0007", member.member_id.as_str());
        assert!(member.active);
    }
}
