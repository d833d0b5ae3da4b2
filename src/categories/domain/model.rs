use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

// CategoryEntity groups books by subject; the name is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CategoryEntity {
    pub category_id: String,
    pub version: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl CategoryEntity {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            category_id: Uuid::new_v4().to_string(),
            version: 0,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for CategoryEntity {
    fn id(&self) -> String {
        self.category_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
