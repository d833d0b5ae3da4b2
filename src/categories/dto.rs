use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::categories::domain::model::CategoryEntity;
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CategoryDto {
    pub category_id: String,
    pub version: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(crate) struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryForm {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(LibraryError::invalid_field("name", "This field is required."));
        }
        if name.chars().count() > 100 {
            return Err(LibraryError::invalid_field("name", "Ensure this value has at most 100 characters."));
        }
        Ok(())
    }
}

impl From<&CategoryEntity> for CategoryDto {
    fn from(other: &CategoryEntity) -> Self {
        Self {
            category_id: other.category_id.to_string(),
            version: other.version,
            name: other.name.to_string(),
            description: other.description.to_string(),
            created_at: other.created_at,
        }
    }
}
