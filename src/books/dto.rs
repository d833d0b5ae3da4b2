use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::date::serializer;

const MAX_PRICE_DIGITS: u32 = 8;
const PRICE_PLACES: u32 = 2;
pub(crate) const MAX_QUANTITY: i64 = i32::MAX as i64;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    pub book_id: String,
    pub version: i64,
    pub title: String,
    pub subtitle: String,
    pub authors: String,
    pub isbn: Option<String>,
    pub publisher: String,
    pub category_id: Option<String>,
    pub description: String,
    pub total_quantity: i64,
    pub available_quantity: i64,
    pub price: Option<Decimal>,
    pub cover_image: Option<String>,
    #[serde(with = "serializer")]
    pub added_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl Identifiable for BookDto {
    fn id(&self) -> String {
        self.book_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Book for BookDto {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn available_quantity(&self) -> i64 {
        self.available_quantity
    }

    fn total_quantity(&self) -> i64 {
        self.total_quantity
    }
}

// BookForm carries the fields staff fill in to add or edit a book; available_quantity is
// never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_total_quantity")]
    pub total_quantity: i64,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

fn default_total_quantity() -> i64 {
    1
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: "".to_string(),
            subtitle: "".to_string(),
            authors: "".to_string(),
            isbn: None,
            publisher: "".to_string(),
            category_id: None,
            description: "".to_string(),
            total_quantity: default_total_quantity(),
            price: None,
            cover_image: None,
        }
    }
}

impl BookForm {
    pub fn new(title: &str, authors: &str, total_quantity: i64) -> Self {
        Self {
            title: title.to_string(),
            authors: authors.to_string(),
            total_quantity,
            ..Default::default()
        }
    }

    // trims text fields and turns blank optional fields into None
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            subtitle: self.subtitle.trim().to_string(),
            authors: self.authors.trim().to_string(),
            isbn: blank_to_none(&self.isbn),
            publisher: self.publisher.trim().to_string(),
            category_id: blank_to_none(&self.category_id),
            description: self.description.trim().to_string(),
            total_quantity: self.total_quantity,
            price: self.price,
            cover_image: blank_to_none(&self.cover_image),
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        required("title", self.title.as_str(), 200)?;
        max_length("subtitle", self.subtitle.as_str(), 200)?;
        required("authors", self.authors.as_str(), 255)?;
        if let Some(isbn) = &self.isbn {
            max_length("isbn", isbn.as_str(), 13)?;
        }
        max_length("publisher", self.publisher.as_str(), 255)?;
        if self.total_quantity < 0 {
            return Err(LibraryError::invalid_field("total_quantity", "Ensure this value is greater than or equal to 0."));
        }
        if self.total_quantity > MAX_QUANTITY {
            return Err(LibraryError::invalid_field("total_quantity",
                                                   format!("Ensure this value is less than or equal to {}.", MAX_QUANTITY).as_str()));
        }
        if let Some(price) = self.price {
            if price.scale() > PRICE_PLACES {
                return Err(LibraryError::invalid_field("price", "Ensure that there are no more than 2 decimal places."));
            }
            if price.trunc().abs() >= Decimal::from(10_i64.pow(MAX_PRICE_DIGITS - PRICE_PLACES)) {
                return Err(LibraryError::invalid_field("price", "Ensure that there are no more than 8 digits in total."));
            }
        }
        Ok(())
    }

    // a new book starts with every copy on the shelf
    pub fn build_book(&self) -> BookDto {
        let now = Utc::now().naive_utc();
        BookDto {
            book_id: Uuid::new_v4().to_string(),
            version: 0,
            title: self.title.to_string(),
            subtitle: self.subtitle.to_string(),
            authors: self.authors.to_string(),
            isbn: self.isbn.clone(),
            publisher: self.publisher.to_string(),
            category_id: self.category_id.clone(),
            description: self.description.to_string(),
            total_quantity: self.total_quantity,
            available_quantity: self.total_quantity,
            price: self.price,
            cover_image: self.cover_image.clone(),
            added_at: now,
            updated_at: now,
        }
    }
}

impl From<&BookDto> for BookForm {
    fn from(other: &BookDto) -> Self {
        Self {
            title: other.title.to_string(),
            subtitle: other.subtitle.to_string(),
            authors: other.authors.to_string(),
            isbn: other.isbn.clone(),
            publisher: other.publisher.to_string(),
            category_id: other.category_id.clone(),
            description: other.description.to_string(),
            total_quantity: other.total_quantity,
            price: other.price,
            cover_image: other.cover_image.clone(),
        }
    }
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn required(field: &str, value: &str, max: usize) -> LibraryResult<()> {
    if value.is_empty() {
        return Err(LibraryError::invalid_field(field, "This field is required."));
    }
    max_length(field, value, max)
}

fn max_length(field: &str, value: &str, max: usize) -> LibraryResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(LibraryError::invalid_field(field, format!(
            "Ensure this value has at most {} characters (it has {}).", max, len).as_str()));
    }
    Ok(())
}
