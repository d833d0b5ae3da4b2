use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use serde::{Deserialize, Serialize};
use crate::core::domain::{Identifiable, ReturnStockPolicy};
use crate::core::library::{LibraryError, LibraryResult};
use crate::utils::date::serializer;

// BookEntity is a catalogue title together with its stock counters. Every copy is
// interchangeable, so the counters are all the ledger needs:
// 0 <= available_quantity <= total_quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub book_id: String,
    pub version: i64,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub authors: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub description: String,
    pub total_quantity: i64,
    pub available_quantity: i64,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(with = "serializer")]
    pub added_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookEntity {
    pub fn new(title: &str, authors: &str, total_quantity: i64) -> Self {
        Self {
            book_id: Uuid::new_v4().to_string(),
            version: 0,
            title: title.to_string(),
            subtitle: "".to_string(),
            authors: authors.to_string(),
            isbn: None,
            publisher: "".to_string(),
            category_id: None,
            description: "".to_string(),
            total_quantity,
            available_quantity: total_quantity,
            price: None,
            cover_image: None,
            added_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    // copies currently out on loan
    pub fn on_loan(&self) -> i64 {
        self.total_quantity - self.available_quantity
    }

    // takes `quantity` copies off the shelf for a new loan
    pub fn issue_copies(&mut self, quantity: i64) -> LibraryResult<()> {
        if quantity < 1 {
            return Err(LibraryError::invalid_field("quantity", "Ensure this value is greater than or equal to 1."));
        }
        if self.available_quantity < quantity {
            return Err(LibraryError::insufficient_stock(
                format!("Cannot issue '{}': Out of stock.", self.title).as_str(),
                self.available_quantity, quantity));
        }
        self.available_quantity -= quantity;
        Ok(())
    }

    // Puts `quantity` copies back on the shelf and returns how many copies had to be dropped
    // to stay within total_quantity (always 0 unless the counters had drifted).
    pub fn restore_copies(&mut self, quantity: i64, policy: ReturnStockPolicy) -> LibraryResult<i64> {
        if quantity < 1 {
            return Err(LibraryError::invalid_field("quantity", "Ensure this value is greater than or equal to 1."));
        }
        let restored = self.available_quantity + quantity;
        if restored <= self.total_quantity {
            self.available_quantity = restored;
            return Ok(0);
        }
        match policy {
            ReturnStockPolicy::Clamp => {
                self.available_quantity = self.total_quantity;
                Ok(restored - self.total_quantity)
            }
            ReturnStockPolicy::Strict => {
                Err(LibraryError::invalid_field("quantity", format!(
                    "Returning {} copies of '{}' would exceed its total of {}.",
                    quantity, self.title, self.total_quantity).as_str()))
            }
        }
    }

    // Moves available_quantity by a signed delta. There is no upper clamp here; callers that
    // grow the shelf also grow total_quantity.
    pub fn adjust_stock(&mut self, delta: i64) -> LibraryResult<()> {
        let adjusted = self.available_quantity + delta;
        if adjusted < 0 {
            return Err(LibraryError::insufficient_stock(
                format!("Insufficient stock of '{}' to remove {} copies.", self.title, -delta).as_str(),
                self.available_quantity, -delta));
        }
        self.available_quantity = adjusted;
        Ok(())
    }

    // changes total_quantity and shifts available_quantity by the same amount, so the number of
    // copies on loan is preserved
    pub fn change_total(&mut self, total_quantity: i64) -> LibraryResult<()> {
        if total_quantity < 0 {
            return Err(LibraryError::invalid_field("total_quantity", "Ensure this value is greater than or equal to 0."));
        }
        if total_quantity < self.on_loan() {
            return Err(LibraryError::invalid_field("total_quantity", format!(
                "{} copies of '{}' are on loan, total quantity cannot be {}.",
                self.on_loan(), self.title, total_quantity).as_str()));
        }
        self.adjust_stock(total_quantity - self.total_quantity)?;
        self.total_quantity = total_quantity;
        Ok(())
    }

    pub fn matches_title(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query.trim().to_lowercase().as_str())
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> String {
        self.book_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
