use serde::Serialize;
use crate::accounts::dto::AccountDto;
use crate::books::dto::BookDto;
use crate::ledger::dto::TransactionDto;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub(crate) struct StockSummary {
    pub titles: usize,
    pub copies: i64,
    pub on_loan: i64,
    pub open_loans: usize,
    pub overdue_loans: usize,
}

// DashboardDto is everything staff see on one page
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DashboardDto {
    pub summary: StockSummary,
    pub books: Vec<BookDto>,
    pub accounts: Vec<AccountDto>,
    pub transactions: Vec<TransactionDto>,
}

impl DashboardDto {
    pub fn new(books: Vec<BookDto>, accounts: Vec<AccountDto>, transactions: Vec<TransactionDto>) -> Self {
        let open = transactions.iter().filter(|t| t.return_date.is_none());
        let summary = StockSummary {
            titles: books.len(),
            copies: books.iter().fold(0_i64, |acc, b| acc.saturating_add(b.total_quantity)),
            on_loan: books.iter()
                .fold(0_i64, |acc, b| acc.saturating_add(b.total_quantity.saturating_sub(b.available_quantity))),
            open_loans: open.clone().count(),
            overdue_loans: open.filter(|t| t.overdue).count(),
        };
        Self { summary, books, accounts, transactions }
    }
}
