use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct SearchBooksCommand {
    catalog_service: Box<dyn CatalogService>,
}

impl SearchBooksCommand {
    pub(crate) fn new(catalog_service: Box<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SearchBooksCommandRequest {
    pub(crate) query: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchBooksCommandResponse {
    pub query: String,
    pub books: Vec<BookDto>,
}

#[async_trait]
impl Command<SearchBooksCommandRequest, SearchBooksCommandResponse> for SearchBooksCommand {
    async fn execute(&self, req: SearchBooksCommandRequest) -> Result<SearchBooksCommandResponse, CommandError> {
        let books = self.catalog_service.search_books(req.query.as_deref()).await.map_err(CommandError::from)?;
        Ok(SearchBooksCommandResponse { query: req.query.unwrap_or_default(), books })
    }
}
