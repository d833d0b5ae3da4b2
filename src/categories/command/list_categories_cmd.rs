use async_trait::async_trait;
use serde::Serialize;
use crate::categories::domain::CategoryService;
use crate::categories::dto::CategoryDto;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListCategoriesCommand {
    category_service: Box<dyn CategoryService>,
}

impl ListCategoriesCommand {
    pub(crate) fn new(category_service: Box<dyn CategoryService>) -> Self {
        Self {
            category_service,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ListCategoriesCommandRequest {}

#[derive(Debug, Serialize)]
pub(crate) struct ListCategoriesCommandResponse {
    pub categories: Vec<CategoryDto>,
}

#[async_trait]
impl Command<ListCategoriesCommandRequest, ListCategoriesCommandResponse> for ListCategoriesCommand {
    async fn execute(&self, _req: ListCategoriesCommandRequest) -> Result<ListCategoriesCommandResponse, CommandError> {
        self.category_service.find_categories().await
            .map_err(CommandError::from).map(|categories| ListCategoriesCommandResponse { categories })
    }
}
