use async_trait::async_trait;
use serde::Serialize;
use crate::categories::domain::CategoryService;
use crate::categories::dto::CategoryDto;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::domain::Identity;

pub(crate) struct RemoveCategoryCommand {
    category_service: Box<dyn CategoryService>,
}

impl RemoveCategoryCommand {
    pub(crate) fn new(category_service: Box<dyn CategoryService>) -> Self {
        Self {
            category_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RemoveCategoryCommandRequest {
    pub(crate) identity: Identity,
    pub(crate) category_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveCategoryCommandResponse {
    pub category: CategoryDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<RemoveCategoryCommandRequest, RemoveCategoryCommandResponse> for RemoveCategoryCommand {
    async fn execute(&self, req: RemoveCategoryCommandRequest) -> Result<RemoveCategoryCommandResponse, CommandError> {
        let category = self.category_service.remove_category(&req.identity, req.category_id.as_str())
            .await.map_err(CommandError::from)?;
        Ok(RemoveCategoryCommandResponse {
            notice: Notice::success(format!("Category '{}' deleted successfully.", category.name).as_str()),
            redirect: "/categories/".to_string(),
            category,
        })
    }
}
