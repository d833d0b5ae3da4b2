use async_trait::async_trait;
use serde::Serialize;
use crate::accounts::domain::AccountService;
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::LOGIN_PATH;

pub(crate) struct LogoutCommand {
    account_service: Box<dyn AccountService>,
}

impl LogoutCommand {
    pub(crate) fn new(account_service: Box<dyn AccountService>) -> Self {
        Self {
            account_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct LogoutCommandRequest {
    pub(crate) session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogoutCommandResponse {
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<LogoutCommandRequest, LogoutCommandResponse> for LogoutCommand {
    async fn execute(&self, req: LogoutCommandRequest) -> Result<LogoutCommandResponse, CommandError> {
        if let Some(session_id) = req.session_id {
            self.account_service.logout(session_id.as_str()).await.map_err(CommandError::from)?;
        }
        Ok(LogoutCommandResponse {
            notice: Notice::info("You have been logged out successfully."),
            redirect: LOGIN_PATH.to_string(),
        })
    }
}
