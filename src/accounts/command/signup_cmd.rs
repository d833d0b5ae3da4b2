use async_trait::async_trait;
use serde::Serialize;
use crate::accounts::domain::AccountService;
use crate::accounts::dto::{AccountDto, SessionDto, SignupForm};
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::HOME_PATH;

pub(crate) struct SignupCommand {
    account_service: Box<dyn AccountService>,
}

impl SignupCommand {
    pub(crate) fn new(account_service: Box<dyn AccountService>) -> Self {
        Self {
            account_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SignupCommandRequest {
    pub(crate) form: SignupForm,
}

#[derive(Debug, Serialize)]
pub(crate) struct SignupCommandResponse {
    pub account: AccountDto,
    pub session: SessionDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<SignupCommandRequest, SignupCommandResponse> for SignupCommand {
    async fn execute(&self, req: SignupCommandRequest) -> Result<SignupCommandResponse, CommandError> {
        let (account, session) = self.account_service.signup(&req.form).await.map_err(CommandError::from)?;
        Ok(SignupCommandResponse {
            account,
            session,
            notice: Notice::success("Signup successfully!"),
            redirect: HOME_PATH.to_string(),
        })
    }
}
