use async_trait::async_trait;
use serde::Serialize;
use crate::accounts::domain::AccountService;
use crate::accounts::dto::{AccountDto, LoginForm, SessionDto};
use crate::core::command::{Command, CommandError, Notice};
use crate::core::controller::HOME_PATH;

pub(crate) struct LoginCommand {
    account_service: Box<dyn AccountService>,
}

impl LoginCommand {
    pub(crate) fn new(account_service: Box<dyn AccountService>) -> Self {
        Self {
            account_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct LoginCommandRequest {
    pub(crate) form: LoginForm,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginCommandResponse {
    pub account: AccountDto,
    pub session: SessionDto,
    pub notice: Notice,
    pub redirect: String,
}

#[async_trait]
impl Command<LoginCommandRequest, LoginCommandResponse> for LoginCommand {
    async fn execute(&self, req: LoginCommandRequest) -> Result<LoginCommandResponse, CommandError> {
        let (account, session) = self.account_service.login(&req.form).await.map_err(CommandError::from)?;
        Ok(LoginCommandResponse {
            notice: Notice::success(format!("Welcome back, {}!", account.username).as_str()),
            redirect: HOME_PATH.to_string(),
            account,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use crate::accounts::command::login_cmd::{LoginCommand, LoginCommandRequest};
    use crate::accounts::dto::{LoginForm, SignupForm};
    use crate::accounts::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::library::Role;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_run_login() {
        let config = Configuration::new("test");
        let svc = factory::create_account_service(&config, RepositoryStore::InMemory).await
            .expect("should create account service");
        let username = format!("welcome_{}", Uuid::new_v4().simple());
        svc.signup(&SignupForm::new(username.as_str(), "", "s3cret-pass", Role::User)).await.expect("should signup");

        let cmd = LoginCommand::new(svc);
        let res = cmd.execute(LoginCommandRequest {
            form: LoginForm { username: username.clone(), password: "s3cret-pass".to_string() },
        }).await.expect("should login");
        assert_eq!(format!("Welcome back, {}!", username), res.notice.message);

        let bad = cmd.execute(LoginCommandRequest {
            form: LoginForm { username, password: "nope-nope".to_string() },
        }).await;
        match bad {
            Err(CommandError::Validation { message, reason_code }) => {
                assert_eq!("Invalid username or password.", message.as_str());
                assert_eq!(None, reason_code);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
