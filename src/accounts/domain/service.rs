use std::collections::HashMap;
use async_trait::async_trait;
use tracing::{debug, info};
use crate::accounts::domain::AccountService;
use crate::accounts::domain::model::{AccountEntity, SessionEntity};
use crate::accounts::dto::{AccountDto, LoginForm, SessionDto, SignupForm};
use crate::accounts::repository::{AccountRepository, SessionRepository};
use crate::core::domain::{Configuration, Identity};
use crate::core::events::DomainEvent;
use crate::core::library::{LibraryError, LibraryResult, Role};
use crate::gateway::events::EventPublisher;
use crate::members::repository::MemberRepository;

const INVALID_LOGIN: &str = "Invalid username or password.";

pub(crate) struct AccountServiceImpl {
    session_ttl_hours: i64,
    account_repository: Box<dyn AccountRepository>,
    session_repository: Box<dyn SessionRepository>,
    member_repository: Box<dyn MemberRepository>,
    events_publisher: Box<dyn EventPublisher>,
}

impl AccountServiceImpl {
    pub(crate) fn new(config: &Configuration,
                      account_repository: Box<dyn AccountRepository>,
                      session_repository: Box<dyn SessionRepository>,
                      member_repository: Box<dyn MemberRepository>,
                      events_publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            session_ttl_hours: config.session_ttl_hours,
            account_repository,
            session_repository,
            member_repository,
            events_publisher,
        }
    }

    async fn open_session(&self, account: &AccountEntity) -> LibraryResult<SessionDto> {
        let session = SessionEntity::new(account.user_id, self.session_ttl_hours);
        self.session_repository.create(&session).await?;
        Ok(SessionDto::from(&session))
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn signup(&self, form: &SignupForm) -> LibraryResult<(AccountDto, SessionDto)> {
        form.validate()?;
        let username = form.username.trim();
        if self.account_repository.find_by_username(username).await?.is_some() {
            return Err(LibraryError::invalid_field("username", "A user with that username already exists."));
        }
        let user_id = self.account_repository.next_user_id().await?;
        let account = AccountEntity::new(user_id, username, form.email.trim(), form.password1.as_str(), form.role)?;
        self.account_repository.create(&account).await?;
        if account.role == Role::User {
            let member = self.member_repository.get_or_create(user_id).await?;
            debug!("registered member {} for {}", member.member_id, account.username);
        }
        let session = self.open_session(&account).await?;
        let dto = AccountDto::from(&account);
        info!("signed up {} as {}", dto.username, dto.role);
        self.events_publisher.publish(&DomainEvent::added(
            "accounts", "accounts", account.account_id.as_str(), &HashMap::new(), &dto)?).await?;
        Ok((dto, session))
    }

    async fn login(&self, form: &LoginForm) -> LibraryResult<(AccountDto, SessionDto)> {
        let account = self.account_repository.find_by_username(form.username.trim()).await?
            .filter(|account| account.verify_password(form.password.as_str()))
            .ok_or_else(|| LibraryError::validation(INVALID_LOGIN, None))?;
        let session = self.open_session(&account).await?;
        Ok((AccountDto::from(&account), session))
    }

    async fn logout(&self, session_id: &str) -> LibraryResult<()> {
        self.session_repository.delete(session_id).await.map(|_| ())
    }

    async fn resolve(&self, session_id: &str) -> LibraryResult<Identity> {
        let session = match self.session_repository.get(session_id).await {
            Ok(session) => session,
            Err(LibraryError::NotFound { .. }) => return Err(LibraryError::unauthenticated("unknown session")),
            Err(err) => return Err(err),
        };
        if session.is_expired() {
            let _ = self.session_repository.delete(session_id).await?;
            return Err(LibraryError::unauthenticated("session expired"));
        }
        match self.account_repository.get(session.user_id.to_string().as_str()).await {
            Ok(account) => Ok(account.identity()),
            Err(LibraryError::NotFound { .. }) => Err(LibraryError::unauthenticated("session without account")),
            Err(err) => Err(err),
        }
    }

    async fn find_accounts(&self) -> LibraryResult<Vec<AccountDto>> {
        let accounts = self.account_repository.find_all().await?;
        Ok(accounts.iter().map(AccountDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use uuid::Uuid;
    use crate::accounts::domain::AccountService;
    use crate::accounts::dto::{LoginForm, SignupForm};
    use crate::accounts::factory;
    use crate::core::domain::Configuration;
    use crate::core::library::{LibraryError, Role};
    use crate::core::repository::RepositoryStore;
    use crate::members::factory::create_member_repository;

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn AccountService>> = AsyncOnce::new(async {
                factory::create_account_service(&Configuration::new("test"), RepositoryStore::InMemory).await
                    .expect("should create account service")
            });
    }

    fn unique_name(prefix: &str) -> String {
        format!("{}_{}", prefix, Uuid::new_v4().simple())
    }

    #[tokio::test]
    async fn test_should_signup_user_with_member() {
        let svc = SUT_SVC.get().await;
        let username = unique_name("reader");
        let (account, session) = svc.signup(&SignupForm::new(username.as_str(), "reader@example.com", "s3cret-pass", Role::User))
            .await.expect("should signup");
        assert_eq!(username, account.username);
        assert_eq!(Role::User, account.role);

        let members = create_member_repository(RepositoryStore::InMemory).await.expect("should create member repository");
        let member = members.find_by_user_id(account.user_id).await.expect("should find member").expect("member should exist");
        assert_eq!(format!("M{:04}", account.user_id), member.member_id);
        assert!(member.active);

        let identity = svc.resolve(session.session_id.as_str()).await.expect("should resolve session");
        assert_eq!(account.user_id, identity.user_id);
        assert!(!identity.is_staff());
    }

    #[tokio::test]
    async fn test_should_signup_staff_without_member() {
        let svc = SUT_SVC.get().await;
        let (account, _) = svc.signup(&SignupForm::new(unique_name("staff").as_str(), "", "s3cret-pass", Role::Staff))
            .await.expect("should signup");
        let members = create_member_repository(RepositoryStore::InMemory).await.expect("should create member repository");
        assert_eq!(None, members.find_by_user_id(account.user_id).await.expect("should query member"));
    }

    #[tokio::test]
    async fn test_should_reject_taken_username() {
        let svc = SUT_SVC.get().await;
        let username = unique_name("taken");
        svc.signup(&SignupForm::new(username.as_str(), "", "s3cret-pass", Role::User)).await.expect("should signup");
        match svc.signup(&SignupForm::new(username.as_str(), "", "other-pass", Role::User)).await {
            Err(LibraryError::Validation { reason_code, .. }) => assert_eq!(Some("username".to_string()), reason_code),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_login_logout() {
        let svc = SUT_SVC.get().await;
        let username = unique_name("login");
        svc.signup(&SignupForm::new(username.as_str(), "", "s3cret-pass", Role::User)).await.expect("should signup");

        let bad = svc.login(&LoginForm { username: username.clone(), password: "wrong-pass".to_string() }).await;
        assert!(matches!(bad, Err(LibraryError::Validation { reason_code: None, .. })));
        let unknown = svc.login(&LoginForm { username: unique_name("nobody"), password: "s3cret-pass".to_string() }).await;
        assert!(matches!(unknown, Err(LibraryError::Validation { reason_code: None, .. })));

        let (account, session) = svc.login(&LoginForm { username: username.clone(), password: "s3cret-pass".to_string() })
            .await.expect("should login");
        assert_eq!(username, account.username);
        assert!(svc.resolve(session.session_id.as_str()).await.is_ok());

        svc.logout(session.session_id.as_str()).await.expect("should logout");
        assert!(matches!(svc.resolve(session.session_id.as_str()).await, Err(LibraryError::Unauthenticated { .. })));
        svc.logout(session.session_id.as_str()).await.expect("logout should be idempotent");
    }

    #[tokio::test]
    async fn test_should_reject_unknown_session() {
        let svc = SUT_SVC.get().await;
        assert!(matches!(svc.resolve("no-such-session").await, Err(LibraryError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn test_should_list_accounts_without_secrets() {
        let svc = SUT_SVC.get().await;
        let username = unique_name("listed");
        svc.signup(&SignupForm::new(username.as_str(), "", "s3cret-pass", Role::User)).await.expect("should signup");
        let accounts = svc.find_accounts().await.expect("should list accounts");
        assert!(accounts.iter().any(|a| a.username == username));
        let json = serde_json::to_string(&accounts).expect("should serialize");
        assert!(!json.contains("password"));
    }
}
