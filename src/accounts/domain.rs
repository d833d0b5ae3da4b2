use async_trait::async_trait;
use crate::accounts::dto::{AccountDto, LoginForm, SessionDto, SignupForm};
use crate::core::domain::Identity;
use crate::core::library::LibraryResult;

pub mod model;
pub mod service;

// AccountService is the identity provider: it owns accounts, their role profiles and the
// sessions that authenticate requests.
#[async_trait]
pub(crate) trait AccountService: Sync + Send {
    // creates the account, its member record for the USER role, and a session
    async fn signup(&self, form: &SignupForm) -> LibraryResult<(AccountDto, SessionDto)>;
    async fn login(&self, form: &LoginForm) -> LibraryResult<(AccountDto, SessionDto)>;
    async fn logout(&self, session_id: &str) -> LibraryResult<()>;
    // resolves a session token to the caller, failing with Unauthenticated
    async fn resolve(&self, session_id: &str) -> LibraryResult<Identity>;
    async fn find_accounts(&self) -> LibraryResult<Vec<AccountDto>>;
}
