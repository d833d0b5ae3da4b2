pub mod ddb_member_repository;
pub mod memory_member_repository;

use async_trait::async_trait;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;
use crate::members::domain::model::{MemberEntity, membership_id};

#[async_trait]
pub(crate) trait MemberRepository: Repository<MemberEntity> {
    async fn find_by_user_id(&self, user_id: i64) -> LibraryResult<Option<MemberEntity>> {
        match self.get(membership_id(user_id).as_str()).await {
            Ok(member) => Ok(Some(member)),
            Err(LibraryError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    // returns the member of the account, creating an active one the first time
    async fn get_or_create(&self, user_id: i64) -> LibraryResult<MemberEntity> {
        if let Some(member) = self.find_by_user_id(user_id).await? {
            return Ok(member);
        }
        let member = MemberEntity::new(user_id);
        match self.create(&member).await {
            Ok(_) => Ok(member),
            // lost the race against another first request of the same account
            Err(LibraryError::DuplicateKey { .. }) => self.get(member.member_id.as_str()).await,
            Err(err) => Err(err),
        }
    }

    async fn find_all(&self) -> LibraryResult<Vec<MemberEntity>>;
}
