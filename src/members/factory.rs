use crate::core::library::LibraryResult;
use crate::core::repository::RepositoryStore;
use crate::members::repository::ddb_member_repository::DDBMemberRepository;
use crate::members::repository::memory_member_repository::MemoryMemberRepository;
use crate::members::repository::MemberRepository;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) const MEMBERS_TABLE: &str = "members";

pub(crate) async fn create_member_repository(store: RepositoryStore) -> LibraryResult<Box<dyn MemberRepository>> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await?;
            Ok(Box::new(DDBMemberRepository::new(client, MEMBERS_TABLE, "member_id", None)))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await?;
            let _ = create_table(&client, MEMBERS_TABLE, "member_id", None, None).await;
            Ok(Box::new(DDBMemberRepository::new(client, MEMBERS_TABLE, "member_id", None)))
        }
        RepositoryStore::InMemory => {
            Ok(Box::new(MemoryMemberRepository::new(MEMBERS_TABLE)))
        }
    }
}
