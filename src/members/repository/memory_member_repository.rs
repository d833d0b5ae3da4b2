use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;
use crate::utils::memory::MemoryRepository;

pub(crate) type MemoryMemberRepository = MemoryRepository<MemberEntity>;

#[async_trait]
impl MemberRepository for MemoryRepository<MemberEntity> {
    async fn find_all(&self) -> LibraryResult<Vec<MemberEntity>> {
        self.scan()
    }
}
