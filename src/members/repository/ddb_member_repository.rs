use std::collections::HashMap;
use async_trait::async_trait;
use crate::core::library::LibraryResult;
use crate::members::domain::model::MemberEntity;
use crate::members::repository::MemberRepository;
use crate::utils::ddb_repository::DDBRepository;

pub(crate) type DDBMemberRepository = DDBRepository<MemberEntity>;

#[async_trait]
impl MemberRepository for DDBRepository<MemberEntity> {
    async fn find_all(&self) -> LibraryResult<Vec<MemberEntity>> {
        let mut members = self.scan_all(&HashMap::new()).await?;
        members.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(members)
    }
}
