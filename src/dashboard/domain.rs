use async_trait::async_trait;
use crate::core::domain::Identity;
use crate::core::library::LibraryResult;
use crate::dashboard::dto::DashboardDto;

pub mod service;

#[async_trait]
pub(crate) trait DashboardService: Sync + Send {
    // staff only
    async fn overview(&self, identity: &Identity) -> LibraryResult<DashboardDto>;
}
