use async_trait::async_trait;
use crate::core::command::{Command, CommandError};
use crate::core::domain::Identity;
use crate::dashboard::domain::DashboardService;
use crate::dashboard::dto::DashboardDto;

pub(crate) struct StaffDashboardCommand {
    dashboard_service: Box<dyn DashboardService>,
}

impl StaffDashboardCommand {
    pub(crate) fn new(dashboard_service: Box<dyn DashboardService>) -> Self {
        Self {
            dashboard_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct StaffDashboardCommandRequest {
    pub(crate) identity: Identity,
}

#[async_trait]
impl Command<StaffDashboardCommandRequest, DashboardDto> for StaffDashboardCommand {
    async fn execute(&self, req: StaffDashboardCommandRequest) -> Result<DashboardDto, CommandError> {
        self.dashboard_service.overview(&req.identity).await.map_err(CommandError::from)
    }
}
