use axum::{
    extract::State,
    response::Json,
};
use crate::core::command::Command;
use crate::core::controller::{AppState, ServerError};
use crate::core::domain::Identity;
use crate::dashboard::command::staff_dashboard_cmd::{StaffDashboardCommand, StaffDashboardCommandRequest};
use crate::dashboard::domain::DashboardService;
use crate::dashboard::dto::DashboardDto;
use crate::dashboard::factory;

async fn build_service(state: &AppState) -> Result<Box<dyn DashboardService>, ServerError> {
    Ok(factory::create_dashboard_service(&state.config, state.store).await?)
}

pub(crate) async fn staff_dashboard(
    State(state): State<AppState>,
    identity: Identity) -> Result<Json<DashboardDto>, ServerError> {
    let svc = build_service(&state).await?;
    let res = StaffDashboardCommand::new(svc).execute(StaffDashboardCommandRequest { identity }).await?;
    Ok(Json(res))
}
