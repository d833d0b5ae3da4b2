use std::env;
use lambda_http::{run, Error};
use tracing::info;
use inventory::core::controller::AppState;
use inventory::core::domain::Configuration;
use inventory::core::repository::RepositoryStore;
use inventory::utils::ddb::setup_tracing;
use inventory::web::build_router;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::from_env();
    let store = RepositoryStore::from(env::var("INVENTORY_STORE").unwrap_or_else(|_| "local".to_string()));
    if store != RepositoryStore::DynamoDB {
        env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
    }
    info!("starting inventory for branch {} on {:?}", config.branch_id, store);

    run(build_router(AppState::with_config(config, store))).await
}
