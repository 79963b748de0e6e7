use lambda_http::{run, Error};
use tracing::info;
use book_catalog::catalog::controller::routes;
use book_catalog::catalog::factory::create_catalog_service;
use book_catalog::core::controller::AppState;
use book_catalog::core::domain::Configuration;
use book_catalog::utils::ddb::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/images-test.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::from_env();
    if config.is_dev() {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
    }
    info!(env = config.environment.as_str(), store = %config.store, table = config.table_name.as_str(),
        "catalog service starting");

    let state = AppState::new(create_catalog_service(&config).await);
    run(routes(state)).await
}
