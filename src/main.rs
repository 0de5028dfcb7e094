use std::error::Error;

use actix_web::web;
use canteen_service::{build_server, create_pool, run_migrations, AppConfig, AppState};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    let state = web::Data::new(AppState::with_pool(pool, config.shop));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}
