pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::error::Error;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::AppState;
pub use config::{AppConfig, ShopSettings};
pub use db::{create_pool, DbPool};

use handlers::{admin, cart, catalog, checkout, orders, sessions};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("applied migration {}", version);
    }
    Ok(())
}

/// Register every API route. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .route("", web::post().to(sessions::open_session))
            .route("/{id}", web::get().to(sessions::get_session))
            .route("/{id}", web::delete().to(sessions::close_session))
            .route("/{id}/catalog", web::get().to(catalog::list_catalog))
            .route("/{id}/catalog/refresh", web::post().to(catalog::refresh_catalog))
            .route("/{id}/catalog/{product_id}", web::get().to(catalog::get_product))
            .route("/{id}/cart", web::get().to(cart::get_cart))
            .route("/{id}/cart", web::delete().to(cart::clear_cart))
            .route("/{id}/cart/items", web::post().to(cart::add_item))
            .route(
                "/{id}/cart/items/{product_id}/increment",
                web::post().to(cart::increment_item),
            )
            .route(
                "/{id}/cart/items/{product_id}/decrement",
                web::post().to(cart::decrement_item),
            )
            .route(
                "/{id}/cart/items/{product_id}",
                web::delete().to(cart::remove_item),
            )
            .route("/{id}/checkout", web::post().to(checkout::checkout))
            .route("/{id}/orders", web::get().to(orders::list_orders))
            .route(
                "/{id}/orders/{sale_id}/receipt",
                web::get().to(orders::download_receipt),
            )
            .route("/{id}/admin/summary", web::get().to(admin::sales_summary))
            .route("/{id}/admin/products", web::post().to(admin::create_product))
            .route(
                "/{id}/admin/products/{product_id}/quantity",
                web::put().to(admin::set_quantity),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = handlers::ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
