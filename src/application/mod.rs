pub mod catalog_service;
pub mod checkout_service;
pub mod report_service;
pub mod session_store;
#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use crate::config::ShopSettings;
use crate::db::DbPool;
use crate::domain::ports::{CatalogRepository, SaleRepository};
use crate::infrastructure::product_repo::DieselCatalogRepository;
use crate::infrastructure::sale_repo::DieselSaleRepository;

use self::catalog_service::CatalogService;
use self::checkout_service::CheckoutService;
use self::report_service::ReportService;
use self::session_store::SessionStore;

/// Shared state behind every request handler.
pub struct AppState {
    pub catalog: CatalogService,
    pub checkout: CheckoutService,
    pub reports: ReportService,
    pub sessions: SessionStore,
    pub settings: ShopSettings,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        sales: Arc<dyn SaleRepository>,
        settings: ShopSettings,
    ) -> Self {
        Self {
            catalog: CatalogService::new(catalog),
            checkout: CheckoutService::new(Arc::clone(&sales)),
            reports: ReportService::new(sales),
            sessions: SessionStore::default(),
            settings,
        }
    }

    pub fn with_pool(pool: DbPool, settings: ShopSettings) -> Self {
        Self::new(
            Arc::new(DieselCatalogRepository::new(pool.clone())),
            Arc::new(DieselSaleRepository::new(pool)),
            settings,
        )
    }
}
