use chrono::NaiveDate;
use uuid::Uuid;

use super::errors::DomainError;
use super::product::{NewProduct, Product};
use super::sale::{CheckoutDraft, CommittedSale, SaleRecord};

pub trait CatalogRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    fn update_quantity(&self, id: Uuid, quantity: i32) -> Result<Product, DomainError>;
}

pub trait SaleRepository: Send + Sync + 'static {
    /// Decrement stock for every line and append the sale in one unit of
    /// work. Either everything is written or nothing is.
    fn commit_checkout(&self, draft: CheckoutDraft) -> Result<CommittedSale, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<SaleRecord>, DomainError>;
    fn list_for_user(&self, user_id: &str) -> Result<Vec<SaleRecord>, DomainError>;
    /// Sales dated within `from..=to`.
    fn list_between(&self, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<SaleRecord>, DomainError>;
}
