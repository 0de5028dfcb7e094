use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::domain::product::{NewProduct, Product};

// Column limits of the products table.
const MAX_NAME_CHARS: usize = 255;
const MAX_IMAGE_CHARS: usize = 1024;
const PRICE_LIMIT: i64 = 10_000_000_000;

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list()
    }

    pub fn get(&self, id: Uuid) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::ProductNotFound(id))
    }

    pub fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        if product.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("name must not be empty".to_string()));
        }
        if product.name.chars().count() > MAX_NAME_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "name must be at most {} characters",
                MAX_NAME_CHARS
            )));
        }
        if product.image.chars().count() > MAX_IMAGE_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "image must be at most {} characters",
                MAX_IMAGE_CHARS
            )));
        }
        if product.price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "price must not be negative, got {}",
                product.price
            )));
        }
        if product.price.round(2) >= BigDecimal::from(PRICE_LIMIT) {
            return Err(DomainError::InvalidInput(format!(
                "price must be below {}, got {}",
                PRICE_LIMIT, product.price
            )));
        }
        validate_quantity(product.quantity)?;

        let created = self.repo.create(product)?;
        log::info!("product {} '{}' added with stock {}", created.id, created.name, created.quantity);
        Ok(created)
    }

    pub fn update_quantity(&self, id: Uuid, quantity: i32) -> Result<Product, DomainError> {
        validate_quantity(quantity)?;
        let updated = self.repo.update_quantity(id, quantity)?;
        log::info!("stock for product {} set to {}", id, quantity);
        Ok(updated)
    }
}

fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 0 {
        return Err(DomainError::InvalidInput(format!(
            "quantity must not be negative, got {}",
            quantity
        )));
    }
    Ok(())
}
