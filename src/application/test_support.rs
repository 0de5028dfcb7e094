//! In-memory stand-ins for the repositories, sharing one stock table so
//! checkouts are visible through the catalog.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogRepository, SaleRepository};
use crate::domain::product::{NewProduct, Product};
use crate::domain::sale::{CheckoutDraft, CommittedSale, SaleRecord, StockLevel};
use crate::domain::session::UserIdentity;

pub fn user() -> UserIdentity {
    UserIdentity {
        id: "uid-asha".to_string(),
        email: "asha@canteen.local".to_string(),
        display_name: Some("Asha".to_string()),
    }
}

#[derive(Default)]
struct ShopState {
    products: Mutex<Vec<Product>>,
    sales: Mutex<Vec<SaleRecord>>,
    fail_writes: AtomicBool,
}

impl ShopState {
    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Internal("storage unavailable".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryShop {
    state: Arc<ShopState>,
}

impl InMemoryShop {
    pub fn catalog(&self) -> Arc<dyn CatalogRepository> {
        Arc::new(InMemoryCatalog {
            state: Arc::clone(&self.state),
        })
    }

    pub fn sales(&self) -> Arc<dyn SaleRepository> {
        Arc::new(InMemorySales {
            state: Arc::clone(&self.state),
        })
    }

    pub fn stock(&self, name: &str, price: &str, quantity: i32) -> Product {
        self.catalog()
            .create(NewProduct {
                name: name.to_string(),
                price: BigDecimal::from_str(price).expect("valid decimal"),
                quantity,
                image: String::new(),
                description: None,
            })
            .expect("in-memory create")
    }

    pub fn quantity_of(&self, id: Uuid) -> Option<i32> {
        self.state
            .products
            .lock()
            .expect("lock")
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.quantity)
    }

    pub fn fail_writes(&self) {
        self.state.fail_writes.store(true, Ordering::SeqCst);
    }
}

struct InMemoryCatalog {
    state: Arc<ShopState>,
}

impl CatalogRepository for InMemoryCatalog {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut products = self.state.products.lock().expect("lock").clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self
            .state
            .products
            .lock()
            .expect("lock")
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        self.state.check_writable()?;
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            image: product.image,
            description: product.description,
        };
        self.state
            .products
            .lock()
            .expect("lock")
            .push(created.clone());
        Ok(created)
    }

    fn update_quantity(&self, id: Uuid, quantity: i32) -> Result<Product, DomainError> {
        self.state.check_writable()?;
        let mut products = self.state.products.lock().expect("lock");
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::ProductNotFound(id))?;
        product.quantity = quantity;
        Ok(product.clone())
    }
}

struct InMemorySales {
    state: Arc<ShopState>,
}

impl SaleRepository for InMemorySales {
    fn commit_checkout(&self, draft: CheckoutDraft) -> Result<CommittedSale, DomainError> {
        self.state.check_writable()?;
        let mut products = self.state.products.lock().expect("lock");

        for item in &draft.sale.items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(DomainError::ProductNotFound(item.product_id))?;
            if product.quantity < item.quantity {
                return Err(DomainError::InsufficientStock {
                    product_id: item.product_id,
                    requested: item.quantity,
                    available: product.quantity,
                });
            }
        }

        let mut stock_levels = Vec::new();
        for item in &draft.sale.items {
            if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
                product.quantity -= item.quantity;
                stock_levels.push(StockLevel {
                    product_id: product.id,
                    quantity: product.quantity,
                });
            }
        }

        self.state
            .sales
            .lock()
            .expect("lock")
            .push(draft.sale.clone());
        Ok(CommittedSale {
            sale: draft.sale,
            stock_levels,
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<SaleRecord>, DomainError> {
        Ok(self
            .state
            .sales
            .lock()
            .expect("lock")
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<SaleRecord>, DomainError> {
        let mut sales: Vec<SaleRecord> = self
            .state
            .sales
            .lock()
            .expect("lock")
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }

    fn list_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SaleRecord>, DomainError> {
        Ok(self
            .state
            .sales
            .lock()
            .expect("lock")
            .iter()
            .filter(|s| s.date >= from && s.date <= to)
            .cloned()
            .collect())
    }
}
