use std::collections::HashMap;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::Cart;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub image: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub image: String,
    pub description: Option<String>,
}

/// Stock level per product as last fetched from the catalog.
///
/// Availability for the cart is always computed against this snapshot, never
/// against the live catalog, so a session sees a stable view until it
/// refreshes or checks out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSnapshot {
    quantities: HashMap<Uuid, i32>,
}

impl StockSnapshot {
    pub fn from_products(products: &[Product]) -> Self {
        Self {
            quantities: products.iter().map(|p| (p.id, p.quantity)).collect(),
        }
    }

    /// Unknown products have no stock.
    pub fn quantity_of(&self, product_id: Uuid) -> i32 {
        self.quantities.get(&product_id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, product_id: Uuid, quantity: i32) {
        self.quantities.insert(product_id, quantity);
    }
}

/// A catalog product as the session sees it: stock minus what is already in
/// the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAvailability {
    pub product: Product,
    pub available: i32,
}

/// Project the cached catalog through the snapshot and cart, keeping only
/// products whose name contains `search` (case-insensitive).
pub fn availability_view(
    products: &[Product],
    snapshot: &StockSnapshot,
    cart: &Cart,
    search: &str,
) -> Vec<ProductAvailability> {
    let needle = search.trim().to_lowercase();
    products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .map(|p| ProductAvailability {
            product: p.clone(),
            available: cart.available(p.id, snapshot),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn product(name: &str, price: &str, quantity: i32) -> Product {
    use std::str::FromStr;

    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        price: BigDecimal::from_str(price).expect("valid decimal"),
        quantity,
        image: format!("https://img.example/{name}.png"),
        description: None,
    }
}
