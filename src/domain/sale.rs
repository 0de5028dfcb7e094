use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::cart::Cart;
use super::product::StockSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct SaleItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

impl SaleItem {
    pub fn amount(&self) -> BigDecimal {
        &self.price * &BigDecimal::from(self.quantity)
    }
}

/// An immutable record of one completed checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub items: Vec<SaleItem>,
    pub total: BigDecimal,
    pub user_id: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Milliseconds since the Unix epoch, as carried on the wire.
    pub fn timestamp(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}

/// A sale that has not been persisted yet, together with the stock levels
/// the session expects once it is.
#[derive(Debug, Clone)]
pub struct CheckoutDraft {
    pub sale: SaleRecord,
    pub expected_levels: Vec<StockLevel>,
}

impl CheckoutDraft {
    /// Build the draft from the session's cart. The id is a UUIDv7 so sales
    /// sort by creation time within a date.
    pub fn from_cart(
        cart: &Cart,
        snapshot: &StockSnapshot,
        user_id: &str,
        user_email: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let items: Vec<SaleItem> = cart
            .lines()
            .iter()
            .map(|l| SaleItem {
                product_id: l.product_id,
                name: l.name.clone(),
                quantity: l.quantity,
                price: l.unit_price.clone(),
            })
            .collect();
        let expected_levels = cart
            .lines()
            .iter()
            .map(|l| StockLevel {
                product_id: l.product_id,
                quantity: snapshot.quantity_of(l.product_id) - l.quantity,
            })
            .collect();

        Self {
            sale: SaleRecord {
                id: Uuid::now_v7(),
                date: now.date_naive(),
                items,
                total: cart.total(),
                user_id: user_id.to_string(),
                user_email: user_email.to_string(),
                created_at: now,
            },
            expected_levels,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// What the sale log returns after a checkout commits.
#[derive(Debug, Clone)]
pub struct CommittedSale {
    pub sale: SaleRecord,
    pub stock_levels: Vec<StockLevel>,
}
