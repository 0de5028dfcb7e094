use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::product::Product;
use crate::domain::sale::{SaleItem, SaleRecord};
use crate::schema::{canteen_sale_outbox, products, sale_items, sales};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub image: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
            image: row.image,
            description: row.description,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub quantity: i32,
    pub image: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sales)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleRow {
    pub id: Uuid,
    pub sale_date: NaiveDate,
    pub user_id: String,
    pub user_email: String,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
}

impl SaleRow {
    pub fn into_record(self, items: Vec<SaleItemRow>) -> SaleRecord {
        SaleRecord {
            id: self.id,
            date: self.sale_date,
            items: items.into_iter().map(SaleItem::from).collect(),
            total: self.total,
            user_id: self.user_id,
            user_email: self.user_email,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sales)]
pub struct NewSaleRow {
    pub id: Uuid,
    pub sale_date: NaiveDate,
    pub user_id: String,
    pub user_email: String,
    pub total: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = sale_items)]
#[diesel(belongs_to(SaleRow, foreign_key = sale_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleItemRow {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

impl From<SaleItemRow> for SaleItem {
    fn from(row: SaleItemRow) -> Self {
        SaleItem {
            product_id: row.product_id,
            name: row.product_name,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sale_items)]
pub struct NewSaleItemRow {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = canteen_sale_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = canteen_sale_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}
