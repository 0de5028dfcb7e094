use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::json;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::SaleRepository;
use crate::domain::sale::{CheckoutDraft, CommittedSale, SaleRecord, StockLevel};
use crate::schema::{canteen_sale_outbox, products, sale_items, sales};

use super::models::{NewOutboxEventRow, NewSaleItemRow, NewSaleRow, SaleItemRow, SaleRow};

pub struct DieselSaleRepository {
    pool: DbPool,
}

impl DieselSaleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Explain why a guarded decrement matched no row.
fn shortfall(conn: &mut PgConnection, product_id: Uuid, requested: i32) -> DomainError {
    let available = products::table
        .filter(products::id.eq(product_id))
        .select(products::quantity)
        .first::<i32>(conn)
        .optional();
    match available {
        Ok(Some(available)) => DomainError::InsufficientStock {
            product_id,
            requested,
            available,
        },
        Ok(None) => DomainError::ProductNotFound(product_id),
        Err(e) => e.into(),
    }
}

fn attach_items(
    conn: &mut PgConnection,
    rows: Vec<SaleRow>,
) -> Result<Vec<SaleRecord>, DomainError> {
    let items = SaleItemRow::belonging_to(&rows)
        .select(SaleItemRow::as_select())
        .load(conn)?
        .grouped_by(&rows);

    Ok(rows
        .into_iter()
        .zip(items)
        .map(|(sale, items)| sale.into_record(items))
        .collect())
}

impl SaleRepository for DieselSaleRepository {
    fn commit_checkout(&self, draft: CheckoutDraft) -> Result<CommittedSale, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let sale = draft.sale;

            // 1. Decrement stock, refusing to go below zero. A concurrent
            //    checkout that got there first makes the guard fail and the
            //    whole transaction roll back.
            let mut stock_levels = Vec::with_capacity(sale.items.len());
            for item in &sale.items {
                let remaining = diesel::update(
                    products::table
                        .filter(products::id.eq(item.product_id))
                        .filter(products::quantity.ge(item.quantity)),
                )
                .set((
                    products::quantity.eq(products::quantity - item.quantity),
                    products::updated_at.eq(sale.created_at),
                ))
                .returning(products::quantity)
                .get_result::<i32>(conn)
                .optional()?;

                let Some(quantity) = remaining else {
                    return Err(shortfall(conn, item.product_id, item.quantity));
                };
                stock_levels.push(StockLevel {
                    product_id: item.product_id,
                    quantity,
                });
            }

            // 2. Append the sale and its items
            diesel::insert_into(sales::table)
                .values(&NewSaleRow {
                    id: sale.id,
                    sale_date: sale.date,
                    user_id: sale.user_id.clone(),
                    user_email: sale.user_email.clone(),
                    total: sale.total.clone(),
                    created_at: sale.created_at,
                })
                .execute(conn)?;

            let new_items: Vec<NewSaleItemRow> = sale
                .items
                .iter()
                .map(|i| NewSaleItemRow {
                    id: Uuid::new_v4(),
                    sale_id: sale.id,
                    product_id: i.product_id,
                    product_name: i.name.clone(),
                    quantity: i.quantity,
                    price: i.price.clone(),
                })
                .collect();
            diesel::insert_into(sale_items::table)
                .values(&new_items)
                .execute(conn)?;

            // 3. Outbox event in the same transaction, for consumers of
            //    recorded sales.
            let item_payloads: Vec<serde_json::Value> = sale
                .items
                .iter()
                .map(|i| {
                    json!({
                        "product_id": i.product_id,
                        "quantity": i.quantity,
                        "price": i.price.to_string()
                    })
                })
                .collect();

            diesel::insert_into(canteen_sale_outbox::table)
                .values(&NewOutboxEventRow {
                    id: Uuid::new_v4(),
                    aggregate_type: "Sale".to_string(),
                    aggregate_id: sale.id.to_string(),
                    event_type: "SaleRecorded".to_string(),
                    payload: json!({
                        "sale_id": sale.id,
                        "date": sale.date.to_string(),
                        "user_id": sale.user_id,
                        "user_email": sale.user_email,
                        "total": sale.total.to_string(),
                        "timestamp": sale.timestamp(),
                        "items": item_payloads
                    }),
                })
                .execute(conn)?;

            Ok(CommittedSale { sale, stock_levels })
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<SaleRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let sale = sales::table
            .filter(sales::id.eq(id))
            .select(SaleRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(sale) = sale else {
            return Ok(None);
        };

        let items = SaleItemRow::belonging_to(&sale)
            .select(SaleItemRow::as_select())
            .load(&mut conn)?;

        Ok(Some(sale.into_record(items)))
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<SaleRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = sales::table
            .filter(sales::user_id.eq(user_id))
            .select(SaleRow::as_select())
            .order(sales::created_at.desc())
            .load(&mut conn)?;

        attach_items(&mut conn, rows)
    }

    fn list_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SaleRecord>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = sales::table
            .filter(sales::sale_date.between(from, to))
            .select(SaleRow::as_select())
            .order(sales::created_at.desc())
            .load(&mut conn)?;

        attach_items(&mut conn, rows)
    }
}
