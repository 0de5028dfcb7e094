pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod sessions;

use actix_web::web;
use chrono::NaiveDate;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::money::format_amount;
use crate::domain::product::ProductAvailability;
use crate::domain::sale::SaleRecord;
use crate::domain::session::Notice;
use crate::errors::AppError;

// ── Shared response DTOs ─────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    /// Decimal price as a string, e.g. "12.50"
    pub price: String,
    /// Stock left for this session after its own cart selections.
    pub available: i32,
    pub image: String,
    pub description: Option<String>,
}

impl From<ProductAvailability> for ProductResponse {
    fn from(view: ProductAvailability) -> Self {
        ProductResponse {
            id: view.product.id,
            name: view.product.name,
            price: format_amount(&view.product.price),
            available: view.available,
            image: view.product.image,
            description: view.product.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: String,
    pub quantity: i32,
    pub amount: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
    pub item_count: i32,
    pub total: String,
    /// False when the requested change was not applied, e.g. no stock left.
    pub changed: bool,
}

impl CartResponse {
    pub fn new(cart: &Cart, changed: bool) -> Self {
        CartResponse {
            lines: cart
                .lines()
                .iter()
                .map(|l| CartLineResponse {
                    product_id: l.product_id,
                    name: l.name.clone(),
                    unit_price: format_amount(&l.unit_price),
                    quantity: l.quantity,
                    amount: format_amount(&l.amount()),
                })
                .collect(),
            item_count: cart.item_count(),
            total: format_amount(&cart.total()),
            changed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleItemResponse {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleResponse {
    pub sale_id: Uuid,
    pub date: NaiveDate,
    pub items: Vec<SaleItemResponse>,
    pub total: String,
    pub user_id: String,
    pub user_email: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl From<&SaleRecord> for SaleResponse {
    fn from(sale: &SaleRecord) -> Self {
        SaleResponse {
            sale_id: sale.id,
            date: sale.date,
            items: sale
                .items
                .iter()
                .map(|i| SaleItemResponse {
                    product_id: i.product_id,
                    name: i.name.clone(),
                    quantity: i.quantity,
                    price: format_amount(&i.price),
                })
                .collect(),
            total: format_amount(&sale.total),
            user_id: sale.user_id.clone(),
            user_email: sale.user_email.clone(),
            timestamp: sale.timestamp(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeResponse {
    pub message: String,
    pub expires_at: String,
}

impl From<&Notice> for NoticeResponse {
    fn from(notice: &Notice) -> Self {
        NoticeResponse {
            message: notice.message.clone(),
            expires_at: notice.expires_at.to_rfc3339(),
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Run repository work on the blocking pool.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??)
}

// ── OpenAPI ──────────────────────────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    paths(
        sessions::open_session,
        sessions::get_session,
        sessions::close_session,
        catalog::list_catalog,
        catalog::refresh_catalog,
        catalog::get_product,
        cart::get_cart,
        cart::add_item,
        cart::increment_item,
        cart::decrement_item,
        cart::remove_item,
        cart::clear_cart,
        checkout::checkout,
        orders::list_orders,
        orders::download_receipt,
        admin::sales_summary,
        admin::create_product,
        admin::set_quantity,
    ),
    components(schemas(
        ProductResponse,
        CartLineResponse,
        CartResponse,
        SaleItemResponse,
        SaleResponse,
        NoticeResponse,
        sessions::OpenSessionRequest,
        sessions::SessionResponse,
        cart::AddToCartRequest,
        checkout::CheckoutResponse,
        admin::SummaryRowResponse,
        admin::SummaryResponse,
        admin::CreateProductRequest,
        admin::SetQuantityRequest,
    )),
    tags(
        (name = "sessions", description = "Sign-in sessions"),
        (name = "catalog", description = "Products and availability"),
        (name = "cart", description = "Cart engine"),
        (name = "checkout", description = "Checkout and stock reconciliation"),
        (name = "orders", description = "Order history and receipts"),
        (name = "admin", description = "Reporting and catalog administration"),
    )
)]
pub struct ApiDoc;
