use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::AppState;
use crate::domain::money::format_amount;
use crate::domain::product::{NewProduct, Product, ProductAvailability};
use crate::domain::summary::SalesSummary;
use crate::errors::AppError;

use super::{blocking, ProductResponse};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// First day included; defaults to today.
    pub from: Option<NaiveDate>,
    /// Last day included; defaults to today.
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryRowResponse {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub value: String,
    /// Share of the period's revenue, two decimals.
    pub percentage: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rows: Vec<SummaryRowResponse>,
    pub total: String,
    pub sale_count: usize,
}

impl SummaryResponse {
    fn new(from: NaiveDate, to: NaiveDate, summary: SalesSummary) -> Self {
        SummaryResponse {
            from,
            to,
            rows: summary
                .rows
                .into_iter()
                .map(|r| SummaryRowResponse {
                    product_id: r.product_id,
                    name: r.name,
                    quantity: r.quantity,
                    value: format_amount(&r.value),
                    percentage: format_amount(&r.percentage),
                })
                .collect(),
            total: format_amount(&summary.total),
            sale_count: summary.sale_count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "12.50"
    pub price: String,
    pub quantity: i32,
    pub image: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

fn require_admin(state: &AppState, id: Uuid) -> Result<(), AppError> {
    let (is_admin, email) = state
        .sessions
        .with_session(id, |s| (s.is_admin, s.user.email.clone()))?;
    if !is_admin {
        log::warn!("{} tried an admin action from session {}", email, id);
        return Err(AppError::Forbidden);
    }
    Ok(())
}

fn stock_view(product: Product) -> ProductResponse {
    let available = product.quantity;
    ProductResponse::from(ProductAvailability { product, available })
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /sessions/{id}/admin/summary
///
/// Revenue per product for the sales dated within `[from, to]`.
#[utoipa::path(
    get,
    path = "/sessions/{id}/admin/summary",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        SummaryQuery,
    ),
    responses(
        (status = 200, description = "Sales summary", body = SummaryResponse),
        (status = 400, description = "'from' is after 'to'"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Session not found"),
    ),
    tag = "admin"
)]
pub async fn sales_summary(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, path.into_inner())?;

    let today = Utc::now().date_naive();
    let query = query.into_inner();
    let from = query.from.unwrap_or(today);
    let to = query.to.unwrap_or(today);

    let reports = state.reports.clone();
    let summary = blocking(move || reports.summary(from, to)).await?;

    Ok(HttpResponse::Ok().json(SummaryResponse::new(from, to, summary)))
}

/// POST /sessions/{id}/admin/products
#[utoipa::path(
    post,
    path = "/sessions/{id}/admin/products",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid request body"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Session not found"),
    ),
    tag = "admin"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&state, path.into_inner())?;

    let body = body.into_inner();
    let price = BigDecimal::from_str(&body.price)
        .map_err(|_| AppError::BadRequest(format!("Invalid price: {}", body.price)))?;
    let product = NewProduct {
        name: body.name,
        price,
        quantity: body.quantity,
        image: body.image.unwrap_or_default(),
        description: body.description,
    };

    let catalog = state.catalog.clone();
    let created = blocking(move || catalog.create(product)).await?;

    Ok(HttpResponse::Created().json(stock_view(created)))
}

/// PUT /sessions/{id}/admin/products/{product_id}/quantity
///
/// Sets the stock level outright, e.g. after a delivery.
#[utoipa::path(
    put,
    path = "/sessions/{id}/admin/products/{product_id}/quantity",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Stock updated", body = ProductResponse),
        (status = 400, description = "Negative quantity"),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Session or product not found"),
    ),
    tag = "admin"
)]
pub async fn set_quantity(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<SetQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let (id, product_id) = path.into_inner();
    require_admin(&state, id)?;

    let quantity = body.into_inner().quantity;
    let catalog = state.catalog.clone();
    let updated = blocking(move || catalog.update_quantity(product_id, quantity)).await?;

    Ok(HttpResponse::Ok().json(stock_view(updated)))
}
