use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::AppState;
use crate::domain::errors::DomainError;
use crate::domain::product::{availability_view, ProductAvailability};
use crate::errors::AppError;

use super::{blocking, ProductResponse};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub search: String,
}

/// GET /sessions/{id}/catalog
///
/// The cached catalog with each product's stock reduced by the session's
/// cart, optionally narrowed by a case-insensitive name search.
#[utoipa::path(
    get,
    path = "/sessions/{id}/catalog",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        ("search" = Option<String>, Query, description = "Case-insensitive name filter"),
    ),
    responses(
        (status = 200, description = "Products with availability", body = Vec<ProductResponse>),
        (status = 404, description = "Session not found"),
    ),
    tag = "catalog"
)]
pub async fn list_catalog(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse, AppError> {
    let search = query.into_inner().search;
    let products = state.sessions.with_session(path.into_inner(), |s| {
        to_responses(availability_view(&s.catalog, &s.snapshot, &s.cart, &search))
    })?;
    Ok(HttpResponse::Ok().json(products))
}

/// POST /sessions/{id}/catalog/refresh
///
/// Reloads the catalog and retakes the stock snapshot. Cart lines are kept.
#[utoipa::path(
    post,
    path = "/sessions/{id}/catalog/refresh",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Refreshed products", body = Vec<ProductResponse>),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn refresh_catalog(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    // Fail fast before hitting the database.
    state.sessions.with_session(id, |_| ())?;

    let catalog = state.catalog.clone();
    let fresh = blocking(move || catalog.list()).await?;

    let products = state.sessions.with_session(id, |s| {
        s.refresh_catalog(fresh);
        to_responses(availability_view(&s.catalog, &s.snapshot, &s.cart, ""))
    })?;
    Ok(HttpResponse::Ok().json(products))
}

/// GET /sessions/{id}/catalog/{product_id}
#[utoipa::path(
    get,
    path = "/sessions/{id}/catalog/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product detail", body = ProductResponse),
        (status = 404, description = "Session or product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (id, product_id) = path.into_inner();
    let product = state.sessions.with_session(id, |s| {
        s.product(product_id)
            .map(|p| ProductAvailability {
                product: p.clone(),
                available: s.cart.available(product_id, &s.snapshot),
            })
            .ok_or(DomainError::ProductNotFound(product_id))
    })??;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

fn to_responses(view: Vec<ProductAvailability>) -> Vec<ProductResponse> {
    view.into_iter().map(ProductResponse::from).collect()
}
