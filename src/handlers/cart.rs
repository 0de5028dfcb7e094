use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::AppState;
use crate::domain::errors::DomainError;
use crate::domain::session::Session;
use crate::errors::AppError;

use super::CartResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

/// Apply `op` to the session's cart and render the result.
fn update_cart(
    state: &AppState,
    id: Uuid,
    op: impl FnOnce(&mut Session) -> Result<bool, DomainError>,
) -> Result<HttpResponse, AppError> {
    let cart = state.sessions.with_session(id, |s| {
        let changed = op(s)?;
        Ok::<_, DomainError>(CartResponse::new(&s.cart, changed))
    })??;
    Ok(HttpResponse::Ok().json(cart))
}

/// GET /sessions/{id}/cart
#[utoipa::path(
    get,
    path = "/sessions/{id}/cart",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Cart lines and total", body = CartResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    update_cart(&state, path.into_inner(), |_| Ok(false))
}

/// POST /sessions/{id}/cart/items
///
/// Adds one unit of a product. Ignored when the session has no stock left
/// for it; `changed` is false in that case.
#[utoipa::path(
    post,
    path = "/sessions/{id}/cart/items",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Session or product not found"),
    ),
    tag = "cart"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = body.into_inner().product_id;
    update_cart(&state, path.into_inner(), |s| {
        let product = s
            .product(product_id)
            .cloned()
            .ok_or(DomainError::ProductNotFound(product_id))?;
        Ok(s.cart.add(&product, &s.snapshot))
    })
}

/// POST /sessions/{id}/cart/items/{product_id}/increment
///
/// Ignored when the session has no stock left for the product.
#[utoipa::path(
    post,
    path = "/sessions/{id}/cart/items/{product_id}/increment",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "cart"
)]
pub async fn increment_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (id, product_id) = path.into_inner();
    update_cart(&state, id, |s| Ok(s.cart.increment(product_id, &s.snapshot)))
}

/// POST /sessions/{id}/cart/items/{product_id}/decrement
///
/// Never takes a line below one; use DELETE to drop it.
#[utoipa::path(
    post,
    path = "/sessions/{id}/cart/items/{product_id}/decrement",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "cart"
)]
pub async fn decrement_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (id, product_id) = path.into_inner();
    update_cart(&state, id, |s| Ok(s.cart.decrement(product_id)))
}

/// DELETE /sessions/{id}/cart/items/{product_id}
#[utoipa::path(
    delete,
    path = "/sessions/{id}/cart/items/{product_id}",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (id, product_id) = path.into_inner();
    update_cart(&state, id, |s| Ok(s.cart.remove(product_id)))
}

/// DELETE /sessions/{id}/cart
#[utoipa::path(
    delete,
    path = "/sessions/{id}/cart",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Emptied cart", body = CartResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    update_cart(&state, path.into_inner(), |s| {
        let changed = !s.cart.is_empty();
        s.cart.clear();
        Ok(changed)
    })
}
