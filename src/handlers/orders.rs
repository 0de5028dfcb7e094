use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::application::AppState;
use crate::domain::receipt::Receipt;
use crate::errors::AppError;

use super::{blocking, SaleResponse};

/// GET /sessions/{id}/orders
///
/// The signed-in user's past sales, newest first.
#[utoipa::path(
    get,
    path = "/sessions/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Order history", body = Vec<SaleResponse>),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = state
        .sessions
        .with_session(path.into_inner(), |s| s.user.id.clone())?;

    let reports = state.reports.clone();
    let sales = blocking(move || reports.order_history(&user_id)).await?;

    Ok(HttpResponse::Ok().json(sales.iter().map(SaleResponse::from).collect::<Vec<_>>()))
}

/// GET /sessions/{id}/orders/{sale_id}/receipt
///
/// Plain-text receipt as an attachment. Admins may fetch any sale's receipt.
#[utoipa::path(
    get,
    path = "/sessions/{id}/orders/{sale_id}/receipt",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
        ("sale_id" = Uuid, Path, description = "Sale UUID"),
    ),
    responses(
        (status = 200, description = "Receipt text", content_type = "text/plain", body = String),
        (status = 403, description = "Sale belongs to another user"),
        (status = 404, description = "Session or sale not found"),
    ),
    tag = "orders"
)]
pub async fn download_receipt(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (id, sale_id) = path.into_inner();
    let (user, is_admin) = state
        .sessions
        .with_session(id, |s| (s.user.clone(), s.is_admin))?;

    let reports = state.reports.clone();
    let user_id = user.id.clone();
    let sale = blocking(move || reports.sale_for(sale_id, &user_id, is_admin)).await?;

    let customer = if sale.user_id == user.id {
        user.greeting_name().to_string()
    } else {
        sale.user_email.clone()
    };
    let receipt = Receipt::new(&sale, customer, &state.settings.currency_symbol);
    let body = receipt
        .render()
        .map_err(|e| AppError::Internal(format!("receipt for {}: {}", sale_id, e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(receipt.file_name())],
        })
        .body(body))
}
