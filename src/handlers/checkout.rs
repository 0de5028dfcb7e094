use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::AppState;
use crate::domain::session::Session;
use crate::errors::AppError;

use super::{blocking, NoticeResponse, SaleResponse};

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub sale: SaleResponse,
    pub notice: Option<NoticeResponse>,
    /// Where the receipt for this sale can be downloaded.
    pub receipt_path: String,
}

/// POST /sessions/{id}/checkout
///
/// Commits the cart against current stock in one transaction. On success
/// the session's snapshot takes the committed stock levels, the sold lines
/// leave the cart and a short-lived notice is raised. On failure the cart is
/// left as it was. A second checkout while one is running is refused.
#[utoipa::path(
    post,
    path = "/sessions/{id}/checkout",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 201, description = "Sale recorded", body = CheckoutResponse),
        (status = 404, description = "Session or product not found"),
        (status = 409, description = "Cart is empty, stock ran out or a checkout is already running"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "checkout"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (user, cart, snapshot) = state.sessions.with_session(id, Session::begin_checkout)??;

    let service = state.checkout.clone();
    let committed =
        match blocking(move || service.checkout(&user, &cart, &snapshot, Utc::now())).await {
            Ok(committed) => committed,
            Err(e) => {
                if let Err(gone) = state.sessions.with_session(id, Session::abort_checkout) {
                    log::warn!("checkout on session {} failed and session is gone: {}", id, gone);
                }
                return Err(e);
            }
        };

    let now = Utc::now();
    let notice_for = state.settings.notice_duration;
    let notice = match state.sessions.with_session(id, |s| {
        s.complete_checkout(&committed, now, notice_for);
        s.active_notice(now).map(NoticeResponse::from)
    }) {
        Ok(notice) => notice,
        Err(e) => {
            log::warn!(
                "sale {} committed but session {} is gone: {}",
                committed.sale.id,
                id,
                e
            );
            None
        }
    };

    Ok(HttpResponse::Created().json(CheckoutResponse {
        receipt_path: format!("/sessions/{}/orders/{}/receipt", id, committed.sale.id),
        sale: SaleResponse::from(&committed.sale),
        notice,
    }))
}
