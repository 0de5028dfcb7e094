use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::AppState;
use crate::domain::session::{Session, UserIdentity};
use crate::errors::AppError;

use super::{blocking, CartResponse, NoticeResponse};

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Identity as asserted by the authentication provider.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenSessionRequest {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_id: String,
    pub email: String,
    /// Display name, or the local part of the e-mail when there is none.
    pub greeting: String,
    pub is_admin: bool,
    pub cart: CartResponse,
    /// True while a checkout for this session is being committed.
    pub checkout_pending: bool,
    /// Present while the last checkout's success notice is still showing.
    pub notice: Option<NoticeResponse>,
}

impl SessionResponse {
    fn new(session: &Session) -> Self {
        SessionResponse {
            id: session.id,
            user_id: session.user.id.clone(),
            email: session.user.email.clone(),
            greeting: session.user.greeting_name().to_string(),
            is_admin: session.is_admin,
            cart: CartResponse::new(&session.cart, false),
            checkout_pending: session.checkout_pending(),
            notice: session.active_notice(Utc::now()).map(NoticeResponse::from),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /sessions
///
/// Opens a session for an authenticated user and takes the first stock
/// snapshot of the catalog.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = SessionResponse),
        (status = 400, description = "Identity is incomplete"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "sessions"
)]
pub async fn open_session(
    state: web::Data<AppState>,
    body: web::Json<OpenSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if body.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id must not be empty".to_string()));
    }
    if !body.email.contains('@') {
        return Err(AppError::BadRequest(format!(
            "'{}' is not an e-mail address",
            body.email
        )));
    }

    let catalog = state.catalog.clone();
    let products = blocking(move || catalog.list()).await?;

    let is_admin = state.settings.is_admin(&body.email);
    let session = Session::new(
        UserIdentity {
            id: body.user_id,
            email: body.email,
            display_name: body.display_name,
        },
        is_admin,
        products,
    );
    let response = SessionResponse::new(&session);
    let id = state.sessions.insert(session)?;
    log::info!(
        "session {} opened for {} (admin: {})",
        id,
        response.email,
        is_admin
    );

    Ok(HttpResponse::Created().json(response))
}

/// GET /sessions/{id}
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "sessions"
)]
pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .sessions
        .with_session(path.into_inner(), |s| SessionResponse::new(s))?;
    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /sessions/{id}
///
/// Signs out. The cart is discarded with the session.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 204, description = "Signed out"),
        (status = 404, description = "Session not found"),
    ),
    tag = "sessions"
)]
pub async fn close_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let session = state.sessions.remove(id).map_err(|e| {
        log::warn!("sign-out of session {} failed: {}", id, e);
        AppError::from(e)
    })?;
    log::info!("session {} closed for {}", id, session.user.email);
    Ok(HttpResponse::NoContent().finish())
}
