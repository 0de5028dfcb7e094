use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::SessionNotFound
            | DomainError::ProductNotFound(_)
            | DomainError::SaleNotFound(_) => AppError::NotFound(e.to_string()),
            DomainError::InsufficientStock { .. }
            | DomainError::EmptyCart
            | DomainError::CheckoutInProgress => AppError::Conflict(e.to_string()),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Internal(msg) => {
                log::error!("request failed: {}", msg);
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use uuid::Uuid;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Session not found".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn domain_not_found_kinds_map_to_app_not_found() {
        let id = Uuid::new_v4();
        let app_err: AppError = DomainError::ProductNotFound(id).into();
        assert!(matches!(app_err, AppError::NotFound(ref m) if m.contains(&id.to_string())));
        let app_err: AppError = DomainError::SessionNotFound.into();
        assert!(matches!(app_err, AppError::NotFound(_)));
    }

    #[test]
    fn domain_insufficient_stock_maps_to_conflict() {
        let app_err: AppError = DomainError::InsufficientStock {
            product_id: Uuid::new_v4(),
            requested: 3,
            available: 1,
        }
        .into();
        assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_empty_cart_maps_to_conflict() {
        let app_err: AppError = DomainError::EmptyCart.into();
        assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
        assert_eq!(app_err.to_string(), "Cart is empty");
        let app_err: AppError = DomainError::CheckoutInProgress.into();
        assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_forbidden_maps_to_403() {
        let app_err: AppError = DomainError::Forbidden.into();
        assert_eq!(app_err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn domain_invalid_input_maps_to_bad_request() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(ref m) if m == "bad value"));
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
