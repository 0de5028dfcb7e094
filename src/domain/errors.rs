use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),
    #[error("Sale not found: {0}")]
    SaleNotFound(Uuid),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: Uuid,
        requested: i32,
        available: i32,
    },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("A checkout is already in progress")]
    CheckoutInProgress,
    #[error("Forbidden")]
    Forbidden,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
