pub mod cart;
pub mod errors;
pub mod money;
pub mod ports;
pub mod product;
pub mod receipt;
pub mod sale;
pub mod session;
pub mod summary;
