use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ports::SaleRepository;
use crate::domain::product::StockSnapshot;
use crate::domain::sale::{CheckoutDraft, CommittedSale};
use crate::domain::session::UserIdentity;

#[derive(Clone)]
pub struct CheckoutService {
    sales: Arc<dyn SaleRepository>,
}

impl CheckoutService {
    pub fn new(sales: Arc<dyn SaleRepository>) -> Self {
        Self { sales }
    }

    /// Commit the cart: stock decrements and the sale record are written as
    /// one unit. The caller owns the session and is expected to fold the
    /// result back into it only on success.
    pub fn checkout(
        &self,
        user: &UserIdentity,
        cart: &Cart,
        snapshot: &StockSnapshot,
        now: DateTime<Utc>,
    ) -> Result<CommittedSale, DomainError> {
        if cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let draft = CheckoutDraft::from_cart(cart, snapshot, &user.id, &user.email, now);
        let sale_id = draft.sale.id;
        for level in &draft.expected_levels {
            log::debug!(
                "sale {}: product {} expected to drop to {}",
                sale_id,
                level.product_id,
                level.quantity
            );
        }
        let expected = draft.expected_levels.clone();

        let committed = self.sales.commit_checkout(draft).map_err(|e| {
            log::warn!("checkout {} for user {} failed: {}", sale_id, user.id, e);
            e
        })?;

        for (want, got) in expected.iter().zip(&committed.stock_levels) {
            if want != got {
                log::debug!(
                    "product {} moved since snapshot: expected {}, now {}",
                    got.product_id,
                    want.quantity,
                    got.quantity
                );
            }
        }
        log::info!(
            "sale {} recorded for {}: {} line(s), total {}",
            committed.sale.id,
            committed.sale.user_email,
            committed.sale.items.len(),
            committed.sale.total
        );
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::application::test_support::{user, InMemoryShop};
    use crate::domain::ports::SaleRepository;
    use crate::domain::sale::StockLevel;

    #[test]
    fn checkout_decrements_stock_and_records_sale() {
        let shop = InMemoryShop::default();
        let a = shop.stock("A", "10", 5);
        let snapshot = StockSnapshot::from_products(std::slice::from_ref(&a));
        let mut cart = Cart::default();
        cart.add(&a, &snapshot);
        cart.add(&a, &snapshot);
        let service = CheckoutService::new(shop.sales());

        let committed = service
            .checkout(&user(), &cart, &snapshot, Utc::now())
            .expect("checkout failed");

        assert_eq!(
            committed.stock_levels,
            vec![StockLevel {
                product_id: a.id,
                quantity: 3
            }]
        );
        assert_eq!(committed.sale.items.len(), 1);
        assert_eq!(committed.sale.items[0].product_id, a.id);
        assert_eq!(committed.sale.items[0].quantity, 2);
        assert_eq!(committed.sale.total, BigDecimal::from(20));
        assert_eq!(shop.quantity_of(a.id), Some(3));
        assert_eq!(
            shop.sales()
                .list_for_user(&user().id)
                .expect("list failed")
                .len(),
            1
        );
    }

    #[test]
    fn empty_cart_is_rejected() {
        let shop = InMemoryShop::default();
        let service = CheckoutService::new(shop.sales());

        let err = service
            .checkout(&user(), &Cart::default(), &StockSnapshot::default(), Utc::now())
            .expect_err("should fail");

        assert!(matches!(err, DomainError::EmptyCart));
    }

    #[test]
    fn stale_snapshot_cannot_oversell() {
        let shop = InMemoryShop::default();
        let a = shop.stock("A", "10", 2);
        let snapshot = StockSnapshot::from_products(std::slice::from_ref(&a));
        let service = CheckoutService::new(shop.sales());

        let mut first = Cart::default();
        first.add(&a, &snapshot);
        first.add(&a, &snapshot);
        let mut second = Cart::default();
        second.add(&a, &snapshot);

        service
            .checkout(&user(), &first, &snapshot, Utc::now())
            .expect("first checkout failed");
        let err = service
            .checkout(&user(), &second, &snapshot, Utc::now())
            .expect_err("second checkout should fail");

        assert!(matches!(
            err,
            DomainError::InsufficientStock {
                requested: 1,
                available: 0,
                ..
            }
        ));
        assert_eq!(shop.quantity_of(a.id), Some(0));
        assert_eq!(
            shop.sales()
                .list_for_user(&user().id)
                .expect("list failed")
                .len(),
            1
        );
    }

    #[test]
    fn storage_failure_is_returned_to_caller() {
        let shop = InMemoryShop::default();
        let a = shop.stock("A", "10", 5);
        let snapshot = StockSnapshot::from_products(std::slice::from_ref(&a));
        let mut cart = Cart::default();
        cart.add(&a, &snapshot);
        shop.fail_writes();

        let err = CheckoutService::new(shop.sales())
            .checkout(&user(), &cart, &snapshot, Utc::now())
            .expect_err("should fail");

        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(shop.quantity_of(a.id), Some(5));
    }
}
