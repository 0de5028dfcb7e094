use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::cart::Cart;
use super::errors::DomainError;
use super::product::{Product, StockSnapshot};
use super::sale::CommittedSale;

pub const CHECKOUT_NOTICE: &str = "Checkout successful!";

/// Identity handed over by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl UserIdentity {
    /// Display name, falling back to the local part of the e-mail address.
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// Everything one signed-in user holds between requests.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user: UserIdentity,
    pub is_admin: bool,
    pub catalog: Vec<Product>,
    pub snapshot: StockSnapshot,
    pub cart: Cart,
    notice: Option<Notice>,
    checkout_pending: bool,
}

impl Session {
    pub fn new(user: UserIdentity, is_admin: bool, catalog: Vec<Product>) -> Self {
        let snapshot = StockSnapshot::from_products(&catalog);
        Self {
            id: Uuid::new_v4(),
            user,
            is_admin,
            catalog,
            snapshot,
            cart: Cart::default(),
            notice: None,
            checkout_pending: false,
        }
    }

    /// Replace the catalog cache and retake the stock snapshot.
    pub fn refresh_catalog(&mut self, catalog: Vec<Product>) {
        self.snapshot = StockSnapshot::from_products(&catalog);
        self.catalog = catalog;
    }

    pub fn product(&self, product_id: Uuid) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == product_id)
    }

    /// Claim the cart for a checkout. Only one checkout per session may be
    /// in flight; it must end in `complete_checkout` or `abort_checkout`.
    pub fn begin_checkout(&mut self) -> Result<(UserIdentity, Cart, StockSnapshot), DomainError> {
        if self.checkout_pending {
            return Err(DomainError::CheckoutInProgress);
        }
        if self.cart.is_empty() {
            return Err(DomainError::EmptyCart);
        }
        self.checkout_pending = true;
        Ok((self.user.clone(), self.cart.clone(), self.snapshot.clone()))
    }

    /// Release the claim after a failed checkout. The cart is untouched.
    pub fn abort_checkout(&mut self) {
        self.checkout_pending = false;
    }

    pub fn checkout_pending(&self) -> bool {
        self.checkout_pending
    }

    /// Fold a committed checkout back into the session: the snapshot and the
    /// cached catalog take the committed stock, the sold quantities leave the
    /// cart and a notice is raised for `notice_for`. Lines changed while the
    /// commit ran are kept, within the new stock.
    pub fn complete_checkout(
        &mut self,
        committed: &CommittedSale,
        now: DateTime<Utc>,
        notice_for: Duration,
    ) {
        for level in &committed.stock_levels {
            self.snapshot.set(level.product_id, level.quantity);
            if let Some(p) = self.catalog.iter_mut().find(|p| p.id == level.product_id) {
                p.quantity = level.quantity;
            }
        }
        for item in &committed.sale.items {
            self.cart.take(item.product_id, item.quantity);
        }
        self.cart.fit_to(&self.snapshot);
        self.checkout_pending = false;
        self.notice = Some(Notice {
            message: CHECKOUT_NOTICE.to_string(),
            expires_at: now + notice_for,
        });
    }

    pub fn active_notice(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| now < n.expires_at)
    }
}
