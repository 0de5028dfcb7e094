use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::SaleRepository;
use crate::domain::sale::SaleRecord;
use crate::domain::summary::SalesSummary;

#[derive(Clone)]
pub struct ReportService {
    sales: Arc<dyn SaleRepository>,
}

impl ReportService {
    pub fn new(sales: Arc<dyn SaleRepository>) -> Self {
        Self { sales }
    }

    pub fn summary(&self, from: NaiveDate, to: NaiveDate) -> Result<SalesSummary, DomainError> {
        if from > to {
            return Err(DomainError::InvalidInput(format!(
                "'from' ({}) is after 'to' ({})",
                from, to
            )));
        }
        let sales = self.sales.list_between(from, to)?;
        Ok(SalesSummary::from_sales(&sales))
    }

    pub fn order_history(&self, user_id: &str) -> Result<Vec<SaleRecord>, DomainError> {
        self.sales.list_for_user(user_id)
    }

    /// A sale as seen by `user_id`: owners and admins only.
    pub fn sale_for(
        &self,
        sale_id: Uuid,
        user_id: &str,
        is_admin: bool,
    ) -> Result<SaleRecord, DomainError> {
        let sale = self
            .sales
            .find_by_id(sale_id)?
            .ok_or(DomainError::SaleNotFound(sale_id))?;
        if !is_admin && sale.user_id != user_id {
            return Err(DomainError::Forbidden);
        }
        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::application::checkout_service::CheckoutService;
    use crate::application::test_support::{user, InMemoryShop};
    use crate::domain::cart::Cart;
    use crate::domain::product::StockSnapshot;

    fn sold_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn sell(shop: &InMemoryShop, name: &str, price: &str, qty: i32) -> SaleRecord {
        let p = shop.stock(name, price, qty);
        let snapshot = StockSnapshot::from_products(std::slice::from_ref(&p));
        let mut cart = Cart::default();
        for _ in 0..qty {
            cart.add(&p, &snapshot);
        }
        CheckoutService::new(shop.sales())
            .checkout(&user(), &cart, &snapshot, sold_at())
            .expect("checkout failed")
            .sale
    }

    #[test]
    fn summary_covers_sales_in_range() {
        let shop = InMemoryShop::default();
        sell(&shop, "Tea", "10", 3);
        sell(&shop, "Dosa", "40", 1);
        let day = sold_at().date_naive();
        let reports = ReportService::new(shop.sales());

        let summary = reports.summary(day, day).expect("summary failed");

        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.total, BigDecimal::from(70));
        assert_eq!(summary.rows[0].name, "Dosa");

        let next = day + Duration::days(1);
        let empty = reports.summary(next, next).expect("summary failed");
        assert_eq!(empty.sale_count, 0);
    }

    #[test]
    fn summary_rejects_inverted_range() {
        let shop = InMemoryShop::default();
        let day = sold_at().date_naive();

        let err = ReportService::new(shop.sales())
            .summary(day, day - Duration::days(1))
            .expect_err("should fail");

        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn sale_for_enforces_ownership() {
        let shop = InMemoryShop::default();
        let sale = sell(&shop, "Tea", "10", 1);
        let reports = ReportService::new(shop.sales());

        assert!(reports.sale_for(sale.id, &user().id, false).is_ok());
        assert!(reports.sale_for(sale.id, "someone-else", true).is_ok());
        assert!(matches!(
            reports.sale_for(sale.id, "someone-else", false),
            Err(DomainError::Forbidden)
        ));
        assert!(matches!(
            reports.sale_for(Uuid::new_v4(), &user().id, true),
            Err(DomainError::SaleNotFound(_))
        ));
    }

    #[test]
    fn order_history_lists_users_sales() {
        let shop = InMemoryShop::default();
        sell(&shop, "Tea", "10", 1);
        sell(&shop, "Vada", "15", 2);

        let history = ReportService::new(shop.sales())
            .order_history(&user().id)
            .expect("history failed");

        assert_eq!(history.len(), 2);
        assert!(ReportService::new(shop.sales())
            .order_history("nobody")
            .expect("history failed")
            .is_empty());
    }
}
