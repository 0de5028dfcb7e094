use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::product::{Product, StockSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

impl CartLine {
    pub fn amount(&self) -> BigDecimal {
        &self.unit_price * &BigDecimal::from(self.quantity)
    }
}

/// Lines selected by one session.
///
/// Every increase goes through the same ceiling: a line may only grow while
/// `snapshot[id] - quantity > 0`. Operations that would break a rule are
/// no-ops and report `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> i32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn quantity_of(&self, product_id: Uuid) -> i32 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    /// Stock left for this session after its own selections, never negative.
    pub fn available(&self, product_id: Uuid, snapshot: &StockSnapshot) -> i32 {
        (snapshot.quantity_of(product_id) - self.quantity_of(product_id)).max(0)
    }

    pub fn add(&mut self, product: &Product, snapshot: &StockSnapshot) -> bool {
        if self.available(product.id, snapshot) <= 0 {
            return false;
        }
        match self.line_mut(product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price.clone(),
                quantity: 1,
            }),
        }
        true
    }

    pub fn increment(&mut self, product_id: Uuid, snapshot: &StockSnapshot) -> bool {
        if self.available(product_id, snapshot) <= 0 {
            return false;
        }
        match self.line_mut(product_id) {
            Some(line) => {
                line.quantity += 1;
                true
            }
            None => false,
        }
    }

    pub fn decrement(&mut self, product_id: Uuid) -> bool {
        match self.line_mut(product_id) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let len_before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        self.lines.len() < len_before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Take `quantity` units of a product out of the cart, e.g. once they
    /// have been sold. The line goes when nothing is left of it.
    pub fn take(&mut self, product_id: Uuid, quantity: i32) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity -= quantity;
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    /// Shrink lines that exceed the snapshot, dropping any left empty.
    pub fn fit_to(&mut self, snapshot: &StockSnapshot) {
        for line in &mut self.lines {
            line.quantity = line.quantity.min(snapshot.quantity_of(line.product_id));
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    pub fn total(&self) -> BigDecimal {
        self.lines
            .iter()
            .fold(BigDecimal::from(0), |acc, l| acc + l.amount())
    }

    fn line(&self, product_id: Uuid) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: Uuid) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
