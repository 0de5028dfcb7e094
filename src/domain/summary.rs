use std::collections::HashMap;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::sale::SaleRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub value: BigDecimal,
    pub percentage: BigDecimal,
}

/// Revenue per product over a set of sales.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub rows: Vec<SummaryRow>,
    pub total: BigDecimal,
    pub sale_count: usize,
}

impl SalesSummary {
    /// Rows are sorted by value, largest first, ties broken by name.
    /// Percentages are of the grand total, in hundredths, and add up to
    /// exactly 100 unless the total is zero (then they are all zero).
    pub fn from_sales(sales: &[SaleRecord]) -> Self {
        let mut by_product: HashMap<Uuid, SummaryRow> = HashMap::new();
        for item in sales.iter().flat_map(|s| s.items.iter()) {
            let row = by_product
                .entry(item.product_id)
                .or_insert_with(|| SummaryRow {
                    product_id: item.product_id,
                    name: item.name.clone(),
                    quantity: 0,
                    value: BigDecimal::from(0),
                    percentage: BigDecimal::from(0),
                });
            row.quantity += i64::from(item.quantity);
            row.value += item.amount();
        }

        let total = by_product
            .values()
            .fold(BigDecimal::from(0), |acc, r| acc + &r.value);
        let mut rows: Vec<SummaryRow> = by_product.into_values().collect();
        rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
        if total != BigDecimal::from(0) {
            allocate_percentages(&mut rows, &total);
        }

        Self {
            rows,
            total,
            sale_count: sales.len(),
        }
    }
}

/// Largest-remainder rounding: floor every share to a hundredth, then hand
/// the missing hundredths to the rows that lost the most.
fn allocate_percentages(rows: &mut [SummaryRow], total: &BigDecimal) {
    let ten_thousand = BigDecimal::from(10_000);
    let one = BigDecimal::from(1);

    let mut hundredths = Vec::with_capacity(rows.len());
    let mut remainders = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let exact = &row.value * &ten_thousand / total;
        // Values are never negative, so truncating is flooring.
        let floored = exact.with_scale(0);
        remainders.push(&exact - &floored);
        hundredths.push(floored);
    }

    let mut allocated = hundredths
        .iter()
        .fold(BigDecimal::from(0), |acc, h| acc + h);
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));
    for i in order {
        if allocated >= ten_thousand {
            break;
        }
        hundredths[i] += &one;
        allocated += &one;
    }

    let hundred = BigDecimal::from(100);
    for (row, h) in rows.iter_mut().zip(hundredths) {
        row.percentage = h / &hundred;
    }
}
