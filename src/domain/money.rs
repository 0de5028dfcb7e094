use bigdecimal::BigDecimal;

/// Two-decimal rendering used on receipts and in API responses.
pub fn format_amount(value: &BigDecimal) -> String {
    format!("{:.2}", value.round(2))
}
