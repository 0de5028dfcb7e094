//! Downloadable receipt for a completed sale.

use std::io;

use chrono::{DateTime, Utc};
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};

use super::money::format_amount;
use super::sale::SaleRecord;

#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    sale: &'a SaleRecord,
    customer: String,
    currency_symbol: String,
}

impl<'a> Receipt<'a> {
    pub fn new(sale: &'a SaleRecord, customer: impl Into<String>, currency_symbol: &str) -> Self {
        Self {
            sale,
            customer: customer.into(),
            currency_symbol: currency_symbol.to_string(),
        }
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.sale.created_at
    }

    /// `Canteen-Bill-<dd-mm-yyyy>-<hh-mm-ss>.txt`, from the sale time.
    pub fn file_name(&self) -> String {
        format!(
            "Canteen-Bill-{}.txt",
            self.issued_at().format("%d-%m-%Y-%H-%M-%S")
        )
    }

    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        writeln!(out, "CANTEEN RECEIPT")?;
        writeln!(out)?;
        writeln!(out, "Date: {}", self.issued_at().format("%d/%m/%Y"))?;
        writeln!(out, "Time: {}", self.issued_at().format("%H:%M:%S"))?;
        writeln!(out, "Customer: {}", self.customer)?;
        writeln!(out, "Sale: {}", self.sale.id)?;
        writeln!(out)?;

        let mut builder = Builder::default();
        builder.push_record(["Item", "Qty", "Price", "Amount"]);
        for item in &self.sale.items {
            builder.push_record([
                item.name.clone(),
                item.quantity.to_string(),
                format_amount(&item.price),
                format_amount(&item.amount()),
            ]);
        }
        let mut table = builder.build();
        table.with(Style::modern());
        table.modify(Columns::new(1..), Alignment::right());
        writeln!(out, "{table}")?;

        writeln!(
            out,
            "Total Amount: {}{}",
            self.currency_symbol,
            format_amount(&self.sale.total)
        )
    }

    pub fn render(&self) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
