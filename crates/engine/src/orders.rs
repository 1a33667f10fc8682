use std::path::Path;

use conciliar_core::{Diagnostics, Order};
use thiserror::Error;

use crate::columns::column_index;
use crate::csv::{self, CsvError};
use crate::normalize::normalize_name;
use crate::value::{parse_amount, parse_date};

pub const ORDER_ID_COLUMNS: &[&str] = &["order_id", "order id", "id", "order", "pedido"];
pub const ORDER_CUSTOMER_COLUMNS: &[&str] = &["customer", "customer name", "name", "cliente"];
pub const ORDER_DATE_COLUMNS: &[&str] = &["date", "order date", "fecha"];
pub const ORDER_AMOUNT_COLUMNS: &[&str] = &["amount", "total", "amount total fee", "monto"];
pub const ORDER_REFERENCE_COLUMNS: &[&str] = &["reference", "bank reference", "referencia"];

#[derive(Debug, Error)]
pub enum OrderLoadError {
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error("missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

/// Orders parsed from a CSV export, plus the rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct OrderBatch {
    pub orders: Vec<Order>,
    pub skipped: u64,
    pub diagnostics: Diagnostics,
}

/// Parses an order export table. Only the id and amount columns are
/// required; customer, date and reference degrade to their empty values
/// when the column is absent or the cell does not parse.
pub fn parse_orders(headers: &[String], rows: &[Vec<String>]) -> Result<OrderBatch, OrderLoadError> {
    let id_col = column_index(headers, ORDER_ID_COLUMNS, &[]);
    let amount_col = column_index(headers, ORDER_AMOUNT_COLUMNS, &[]);

    let mut missing = Vec::new();
    if id_col.is_none() {
        missing.push("order_id".to_string());
    }
    if amount_col.is_none() {
        missing.push("amount".to_string());
    }
    let (id_col, amount_col) = match (id_col, amount_col) {
        (Some(id), Some(amount)) => (id, amount),
        _ => return Err(OrderLoadError::MissingColumns { missing }),
    };

    let customer_col = column_index(headers, ORDER_CUSTOMER_COLUMNS, &[]);
    let date_col = column_index(headers, ORDER_DATE_COLUMNS, &[]);
    let reference_col = column_index(headers, ORDER_REFERENCE_COLUMNS, &[]);

    let mut batch = OrderBatch::default();
    for (index, row) in rows.iter().enumerate() {
        let line = index + 1;
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .map(String::as_str)
                .unwrap_or("")
        };

        let order_id = cell(Some(id_col)).trim();
        if order_id.is_empty() {
            batch.skipped += 1;
            batch.diagnostics.push(format!("row {line}: missing order id"));
            continue;
        }

        let amount_raw = cell(Some(amount_col)).trim();
        let amount = match parse_amount(amount_raw) {
            Some(amount) => amount,
            None => {
                batch.skipped += 1;
                batch
                    .diagnostics
                    .push(format!("row {line}: invalid amount: {amount_raw}"));
                continue;
            }
        };

        let customer_name = normalize_name(cell(customer_col));
        let order_date = parse_date(cell(date_col));
        let order_bank_reference = {
            let raw = cell(reference_col).trim();
            if raw.is_empty() {
                None
            } else {
                Some(raw.to_string())
            }
        };

        batch.orders.push(Order {
            order_id: order_id.to_string(),
            customer_name,
            order_date,
            amount_total_fee: amount,
            order_bank_reference,
        });
    }
    Ok(batch)
}

/// Reads and parses an order CSV in one step.
pub fn read_orders(path: &Path) -> Result<OrderBatch, OrderLoadError> {
    let table = csv::read_rows(path)?;
    parse_orders(&table.headers, &table.rows)
}
