use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sales order as loaded from the external order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// The external system's identifier, primary key in storage.
    pub order_id: String,
    /// Normalized with the same folding rules as payer names.
    pub customer_name: String,
    pub order_date: Option<NaiveDate>,
    pub amount_total_fee: Decimal,
    pub order_bank_reference: Option<String>,
}
