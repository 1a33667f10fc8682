use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A canonical bank-statement credit row.
///
/// `hash` is the deterministic fingerprint of the row's identity fields and
/// is immutable once created; everything the matching engine later writes
/// (status, scores, the matched order) lives only in storage, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransaction {
    pub hash: String,
    /// Nullable in storage: rows written by other tools may lack a date and
    /// are then never eligible for date-windowed matching.
    pub transaction_date: Option<NaiveDate>,
    pub payer_sender: String,
    pub credit_amount: Decimal,
    /// Raw balance cell text, kept verbatim for fingerprint stability.
    pub balance: Option<String>,
    pub description: String,
    pub extracted_reference: Option<String>,
}
