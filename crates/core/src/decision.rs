use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A transaction-to-order pairing produced by the matching passes.
///
/// Carries the evidence the pairing rests on so the stored suggestion can be
/// audited later: the fuzzy name score, whether the bank references agreed,
/// and the absolute date/amount deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderMatch {
    pub transaction_hash: String,
    pub order_id: String,
    /// True when both sides carried a bank reference and they were equal;
    /// a reference match is accepted regardless of the name score.
    pub reference_match: bool,
    pub name_score: u32,
    pub diff_days: i64,
    pub diff_amount: Decimal,
}

/// A suggested association between a small commission credit and the main
/// payment it belongs to. `score` is the evidence the link was made on
/// (100 for a reference match, otherwise the fuzzy name score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionLink {
    pub main_hash: String,
    pub commission_hash: String,
    pub score: u32,
}
