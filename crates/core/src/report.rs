use std::collections::BTreeMap;

use serde::Serialize;

/// Bounded diagnostic collector: keeps the first [`Diagnostics::MAX_MESSAGES`]
/// messages for display while counting every push, so report counts stay
/// exact no matter how noisy the input file is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    messages: Vec<String>,
    total: u64,
}

impl Diagnostics {
    pub const MAX_MESSAGES: usize = 10;

    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.total += 1;
        if self.messages.len() < Diagnostics::MAX_MESSAGES {
            self.messages.push(message.into());
        }
    }

    /// Total number of diagnostics pushed, including dropped ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// Outcome of one statement ingestion run. `processed` counts rows that
/// reached persistence, so `processed == inserted + duplicates`.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub success: bool,
    pub processed: u64,
    pub inserted: u64,
    pub duplicates: u64,
    pub skipped: u64,
    pub diagnostics: Vec<String>,
}

/// Outcome of one order-loading run. `skipped_stale` counts orders the
/// guarded upsert refused because the stored row is no longer unmatched.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLoadReport {
    pub success: bool,
    pub processed: u64,
    pub written: u64,
    pub skipped_stale: u64,
    pub skipped: u64,
    pub diagnostics: Vec<String>,
}

/// Outcome of one matching run: input-set sizes, decisions applied, and how
/// many decision writes failed (any failure flips `success` to false).
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub success: bool,
    pub transactions: u64,
    pub orders: u64,
    pub commission_links: u64,
    pub order_matches: u64,
    pub write_failures: u64,
    pub diagnostics: Vec<String>,
}

/// Store tallies by reconciliation status, for the `status` command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub transactions: BTreeMap<String, i64>,
    pub orders: BTreeMap<String, i64>,
    pub links: i64,
}
