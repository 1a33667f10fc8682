use std::path::Path;

use conciliar_core::{BankTransaction, ColumnOverrides, Diagnostics};
use thiserror::Error;

use crate::columns::{self, MissingColumns, ResolvedColumns};
use crate::csv::{self, CsvError};
use crate::fingerprint::fingerprint;
use crate::normalize::{normalize_description, normalize_name};
use crate::reference::extract_reference;
use crate::value::{parse_amount, parse_date};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error(transparent)]
    MissingColumns(#[from] MissingColumns),
}

/// Canonical records ready for persistence, plus everything the run report
/// needs to say about the rows that did not make it.
#[derive(Debug, Clone, Default)]
pub struct PreparedBatch {
    pub transactions: Vec<BankTransaction>,
    /// Rows dropped silently because a non-zero debit marks outgoing funds.
    pub excluded_debits: u64,
    /// Rows skipped with a diagnostic (bad credit, bad date).
    pub skipped: u64,
    pub diagnostics: Diagnostics,
}

/// Runs the row pipeline over a parsed statement table.
///
/// Structural problems (missing required columns) abort the whole batch;
/// per-row problems skip the row, count it, and record a diagnostic for the
/// first few occurrences. Row order is preserved.
pub fn prepare(
    headers: &[String],
    rows: &[Vec<String>],
    overrides: &ColumnOverrides,
) -> Result<PreparedBatch, IngestError> {
    let cols = columns::resolve_columns(headers, overrides)?;

    let mut batch = PreparedBatch::default();
    for (index, row) in rows.iter().enumerate() {
        let line = index + 1; // 1-based data row
        prepare_row(&cols, line, row, &mut batch);
    }
    Ok(batch)
}

/// Reads and prepares a statement CSV in one step.
pub fn prepare_file(path: &Path, overrides: &ColumnOverrides) -> Result<PreparedBatch, IngestError> {
    let table = csv::read_rows(path)?;
    prepare(&table.headers, &table.rows, overrides)
}

fn prepare_row(cols: &ResolvedColumns, line: usize, row: &[String], batch: &mut PreparedBatch) {
    let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");

    // Outgoing funds: a parseable non-zero debit excludes the row outright.
    if let Some(debit_col) = cols.debit {
        if let Some(debit) = parse_amount(cell(debit_col)) {
            if !debit.is_zero() {
                batch.excluded_debits += 1;
                return;
            }
        }
    }

    let credit_raw = cell(cols.credit).trim();
    if credit_raw.is_empty() {
        batch.skipped += 1;
        batch
            .diagnostics
            .push(format!("row {line}: missing credit amount"));
        return;
    }
    let credit = match parse_amount(credit_raw) {
        Some(amount) => amount,
        None => {
            batch.skipped += 1;
            batch
                .diagnostics
                .push(format!("row {line}: invalid credit amount: {credit_raw}"));
            return;
        }
    };
    if credit.is_sign_negative() || credit.is_zero() {
        batch.skipped += 1;
        batch
            .diagnostics
            .push(format!("row {line}: credit amount not positive: {credit_raw}"));
        return;
    }

    let date_raw = cell(cols.date).trim();
    let date = match parse_date(date_raw) {
        Some(date) => date,
        None => {
            batch.skipped += 1;
            batch
                .diagnostics
                .push(format!("row {line}: unparseable date: {date_raw}"));
            return;
        }
    };

    let payer = normalize_name(cell(cols.payer));
    let description = normalize_description(cell(cols.description));
    let extracted_reference = extract_reference(&description);
    let balance = cols.balance.and_then(|i| {
        let raw = cell(i);
        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    });

    let hash = fingerprint(
        &date.format("%Y-%m-%d").to_string(),
        &payer,
        &credit.normalize().to_string(),
        balance.as_deref().unwrap_or(""),
    );

    batch.transactions.push(BankTransaction {
        hash,
        transaction_date: Some(date),
        payer_sender: payer,
        credit_amount: credit,
        balance,
        description,
        extracted_reference,
    });
}
