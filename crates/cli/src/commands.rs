use std::path::Path;

use anyhow::Context;
use conciliar_core::{Config, Diagnostics, IngestReport, MatchReport, OrderLoadReport, StatusReport};
use conciliar_engine::plan_matches;

/// Imports a statement CSV: rows are canonicalized, fingerprinted, and
/// inserted; a fingerprint already on file counts as a duplicate.
pub async fn ingest(db: &Path, file: &Path, config: &Config) -> anyhow::Result<IngestReport> {
    let batch = conciliar_engine::prepare_file(file, &config.columns)
        .with_context(|| format!("reading {}", file.display()))?;

    let pool = conciliar_storage::connect(db).await?;

    let mut inserted = 0u64;
    let mut duplicates = 0u64;
    for tx in &batch.transactions {
        if conciliar_storage::insert_transaction(&pool, tx).await? {
            inserted += 1;
        } else {
            duplicates += 1;
        }
    }

    for message in batch.diagnostics.messages() {
        tracing::warn!("{message}");
    }
    tracing::info!(
        "ingested {}: {} new, {} duplicate, {} skipped, {} debits excluded",
        file.display(),
        inserted,
        duplicates,
        batch.skipped,
        batch.excluded_debits
    );

    Ok(IngestReport {
        success: true,
        processed: inserted + duplicates,
        inserted,
        duplicates,
        skipped: batch.skipped,
        diagnostics: batch.diagnostics.into_messages(),
    })
}

/// Loads an order export. Orders already part of a match keep their stored
/// fields; the guarded upsert reports them as stale.
pub async fn load_orders(db: &Path, file: &Path) -> anyhow::Result<OrderLoadReport> {
    let batch = conciliar_engine::read_orders(file)
        .with_context(|| format!("reading {}", file.display()))?;

    let pool = conciliar_storage::connect(db).await?;

    let mut written = 0u64;
    let mut skipped_stale = 0u64;
    for order in &batch.orders {
        if conciliar_storage::upsert_order(&pool, order).await? {
            written += 1;
        } else {
            skipped_stale += 1;
        }
    }

    for message in batch.diagnostics.messages() {
        tracing::warn!("{message}");
    }
    tracing::info!(
        "loaded {}: {} written, {} stale, {} skipped",
        file.display(),
        written,
        skipped_stale,
        batch.skipped
    );

    Ok(OrderLoadReport {
        success: true,
        processed: written + skipped_stale,
        written,
        skipped_stale,
        skipped: batch.skipped,
        diagnostics: batch.diagnostics.into_messages(),
    })
}

/// Plans matches over everything still unmatched, then records each decision
/// with a guarded write. A row that changed between planning and writing is
/// skipped and reported; only a write error makes the run fail.
pub async fn run_match(db: &Path, config: &Config) -> anyhow::Result<MatchReport> {
    let pool = conciliar_storage::connect(db).await?;

    let transactions = conciliar_storage::unmatched_transactions(&pool).await?;
    let orders = conciliar_storage::unmatched_orders(&pool).await?;
    let plan = plan_matches(&transactions, &orders, config);

    let mut diagnostics = Diagnostics::new();
    let mut commission_links = 0u64;
    let mut order_matches = 0u64;
    let mut write_failures = 0u64;

    for link in &plan.commission_links {
        match conciliar_storage::apply_commission_link(&pool, link).await {
            Ok(true) => commission_links += 1,
            Ok(false) => diagnostics.push(format!(
                "commission link {} -> {} skipped: rows changed since planning",
                link.commission_hash, link.main_hash
            )),
            Err(err) => {
                write_failures += 1;
                diagnostics.push(format!(
                    "commission link {} -> {} failed: {err}",
                    link.commission_hash, link.main_hash
                ));
            }
        }
    }

    for decided in &plan.order_matches {
        match conciliar_storage::apply_order_match(&pool, decided).await {
            Ok(true) => order_matches += 1,
            Ok(false) => diagnostics.push(format!(
                "match {} -> {} skipped: rows changed since planning",
                decided.transaction_hash, decided.order_id
            )),
            Err(err) => {
                write_failures += 1;
                diagnostics.push(format!(
                    "match {} -> {} failed: {err}",
                    decided.transaction_hash, decided.order_id
                ));
            }
        }
    }

    for message in diagnostics.messages() {
        tracing::warn!("{message}");
    }
    tracing::info!(
        "matched {} transactions against {} orders: {} commission links, {} order matches",
        transactions.len(),
        orders.len(),
        commission_links,
        order_matches
    );

    Ok(MatchReport {
        success: write_failures == 0,
        transactions: transactions.len() as u64,
        orders: orders.len() as u64,
        commission_links,
        order_matches,
        write_failures,
        diagnostics: diagnostics.into_messages(),
    })
}

/// Reads the status tallies.
pub async fn status(db: &Path) -> anyhow::Result<StatusReport> {
    let pool = conciliar_storage::connect(db).await?;
    Ok(conciliar_storage::status_counts(&pool).await?)
}
