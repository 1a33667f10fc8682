use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

pub type DbPool = Pool<Sqlite>;

/// Opens the reconciliation database, creating the file and the schema on
/// first use.
pub async fn connect(path: &Path) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite:{}?mode=rwc", path.display()))
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA cache_size = -32000")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database, used by tests and dry runs.
pub async fn connect_memory() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bank_transactions (
            hash TEXT PRIMARY KEY,
            transaction_date TEXT,
            payer_sender TEXT NOT NULL DEFAULT '',
            credit_amount TEXT NOT NULL,
            balance TEXT,
            description TEXT NOT NULL DEFAULT '',
            extracted_reference TEXT,
            reconciliation_status TEXT NOT NULL DEFAULT 'unmatched',
            order_id TEXT,
            match_name_score INTEGER,
            match_reference_flag INTEGER,
            diff_days INTEGER,
            diff_amount TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            order_id TEXT PRIMARY KEY,
            customer_name TEXT NOT NULL DEFAULT '',
            order_date TEXT,
            amount_total_fee TEXT NOT NULL,
            order_bank_reference TEXT,
            reconciliation_status TEXT NOT NULL DEFAULT 'unmatched',
            transaction_ids TEXT,
            match_name_score INTEGER,
            match_reference_flag INTEGER,
            diff_days INTEGER,
            diff_amount TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transaction_links (
            primary_hash TEXT NOT NULL,
            linked_hash TEXT NOT NULL,
            link_type TEXT NOT NULL DEFAULT 'commission',
            status TEXT NOT NULL DEFAULT 'suggested',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (primary_hash, linked_hash)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_bank_transactions_status \
         ON bank_transactions(reconciliation_status)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(reconciliation_status)")
        .execute(pool)
        .await?;

    Ok(())
}
