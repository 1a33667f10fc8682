use chrono::NaiveDate;
use conciliar_core::{
    BankTransaction, CommissionLink, LinkStatus, Order, OrderMatch, ReconciliationStatus,
    StatusReport,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::DbPool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Inserts a canonical transaction. Returns `false` when the fingerprint is
/// already present; the stored row is never touched in that case.
pub async fn insert_transaction(pool: &DbPool, tx: &BankTransaction) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO bank_transactions
            (hash, transaction_date, payer_sender, credit_amount, balance,
             description, extracted_reference)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(hash) DO NOTHING
        "#,
    )
    .bind(&tx.hash)
    .bind(tx.transaction_date.map(|d| d.format("%Y-%m-%d").to_string()))
    .bind(&tx.payer_sender)
    .bind(tx.credit_amount.to_string())
    .bind(tx.balance.as_deref())
    .bind(&tx.description)
    .bind(tx.extracted_reference.as_deref())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Writes an order, refreshing its fields only while the stored row is
/// still unmatched. Returns `false` when a matched row was left untouched.
pub async fn upsert_order(pool: &DbPool, order: &Order) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO orders
            (order_id, customer_name, order_date, amount_total_fee, order_bank_reference)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(order_id) DO UPDATE SET
            customer_name = excluded.customer_name,
            order_date = excluded.order_date,
            amount_total_fee = excluded.amount_total_fee,
            order_bank_reference = excluded.order_bank_reference
        WHERE orders.reconciliation_status = ?
        "#,
    )
    .bind(&order.order_id)
    .bind(&order.customer_name)
    .bind(order.order_date.map(|d| d.format("%Y-%m-%d").to_string()))
    .bind(order.amount_total_fee.to_string())
    .bind(order.order_bank_reference.as_deref())
    .bind(ReconciliationStatus::Unmatched.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Transactions still awaiting reconciliation, in stable hash order. Rows
/// whose stored amount no longer parses are left out of the run.
pub async fn unmatched_transactions(pool: &DbPool) -> Result<Vec<BankTransaction>, StoreError> {
    let rows = sqlx::query_as::<
        _,
        (
            String,
            Option<String>,
            String,
            String,
            Option<String>,
            String,
            Option<String>,
        ),
    >(
        r#"
        SELECT hash, transaction_date, payer_sender, credit_amount, balance,
               description, extracted_reference
        FROM bank_transactions
        WHERE reconciliation_status = ?
        ORDER BY hash
        "#,
    )
    .bind(ReconciliationStatus::Unmatched.as_str())
    .fetch_all(pool)
    .await?;

    let mut transactions = Vec::with_capacity(rows.len());
    for (hash, date, payer_sender, credit, balance, description, reference) in rows {
        let credit_amount = match credit.parse::<Decimal>() {
            Ok(amount) => amount,
            Err(_) => continue,
        };
        transactions.push(BankTransaction {
            hash,
            transaction_date: date.as_deref().and_then(parse_stored_date),
            payer_sender,
            credit_amount,
            balance,
            description,
            extracted_reference: reference,
        });
    }
    Ok(transactions)
}

/// Orders still awaiting reconciliation, in stable id order.
pub async fn unmatched_orders(pool: &DbPool) -> Result<Vec<Order>, StoreError> {
    let rows = sqlx::query_as::<_, (String, String, Option<String>, String, Option<String>)>(
        r#"
        SELECT order_id, customer_name, order_date, amount_total_fee, order_bank_reference
        FROM orders
        WHERE reconciliation_status = ?
        ORDER BY order_id
        "#,
    )
    .bind(ReconciliationStatus::Unmatched.as_str())
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for (order_id, customer_name, date, amount, reference) in rows {
        let amount_total_fee = match amount.parse::<Decimal>() {
            Ok(amount) => amount,
            Err(_) => continue,
        };
        orders.push(Order {
            order_id,
            customer_name,
            order_date: date.as_deref().and_then(parse_stored_date),
            amount_total_fee,
            order_bank_reference: reference,
        });
    }
    Ok(orders)
}

/// Records a suggested pairing on both sides. Each row must still be
/// unmatched; if either has moved on since planning, the whole write rolls
/// back and `false` comes back so the caller can re-plan.
pub async fn apply_order_match(pool: &DbPool, decision: &OrderMatch) -> Result<bool, StoreError> {
    let transaction_ids = serde_json::to_string(&[decision.transaction_hash.as_str()])?;

    let mut tx = pool.begin().await?;

    let tx_update = sqlx::query(
        r#"
        UPDATE bank_transactions SET
            reconciliation_status = ?,
            order_id = ?,
            match_name_score = ?,
            match_reference_flag = ?,
            diff_days = ?,
            diff_amount = ?
        WHERE hash = ? AND reconciliation_status = ?
        "#,
    )
    .bind(ReconciliationStatus::SuggestedMatch.as_str())
    .bind(&decision.order_id)
    .bind(i64::from(decision.name_score))
    .bind(i64::from(decision.reference_match))
    .bind(decision.diff_days)
    .bind(decision.diff_amount.to_string())
    .bind(&decision.transaction_hash)
    .bind(ReconciliationStatus::Unmatched.as_str())
    .execute(&mut *tx)
    .await?;

    let order_update = sqlx::query(
        r#"
        UPDATE orders SET
            reconciliation_status = ?,
            transaction_ids = ?,
            match_name_score = ?,
            match_reference_flag = ?,
            diff_days = ?,
            diff_amount = ?
        WHERE order_id = ? AND reconciliation_status = ?
        "#,
    )
    .bind(ReconciliationStatus::SuggestedMatch.as_str())
    .bind(&transaction_ids)
    .bind(i64::from(decision.name_score))
    .bind(i64::from(decision.reference_match))
    .bind(decision.diff_days)
    .bind(decision.diff_amount.to_string())
    .bind(&decision.order_id)
    .bind(ReconciliationStatus::Unmatched.as_str())
    .execute(&mut *tx)
    .await?;

    if tx_update.rows_affected() == 1 && order_update.rows_affected() == 1 {
        tx.commit().await?;
        Ok(true)
    } else {
        tx.rollback().await?;
        Ok(false)
    }
}

/// Records a suggested commission link and flags the commission row. The
/// link row and the status flip stand or fall together.
pub async fn apply_commission_link(
    pool: &DbPool,
    link: &CommissionLink,
) -> Result<bool, StoreError> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO transaction_links (primary_hash, linked_hash, link_type, status)
        VALUES (?, ?, 'commission', ?)
        "#,
    )
    .bind(&link.main_hash)
    .bind(&link.commission_hash)
    .bind(LinkStatus::Suggested.as_str())
    .execute(&mut *tx)
    .await?;

    let flagged = sqlx::query(
        "UPDATE bank_transactions SET reconciliation_status = ? \
         WHERE hash = ? AND reconciliation_status = ?",
    )
    .bind(ReconciliationStatus::SuggestedMatch.as_str())
    .bind(&link.commission_hash)
    .bind(ReconciliationStatus::Unmatched.as_str())
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 1 && flagged.rows_affected() == 1 {
        tx.commit().await?;
        Ok(true)
    } else {
        tx.rollback().await?;
        Ok(false)
    }
}

/// Status tallies for the status command.
pub async fn status_counts(pool: &DbPool) -> Result<StatusReport, StoreError> {
    let transactions = sqlx::query_as::<_, (String, i64)>(
        "SELECT reconciliation_status, COUNT(*) FROM bank_transactions \
         GROUP BY reconciliation_status",
    )
    .fetch_all(pool)
    .await?;

    let orders = sqlx::query_as::<_, (String, i64)>(
        "SELECT reconciliation_status, COUNT(*) FROM orders GROUP BY reconciliation_status",
    )
    .fetch_all(pool)
    .await?;

    let (links,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM transaction_links")
        .fetch_one(pool)
        .await?;

    Ok(StatusReport {
        transactions: transactions.into_iter().collect(),
        orders: orders.into_iter().collect(),
        links,
    })
}

// Stored dates are ISO; anything else (legacy rows with a time suffix) is
// read tolerantly rather than failing the whole fetch.
fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let token = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect, connect_memory};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn tx(hash: &str, day: u32, payer: &str, amount: &str) -> BankTransaction {
        BankTransaction {
            hash: hash.to_string(),
            transaction_date: Some(date(day)),
            payer_sender: payer.to_string(),
            credit_amount: dec(amount),
            balance: Some("1.234,56".to_string()),
            description: "PAGOAB123456".to_string(),
            extracted_reference: Some("AB123456".to_string()),
        }
    }

    fn order(id: &str, day: u32, customer: &str, amount: &str) -> Order {
        Order {
            order_id: id.to_string(),
            customer_name: customer.to_string(),
            order_date: Some(date(day)),
            amount_total_fee: dec(amount),
            order_bank_reference: None,
        }
    }

    fn matched(tx_hash: &str, order_id: &str) -> OrderMatch {
        OrderMatch {
            transaction_hash: tx_hash.to_string(),
            order_id: order_id.to_string(),
            reference_match: false,
            name_score: 100,
            diff_days: 1,
            diff_amount: dec("0.50"),
        }
    }

    #[tokio::test]
    async fn insert_transaction_skips_duplicates() {
        let pool = connect_memory().await.unwrap();
        assert!(insert_transaction(&pool, &tx("a", 10, "ACME", "10"))
            .await
            .unwrap());
        assert!(!insert_transaction(&pool, &tx("a", 10, "ACME", "10"))
            .await
            .unwrap());
        assert!(insert_transaction(&pool, &tx("b", 10, "ACME", "10"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn transactions_round_trip_in_hash_order() {
        let pool = connect_memory().await.unwrap();
        insert_transaction(&pool, &tx("b", 11, "BETA", "20.50"))
            .await
            .unwrap();
        insert_transaction(&pool, &tx("a", 10, "ALPHA", "10.00"))
            .await
            .unwrap();

        let rows = unmatched_transactions(&pool).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hash, "a");
        assert_eq!(rows[1].hash, "b");
        assert_eq!(rows[0].transaction_date, Some(date(10)));
        assert_eq!(rows[0].credit_amount, dec("10.00"));
        assert_eq!(rows[0].balance.as_deref(), Some("1.234,56"));
        assert_eq!(rows[0].extracted_reference.as_deref(), Some("AB123456"));
    }

    #[tokio::test]
    async fn undated_transactions_survive_the_round_trip() {
        let pool = connect_memory().await.unwrap();
        let mut t = tx("a", 10, "ACME", "10");
        t.transaction_date = None;
        insert_transaction(&pool, &t).await.unwrap();

        let rows = unmatched_transactions(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_date, None);
    }

    #[tokio::test]
    async fn unreadable_amounts_are_left_out() {
        let pool = connect_memory().await.unwrap();
        sqlx::query("INSERT INTO bank_transactions (hash, credit_amount) VALUES ('x', 'garbage')")
            .execute(&pool)
            .await
            .unwrap();
        insert_transaction(&pool, &tx("a", 10, "ACME", "10"))
            .await
            .unwrap();

        let rows = unmatched_transactions(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hash, "a");
    }

    #[tokio::test]
    async fn upsert_order_refreshes_unmatched_rows() {
        let pool = connect_memory().await.unwrap();
        assert!(upsert_order(&pool, &order("O-1", 10, "ACME", "100.00"))
            .await
            .unwrap());
        assert!(upsert_order(&pool, &order("O-1", 12, "ACME SL", "150.00"))
            .await
            .unwrap());

        let rows = unmatched_orders(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer_name, "ACME SL");
        assert_eq!(rows[0].order_date, Some(date(12)));
        assert_eq!(rows[0].amount_total_fee, dec("150.00"));
    }

    #[tokio::test]
    async fn upsert_order_leaves_matched_rows_alone() {
        let pool = connect_memory().await.unwrap();
        insert_transaction(&pool, &tx("a", 10, "ACME", "100.00"))
            .await
            .unwrap();
        upsert_order(&pool, &order("O-1", 10, "ACME", "100.00"))
            .await
            .unwrap();
        assert!(apply_order_match(&pool, &matched("a", "O-1")).await.unwrap());

        assert!(!upsert_order(&pool, &order("O-1", 10, "ACME", "999.00"))
            .await
            .unwrap());
        assert!(unmatched_orders(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apply_order_match_marks_both_sides() {
        let pool = connect_memory().await.unwrap();
        insert_transaction(&pool, &tx("a", 10, "ACME", "100.00"))
            .await
            .unwrap();
        upsert_order(&pool, &order("O-1", 10, "ACME", "100.00"))
            .await
            .unwrap();

        assert!(apply_order_match(&pool, &matched("a", "O-1")).await.unwrap());
        assert!(unmatched_transactions(&pool).await.unwrap().is_empty());
        assert!(unmatched_orders(&pool).await.unwrap().is_empty());

        let (ids,): (Option<String>,) =
            sqlx::query_as("SELECT transaction_ids FROM orders WHERE order_id = 'O-1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(ids.as_deref(), Some(r#"["a"]"#));

        let report = status_counts(&pool).await.unwrap();
        assert_eq!(report.transactions.get("suggested_match"), Some(&1));
        assert_eq!(report.orders.get("suggested_match"), Some(&1));
    }

    #[tokio::test]
    async fn apply_order_match_rolls_back_when_either_side_is_stale() {
        let pool = connect_memory().await.unwrap();
        insert_transaction(&pool, &tx("a", 10, "ACME", "100.00"))
            .await
            .unwrap();

        // No such order: nothing may change, not even the transaction row.
        assert!(!apply_order_match(&pool, &matched("a", "O-MISSING"))
            .await
            .unwrap());
        assert_eq!(unmatched_transactions(&pool).await.unwrap().len(), 1);

        // Same story once the order is already taken.
        upsert_order(&pool, &order("O-1", 10, "ACME", "100.00")).await.unwrap();
        assert!(apply_order_match(&pool, &matched("a", "O-1")).await.unwrap());
        insert_transaction(&pool, &tx("b", 10, "ACME", "100.00"))
            .await
            .unwrap();
        assert!(!apply_order_match(&pool, &matched("b", "O-1")).await.unwrap());
        assert_eq!(unmatched_transactions(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn apply_commission_link_flags_the_commission_only() {
        let pool = connect_memory().await.unwrap();
        insert_transaction(&pool, &tx("main", 10, "ACME", "150.00"))
            .await
            .unwrap();
        insert_transaction(&pool, &tx("comm", 10, "ACME", "4.00"))
            .await
            .unwrap();

        let link = CommissionLink {
            main_hash: "main".to_string(),
            commission_hash: "comm".to_string(),
            score: 100,
        };
        assert!(apply_commission_link(&pool, &link).await.unwrap());

        let remaining = unmatched_transactions(&pool).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].hash, "main");

        let report = status_counts(&pool).await.unwrap();
        assert_eq!(report.links, 1);

        // Re-applying the same link is a stale write, not an error.
        assert!(!apply_commission_link(&pool, &link).await.unwrap());
        assert_eq!(status_counts(&pool).await.unwrap().links, 1);
    }

    #[tokio::test]
    async fn status_counts_tally_by_status() {
        let pool = connect_memory().await.unwrap();
        insert_transaction(&pool, &tx("a", 10, "ACME", "10"))
            .await
            .unwrap();
        insert_transaction(&pool, &tx("b", 10, "ACME", "20"))
            .await
            .unwrap();
        upsert_order(&pool, &order("O-1", 10, "ACME", "10"))
            .await
            .unwrap();

        let report = status_counts(&pool).await.unwrap();
        assert_eq!(report.transactions.get("unmatched"), Some(&2));
        assert_eq!(report.orders.get("unmatched"), Some(&1));
        assert_eq!(report.links, 0);
    }

    #[tokio::test]
    async fn file_backed_database_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conciliar.db");

        let pool = connect(&path).await.unwrap();
        insert_transaction(&pool, &tx("a", 10, "ACME", "10"))
            .await
            .unwrap();
        pool.close().await;

        let pool = connect(&path).await.unwrap();
        let rows = unmatched_transactions(&pool).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hash, "a");
    }
}
