use std::collections::HashSet;

use conciliar_core::{BankTransaction, CommissionLink, Config, MatchingConfig, Order, OrderMatch};

use crate::commission::link_commissions;
use crate::reference::references_equal;
use crate::similar::name_score;

/// Exclusivity tracker shared by every pass: once a transaction or an order
/// is part of the plan, later candidates must not touch it.
#[derive(Debug, Clone, Default)]
pub struct ClaimSet {
    transactions: HashSet<String>,
    orders: HashSet<String>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim_transaction(&mut self, hash: &str) {
        self.transactions.insert(hash.to_string());
    }

    pub fn transaction_claimed(&self, hash: &str) -> bool {
        self.transactions.contains(hash)
    }

    pub fn claim_order(&mut self, order_id: &str) {
        self.orders.insert(order_id.to_string());
    }

    pub fn order_claimed(&self, order_id: &str) -> bool {
        self.orders.contains(order_id)
    }
}

/// Everything a run decided, ready to be applied to the store.
#[derive(Debug, Clone, Default)]
pub struct MatchPlan {
    pub commission_links: Vec<CommissionLink>,
    pub order_matches: Vec<OrderMatch>,
}

/// Runs the full pipeline over unmatched work: commission linking first,
/// then transaction-to-order pairing.
///
/// Inputs are re-sorted by hash and order id so the outcome does not depend
/// on arrival order. Each transaction pairs with the first order that passes
/// the date window, the amount tolerance, and either a bank-reference match
/// or a payer similarity strictly above the name threshold.
pub fn plan_matches(
    transactions: &[BankTransaction],
    orders: &[Order],
    config: &Config,
) -> MatchPlan {
    let mut transactions = transactions.to_vec();
    transactions.sort_by(|a, b| a.hash.cmp(&b.hash));
    let mut orders = orders.to_vec();
    orders.sort_by(|a, b| a.order_id.cmp(&b.order_id));

    let mut claims = ClaimSet::new();
    let commission_links = link_commissions(&transactions, &mut claims, &config.commission);

    let mut order_matches = Vec::new();
    for tx in &transactions {
        if claims.transaction_claimed(&tx.hash) {
            continue;
        }
        for order in &orders {
            if claims.order_claimed(&order.order_id) {
                continue;
            }
            if let Some(decided) = evaluate(tx, order, &config.matching) {
                claims.claim_transaction(&tx.hash);
                claims.claim_order(&order.order_id);
                order_matches.push(decided);
                break;
            }
        }
    }

    MatchPlan {
        commission_links,
        order_matches,
    }
}

fn evaluate(tx: &BankTransaction, order: &Order, config: &MatchingConfig) -> Option<OrderMatch> {
    let tx_date = tx.transaction_date?;
    let order_date = order.order_date?;

    let delta = (tx_date - order_date).num_days();
    if delta < -config.days_before || delta > config.days_after {
        return None;
    }

    let diff_amount = (tx.credit_amount - order.amount_total_fee).abs();
    if diff_amount > config.amount_tolerance {
        return None;
    }

    let reference_match = references_equal(
        tx.extracted_reference.as_deref(),
        order.order_bank_reference.as_deref(),
    );
    let score = name_score(&tx.payer_sender, &order.customer_name);
    if !reference_match && score <= config.name_threshold {
        return None;
    }

    Some(OrderMatch {
        transaction_hash: tx.hash.clone(),
        order_id: order.order_id.clone(),
        reference_match,
        name_score: score,
        diff_days: delta.abs(),
        diff_amount,
    })
}
