use std::collections::HashSet;

use conciliar_core::{BankTransaction, CommissionConfig, CommissionLink};

use crate::matching::ClaimSet;
use crate::reference::references_equal;
use crate::similar::name_score;

/// Pairs small commission credits with the larger payment they belong to.
///
/// A transaction is a commission candidate when its credit falls inside the
/// configured band, and a main candidate when its credit exceeds the floor.
/// Both sides need a date, and candidates further apart than the day gap are
/// never considered. A shared bank reference scores 100 outright; otherwise
/// payer similarity must clear the name floor. The best-scoring main wins,
/// first seen on ties, and the pair links only when that score reaches the
/// link threshold.
///
/// Linked commissions are claimed so later passes skip them. Mains stay
/// available for order matching, but each anchors at most one commission.
pub fn link_commissions(
    transactions: &[BankTransaction],
    claims: &mut ClaimSet,
    config: &CommissionConfig,
) -> Vec<CommissionLink> {
    let mut links = Vec::new();
    let mut used_mains: HashSet<String> = HashSet::new();

    for commission in transactions {
        if claims.transaction_claimed(&commission.hash) {
            continue;
        }
        let commission_date = match commission.transaction_date {
            Some(date) => date,
            None => continue,
        };
        if commission.credit_amount < config.band_min || commission.credit_amount > config.band_max
        {
            continue;
        }

        let mut best: Option<(&BankTransaction, u32)> = None;
        for main in transactions {
            if main.hash == commission.hash
                || used_mains.contains(&main.hash)
                || claims.transaction_claimed(&main.hash)
            {
                continue;
            }
            if main.credit_amount <= config.main_floor {
                continue;
            }
            let main_date = match main.transaction_date {
                Some(date) => date,
                None => continue,
            };
            if (commission_date - main_date).num_days().abs() > config.max_day_gap {
                continue;
            }

            let score = if references_equal(
                commission.extracted_reference.as_deref(),
                main.extracted_reference.as_deref(),
            ) {
                100
            } else {
                let score = name_score(&commission.payer_sender, &main.payer_sender);
                if score < config.name_floor {
                    continue;
                }
                score
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((main, score));
            }
        }

        if let Some((main, score)) = best {
            if score >= config.link_threshold {
                links.push(CommissionLink {
                    main_hash: main.hash.clone(),
                    commission_hash: commission.hash.clone(),
                    score,
                });
                claims.claim_transaction(&commission.hash);
                used_mains.insert(main.hash.clone());
            }
        }
    }
    links
}
