pub mod db;
pub mod store;

pub use db::{connect, connect_memory, DbPool};
pub use store::{
    apply_commission_link, apply_order_match, insert_transaction, status_counts, unmatched_orders,
    unmatched_transactions, upsert_order, StoreError,
};
