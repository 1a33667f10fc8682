pub mod config;
pub mod decision;
pub mod order;
pub mod report;
pub mod status;
pub mod transaction;

pub use config::{ColumnOverrides, CommissionConfig, Config, ConfigError, MatchingConfig};
pub use decision::{CommissionLink, OrderMatch};
pub use order::Order;
pub use report::{Diagnostics, IngestReport, MatchReport, OrderLoadReport, StatusReport};
pub use status::{LinkStatus, ReconciliationStatus};
pub use transaction::BankTransaction;
