pub mod columns;
pub mod commission;
pub mod csv;
pub mod fingerprint;
pub mod ingest;
pub mod matching;
pub mod normalize;
pub mod orders;
pub mod reference;
pub mod similar;
pub mod value;

pub use columns::{column_index, find_column, resolve_columns, MissingColumns, ResolvedColumns};
pub use commission::link_commissions;
pub use self::csv::{read_rows, CsvError, CsvTable};
pub use fingerprint::fingerprint;
pub use ingest::{prepare, prepare_file, IngestError, PreparedBatch};
pub use matching::{plan_matches, ClaimSet, MatchPlan};
pub use normalize::{fold_ascii, normalize_description, normalize_name, strip_punctuation};
pub use orders::{parse_orders, read_orders, OrderBatch, OrderLoadError};
pub use reference::{extract_reference, references_equal};
pub use similar::{levenshtein, name_score};
pub use value::{parse_amount, parse_date};
