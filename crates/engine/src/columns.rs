use conciliar_core::ColumnOverrides;
use thiserror::Error;

/// Built-in header synonyms per canonical statement field. Matching is
/// case-insensitive on trimmed text; earlier entries win, so each list is
/// ordered most-specific first.
pub const DATE_SYNONYMS: &[&str] = &["date", "fecha", "transaction date", "trans date", "value date"];
pub const PAYER_SYNONYMS: &[&str] = &[
    "payee/sender",
    "payee",
    "sender",
    "payer",
    "name",
    "customer",
    "remitente",
    "pagador",
];
pub const CREDIT_SYNONYMS: &[&str] = &[
    "credits",
    "credit",
    "credit amount",
    "amount",
    "credito",
    "monto",
];
pub const DESCRIPTION_SYNONYMS: &[&str] = &[
    "description",
    "details",
    "narrative",
    "memo",
    "reference",
    "descripcion",
    "detalle",
];
pub const BALANCE_SYNONYMS: &[&str] = &["balance", "saldo", "running balance"];
pub const DEBIT_SYNONYMS: &[&str] = &["debits", "debit", "debit amount", "debito"];

/// Raised when a statement file lacks one or more required columns; lists
/// every missing canonical field so the operator fixes the file once.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("missing required columns: {}", .missing.join(", "))]
pub struct MissingColumns {
    pub missing: Vec<String>,
}

/// Positions of the resolved statement columns within the header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    pub date: usize,
    pub payer: usize,
    pub credit: usize,
    pub description: usize,
    pub balance: Option<usize>,
    pub debit: Option<usize>,
}

/// Index of the first header matching any synonym, in synonym order: the
/// synonym list is the preference order, not the header row.
pub fn column_index(headers: &[String], synonyms: &[&str], extras: &[String]) -> Option<usize> {
    let candidates = synonyms
        .iter()
        .map(|s| s.trim().to_lowercase())
        .chain(extras.iter().map(|s| s.trim().to_lowercase()));
    for candidate in candidates {
        if let Some(index) = headers
            .iter()
            .position(|h| h.trim().to_lowercase() == candidate)
        {
            return Some(index);
        }
    }
    None
}

/// Like [`column_index`] but returns the original header label.
pub fn find_column<'a>(headers: &'a [String], synonyms: &[&str], extras: &[String]) -> Option<&'a str> {
    column_index(headers, synonyms, extras).map(|i| headers[i].as_str())
}

/// Resolves the statement columns, with configured extra synonyms appended
/// after the built-ins. Date, payer, credit and description are required;
/// balance and debit are optional.
pub fn resolve_columns(
    headers: &[String],
    overrides: &ColumnOverrides,
) -> Result<ResolvedColumns, MissingColumns> {
    let date = column_index(headers, DATE_SYNONYMS, &overrides.date);
    let payer = column_index(headers, PAYER_SYNONYMS, &overrides.payer);
    let credit = column_index(headers, CREDIT_SYNONYMS, &overrides.credit);
    let description = column_index(headers, DESCRIPTION_SYNONYMS, &overrides.description);

    let mut missing = Vec::new();
    if date.is_none() {
        missing.push("date".to_string());
    }
    if payer.is_none() {
        missing.push("payer".to_string());
    }
    if credit.is_none() {
        missing.push("credit".to_string());
    }
    if description.is_none() {
        missing.push("description".to_string());
    }
    match (date, payer, credit, description) {
        (Some(date), Some(payer), Some(credit), Some(description)) => Ok(ResolvedColumns {
            date,
            payer,
            credit,
            description,
            balance: column_index(headers, BALANCE_SYNONYMS, &overrides.balance),
            debit: column_index(headers, DEBIT_SYNONYMS, &overrides.debit),
        }),
        _ => Err(MissingColumns { missing }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_english_headers() {
        let h = headers(&["Date", "Payee/Sender", "Credits", "Description", "Balance"]);
        let cols = resolve_columns(&h, &ColumnOverrides::default()).unwrap();
        assert_eq!(cols.date, 0);
        assert_eq!(cols.payer, 1);
        assert_eq!(cols.credit, 2);
        assert_eq!(cols.description, 3);
        assert_eq!(cols.balance, Some(4));
        assert_eq!(cols.debit, None);
    }

    #[test]
    fn resolves_spanish_headers() {
        let h = headers(&["Fecha", "Remitente", "Monto", "Detalle", "Saldo", "Debito"]);
        let cols = resolve_columns(&h, &ColumnOverrides::default()).unwrap();
        assert_eq!(cols.date, 0);
        assert_eq!(cols.payer, 1);
        assert_eq!(cols.credit, 2);
        assert_eq!(cols.description, 3);
        assert_eq!(cols.balance, Some(4));
        assert_eq!(cols.debit, Some(5));
    }

    #[test]
    fn matching_is_case_insensitive_and_trimmed() {
        let h = headers(&["  TRANSACTION DATE ", "PAYER", "credit AMOUNT", "Memo"]);
        assert!(resolve_columns(&h, &ColumnOverrides::default()).is_ok());
    }

    #[test]
    fn synonym_order_beats_header_order() {
        // Both "amount" and "credit" are present; "credit" is the earlier
        // synonym even though "amount" comes first in the file.
        let h = headers(&["date", "payer", "amount", "credit", "description"]);
        let cols = resolve_columns(&h, &ColumnOverrides::default()).unwrap();
        assert_eq!(cols.credit, 3);
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let h = headers(&["Date", "Details"]);
        let err = resolve_columns(&h, &ColumnOverrides::default()).unwrap_err();
        assert_eq!(err.missing, vec!["payer".to_string(), "credit".to_string()]);
        assert!(err.to_string().contains("payer, credit"));
    }

    #[test]
    fn overrides_extend_the_builtin_lists() {
        let h = headers(&["Booking Date", "Ordenante", "Credits", "Memo"]);
        let mut overrides = ColumnOverrides::default();
        assert!(resolve_columns(&h, &overrides).is_err());
        overrides.date = vec!["booking date".to_string()];
        overrides.payer = vec!["Ordenante".to_string()];
        let cols = resolve_columns(&h, &overrides).unwrap();
        assert_eq!(cols.date, 0);
        assert_eq!(cols.payer, 1);
    }

    #[test]
    fn builtins_outrank_overrides() {
        let h = headers(&["extra", "date", "payer", "credits", "memo"]);
        let mut overrides = ColumnOverrides::default();
        overrides.date = vec!["extra".to_string()];
        let cols = resolve_columns(&h, &overrides).unwrap();
        assert_eq!(cols.date, 1); // built-in "date" wins over the extra
    }

    #[test]
    fn find_column_returns_the_original_label() {
        let h = headers(&["  Credits  ", "Date"]);
        assert_eq!(
            find_column(&h, CREDIT_SYNONYMS, &[]),
            Some("  Credits  ")
        );
        assert_eq!(find_column(&h, DEBIT_SYNONYMS, &[]), None);
    }
}
