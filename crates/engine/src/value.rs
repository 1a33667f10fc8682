use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Date formats tried in order; the first that parses wins, so ambiguous
/// inputs like `03/04/2025` resolve day-first. The two-digit-year forms come
/// first because chrono's `%Y` also accepts two digits and would read
/// `31.12.24` as the literal year 24; `%y` fails on four-digit years, so the
/// early position costs nothing.
const DATE_FORMATS: [&str; 9] = [
    "%d.%m.%y",
    "%d/%m/%y",
    "%m/%d/%y",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
];

/// ISO datetime forms; only the date part is kept.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

const CURRENCY_SYMBOLS: [char; 4] = ['$', '€', '£', '¥'];

/// Parses a statement date cell. `None` means the caller should skip the row
/// and record a diagnostic; a batch never aborts over one bad date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    None
}

/// Parses an amount cell that may use US (`1,234.56`) or European
/// (`1.234,56`) separators, with optional currency symbols.
///
/// Disambiguation is a dot/comma census. When both separators appear the
/// later one is the decimal point; a decimal comma must carry exactly one or
/// two trailing digits, so `"1,234"` stays ambiguous grouping and is
/// rejected rather than guessed at.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let stripped = raw.trim().replace(CURRENCY_SYMBOLS, "");
    let cleaned = stripped.trim();
    if cleaned.is_empty() || cleaned.chars().any(char::is_whitespace) {
        return None;
    }

    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();

    let candidate = if dots > 1 && commas == 0 {
        return None;
    } else if commas > 1 {
        return None;
    } else if dots > 0 && commas == 1 {
        // Both separators present; the later one is the decimal point.
        let last_dot = cleaned.rfind('.')?;
        let last_comma = cleaned.rfind(',')?;
        if last_dot > last_comma {
            cleaned.replace(',', "")
        } else {
            if !has_decimal_comma_tail(cleaned) {
                return None;
            }
            cleaned.replace('.', "").replace(',', ".")
        }
    } else if commas == 1 {
        if !has_decimal_comma_tail(cleaned) {
            return None;
        }
        cleaned.replace(',', ".")
    } else {
        cleaned.to_string()
    };

    if !is_plain_decimal(&candidate) {
        return None;
    }
    candidate.parse::<Decimal>().ok()
}

/// A decimal comma is only believable with one or two digits after it.
fn has_decimal_comma_tail(s: &str) -> bool {
    match s.rsplit_once(',') {
        Some((_, tail)) => {
            (1..=2).contains(&tail.len()) && tail.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// `-?digits(.digits)?` — the only shape handed to the decimal parser.
fn is_plain_decimal(s: &str) -> bool {
    let body = s.strip_prefix('-').unwrap_or(s);
    if body.is_empty() {
        return false;
    }
    match body.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => body.bytes().all(|b| b.is_ascii_digit()),
    }
}
