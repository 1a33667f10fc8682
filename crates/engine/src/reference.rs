use std::sync::OnceLock;

use regex::Regex;

static REFERENCE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn reference_pattern() -> &'static Regex {
    REFERENCE_PATTERN.get_or_init(|| {
        Regex::new(r"[A-Z]{2}[0-9]{6}").expect("reference pattern is valid")
    })
}

/// First bank-reference code (two uppercase letters followed by six digits)
/// in the text, scanning left to right.
///
/// Expects normalized-description input: already uppercased and free of
/// whitespace, so a code the bank printed as `AB 123456` has been joined
/// back together before the scan.
pub fn extract_reference(text: &str) -> Option<String> {
    reference_pattern().find(text).map(|m| m.as_str().to_string())
}

/// True when both sides carry a reference and the codes agree, ignoring
/// ASCII case and surrounding whitespace. Absent or blank references never
/// agree with anything.
pub fn references_equal(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => {
            let a = a.trim();
            !a.is_empty() && a.eq_ignore_ascii_case(b.trim())
        }
        _ => false,
    }
}
