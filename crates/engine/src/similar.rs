use crate::normalize::strip_punctuation;

/// Levenshtein edit distance using the two-row O(min(m,n)) space algorithm.
pub fn levenshtein(s1: &str, s2: &str) -> usize {
    let a = s1.as_bytes();
    let b = s2.as_bytes();
    let (m, n) = (a.len(), b.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Keep the shorter string in the inner loop to minimise allocation.
    let (a, b, m, n) = if m <= n { (a, b, m, n) } else { (b, a, n, m) };

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Fuzzy name similarity in 0–100.
///
/// Both names are reduced to a comparison form first — punctuation stripped,
/// lowercased, whitespace collapsed — then scored as
/// `100 − round(100 · distance / max_len)`. Two blank names score 0, never
/// 100: an empty payer must not fuzzy-match anything.
pub fn name_score(a: &str, b: &str) -> u32 {
    let a = comparison_form(a);
    let b = comparison_form(b);

    if a.is_empty() && b.is_empty() {
        return 0;
    }
    if a == b {
        return 100;
    }

    let max_len = a.len().max(b.len());
    let distance = levenshtein(&a, &b);
    let penalty = (100 * distance + max_len / 2) / max_len; // round half up
    100u32.saturating_sub(penalty as u32)
}

fn comparison_form(name: &str) -> String {
    strip_punctuation(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
