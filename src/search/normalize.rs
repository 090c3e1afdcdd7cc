//! Text canonicalization shared by indexing and query scoring.

use regex::Regex;
use std::sync::LazyLock;

/// Anything that is not a letter, a number, whitespace, `#` or `-`.
static STRIPPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s#-]").unwrap());

/// Canonicalizes free text so substring comparisons are stable.
///
/// - lower-cases the whole string (context-sensitive rules like final sigma
///   apply), then folds `ё` to `е`
/// - turns every character outside the letter and number categories, other than
///   whitespace, `#` and `-`, into a separator
/// - collapses whitespace runs to a single space and trims the ends
///
/// Idempotent and order-preserving.
pub fn normalize(text: &str) -> String {
    let folded = text.to_lowercase().replace('ё', "е");
    let separated = STRIPPED.replace_all(&folded, " ");

    let mut out = String::with_capacity(separated.len());
    for word in separated.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// [`normalize`] for optional text; absent text is empty.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}
