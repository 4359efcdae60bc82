use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::Question;

static NON_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9]").expect("NON_DIGITS is a valid regex pattern"));

/// All digits of `id` read as one integer, e.g. "q1c12" -> 112.
pub fn numeric_part(id: &str) -> Option<u128> {
    let digits = NON_DIGITS.replace_all(id, "");
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Numeric-aware id comparison: by the numeric part when both ids have one
/// and they differ, otherwise by the full string.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (numeric_part(a), numeric_part(b)) {
        (Some(x), Some(y)) if x != y => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Stable in-place sort by `compare_ids`.
///
/// `compare_ids` is not transitive when numbered and unnumbered ids mix, and
/// the std sorts may panic on such comparators, so this is an insertion sort.
pub fn sort_questions(questions: &mut [Question]) {
    for i in 1..questions.len() {
        let mut j = i;
        while j > 0 && compare_ids(&questions[j - 1].id, &questions[j].id) == Ordering::Greater {
            questions.swap(j - 1, j);
            j -= 1;
        }
    }
}
