//! Small sequence and string helpers shared by the expander and tiles.

/// Split `items` at the first element matching `pred`.
///
/// Everything before the first match goes left. The first match and
/// everything after it go right, whether or not later items match.
pub fn partition_at<T>(items: &[T], pred: impl FnMut(&T) -> bool) -> (&[T], &[T]) {
    let at = items.iter().position(pred).unwrap_or(items.len());
    items.split_at(at)
}

/// A flag that reads `true` on the first call and `false` ever after.
pub fn first_only() -> impl FnMut() -> bool {
    let mut fresh = true;
    move || std::mem::replace(&mut fresh, false)
}

/// Normalize free text into a CSS-style class name.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `_`, and trims one separator from each end. Empty results become
/// `"none"`; results starting with a digit get a `class_` prefix.
pub fn to_class_name(text: &str) -> String {
    const IF_NONE: &str = "none";
    const NUMERIC_PREFIX: &str = "class_";

    let mut collapsed = String::with_capacity(text.len() + 2);
    let mut in_run = false;
    for c in format!("_{}_", text).to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            collapsed.push(c);
            in_run = false;
        } else if !in_run {
            collapsed.push('_');
            in_run = true;
        }
    }

    // Both ends are always `_` here, and everything is ASCII.
    let trimmed = if collapsed.len() >= 2 {
        &collapsed[1..collapsed.len() - 1]
    } else {
        ""
    };

    if trimmed.is_empty() || trimmed == "_" {
        IF_NONE.to_string()
    } else if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{NUMERIC_PREFIX}{trimmed}")
    } else {
        trimmed.to_string()
    }
}
