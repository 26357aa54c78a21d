//! Label reconciliation between detected and user-supplied labels

use std::collections::BTreeSet;

/// Split a comma-separated label string into trimmed, lower-cased, non-empty labels
pub fn parse_custom_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|label| label.trim().to_lowercase())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Union of both label sources.
///
/// Detected labels are taken whole; custom entries may be comma-separated
/// lists. The result has no duplicates and no blank labels.
pub fn reconcile<D, C>(detected: &[D], custom: &[C]) -> BTreeSet<String>
where
    D: AsRef<str>,
    C: AsRef<str>,
{
    let detected = detected
        .iter()
        .map(|label| label.as_ref().trim().to_lowercase())
        .filter(|label| !label.is_empty());

    custom
        .iter()
        .flat_map(|entry| parse_custom_labels(entry.as_ref()))
        .chain(detected)
        .collect()
}
