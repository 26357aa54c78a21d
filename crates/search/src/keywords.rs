use crate::intent::IntentResolution;

/// Recognized slot values in slot order; empty slots are skipped
pub fn extract_keywords(resolution: &IntentResolution) -> Vec<String> {
    resolution
        .slots
        .iter()
        .filter_map(|slot| slot.original_value.as_deref())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .collect()
}
