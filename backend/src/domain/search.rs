//! In-memory search over a location's preloaded checklist.

use std::collections::HashSet;

use super::ChecklistItem;

/// Case-insensitive substring match on descriptions, skipping completed items.
///
/// A blank query returns nothing rather than everything. Surrounding
/// whitespace only decides blankness; a non-blank query matches as typed.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use audit_backend::domain::filter_descriptions;
///
/// assert!(filter_descriptions(&[], "fire", &HashSet::new()).is_empty());
/// ```
pub fn filter_descriptions<'a>(
    checklist: &'a [ChecklistItem],
    query: &str,
    completed: &HashSet<String>,
) -> Vec<&'a ChecklistItem> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    checklist
        .iter()
        .filter(|item| !completed.contains(&item.unique_id))
        .filter(|item| item.description.to_lowercase().contains(&needle))
        .collect()
}
