//! Owner grouping over a business line's checklist.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ChecklistItem;

/// Progress for one owner bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerTally {
    #[schema(example = "Ops")]
    pub owner: String,
    pub total: u64,
    pub completed: u64,
}

impl OwnerTally {
    /// Items still open for this owner.
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.completed)
    }
}

/// Owners with work left, sorted by name.
///
/// Items with a blank owner are ignored and owners whose every item is in
/// `completed` are dropped. An empty result means the location is fully
/// audited.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use audit_backend::domain::tally_owners;
///
/// let tallies = tally_owners(&[], &HashSet::new());
/// assert!(tallies.is_empty());
/// ```
pub fn tally_owners(checklist: &[ChecklistItem], completed: &HashSet<String>) -> Vec<OwnerTally> {
    let mut by_owner: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for item in checklist.iter().filter(|item| item.has_owner()) {
        let entry = by_owner.entry(item.owner.as_str()).or_default();
        entry.0 += 1;
        if completed.contains(&item.unique_id) {
            entry.1 += 1;
        }
    }

    by_owner
        .into_iter()
        .filter(|(_, (total, done))| done < total)
        .map(|(owner, (total, done))| OwnerTally {
            owner: owner.to_owned(),
            total,
            completed: done,
        })
        .collect()
}

/// Items still to be scored for a location, preserving checklist order.
pub fn incomplete_items(
    items: Vec<ChecklistItem>,
    completed: &HashSet<String>,
) -> Vec<ChecklistItem> {
    items
        .into_iter()
        .filter(|item| !completed.contains(&item.unique_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checklist::fixtures::item;
    use rstest::{fixture, rstest};

    #[fixture]
    fn checklist() -> Vec<ChecklistItem> {
        vec![
            item("1", "Ops", "Fire exits clear"),
            item("2", "Ops", "Lights working"),
            item("3", "Finance", "Till balanced"),
            item("4", "", "Orphaned question"),
            item("5", "Admin", "Rota posted"),
        ]
    }

    fn done(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| (*id).to_owned()).collect()
    }

    #[rstest]
    fn groups_sorted_and_skips_blank_owner(checklist: Vec<ChecklistItem>) {
        let tallies = tally_owners(&checklist, &done(&["1"]));
        let owners: Vec<_> = tallies.iter().map(|t| t.owner.as_str()).collect();
        assert_eq!(owners, ["Admin", "Finance", "Ops"]);
        let ops = tallies.iter().find(|t| t.owner == "Ops").expect("ops present");
        assert_eq!((ops.total, ops.completed, ops.remaining()), (2, 1, 1));
    }

    #[rstest]
    fn drops_fully_completed_owners(checklist: Vec<ChecklistItem>) {
        let tallies = tally_owners(&checklist, &done(&["1", "2", "5"]));
        let owners: Vec<_> = tallies.iter().map(|t| t.owner.as_str()).collect();
        assert_eq!(owners, ["Finance"]);
    }

    #[rstest]
    fn everything_completed_yields_no_owners(checklist: Vec<ChecklistItem>) {
        // The blank-owner item does not keep the location open.
        let tallies = tally_owners(&checklist, &done(&["1", "2", "3", "5"]));
        assert!(tallies.is_empty());
    }

    #[rstest]
    fn incomplete_items_excludes_completed(checklist: Vec<ChecklistItem>) {
        let remaining = incomplete_items(checklist, &done(&["2", "3"]));
        let ids: Vec<_> = remaining.iter().map(|i| i.unique_id.as_str()).collect();
        assert_eq!(ids, ["1", "4", "5"]);
    }
}
