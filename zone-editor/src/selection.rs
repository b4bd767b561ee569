//! Multi-select state for city chips

use std::collections::BTreeSet;

use shared::models::CityId;

/// Set of highlighted city ids
///
/// May span several zones and the unassigned pool. Transfers do not clear
/// it; the session does after a successful drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<CityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership; returns whether the city is now selected
    pub fn toggle(&mut self, id: CityId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replace the selection with `ids`
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = CityId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: CityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> Vec<CityId> {
        self.ids.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = CityId> + '_ {
        self.ids.iter().copied()
    }
}
