//! Specialized collection types

/// How a removed entry leaves an [`OrderedSlots`] list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Shift the following entries down, shortening the list
    Splice,
    /// Leave an empty slot behind so indices of later entries stay stable
    Tombstone,
}

/// Insertion-ordered list of unique values with optional tombstones
///
/// Iteration order is insertion order and tombstoned slots are skipped.
/// Tombstones are useful when a list is being walked while entries are removed.
#[derive(Debug, Clone)]
pub struct OrderedSlots<T> {
    items: Vec<Option<T>>,
}

impl<T: Copy + PartialEq> OrderedSlots<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append `item` unless it is already present
    ///
    /// Returns `false` when the item was already in the list.
    pub fn push_unique(&mut self, item: T) -> bool {
        if self.contains(item) {
            return false;
        }
        self.items.push(Some(item));
        true
    }

    /// Whether `item` occupies a slot
    pub fn contains(&self, item: T) -> bool {
        self.position(item).is_some()
    }

    /// Slot index of `item`
    pub fn position(&self, item: T) -> Option<usize> {
        self.items.iter().position(|slot| *slot == Some(item))
    }

    /// Remove `item`, returning whether it was present
    pub fn remove(&mut self, item: T, removal: Removal) -> bool {
        let Some(index) = self.position(item) else {
            return false;
        };
        match removal {
            Removal::Splice => {
                self.items.remove(index);
            }
            Removal::Tombstone => self.items[index] = None,
        }
        true
    }

    /// Put `new` into the slot occupied by `old`
    pub fn replace(&mut self, old: T, new: T) -> bool {
        match self.position(old) {
            Some(index) => {
                self.items[index] = Some(new);
                true
            }
            None => false,
        }
    }

    /// Drop all tombstones
    pub fn compact(&mut self) {
        self.items.retain(Option::is_some);
    }

    /// Live values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.items.iter().filter_map(|slot| *slot)
    }

    /// Snapshot of live values, for walking the list while mutating its owner
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: Copy + PartialEq> Default for OrderedSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}
