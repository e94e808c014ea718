//! FILENAME: core/fact-table/src/field.rs
//! Field Cache - Per-column value interning.
//!
//! Each unique value of a column is stored once and referenced by index.
//! Records hold vectors of these indices, which makes group-by keys small,
//! cheap to hash and cheap to compare.

use rustc_hash::FxHashMap;
use crate::value::FactValue;

/// A reference to an interned value within a field's unique value store.
/// Using u32 to save memory (supports up to 4B unique values per field).
pub type ValueId = u32;

/// Cache for a single column of the fact table.
/// Stores unique values and provides O(1) lookup by ValueId.
#[derive(Debug, Clone, Default)]
pub struct FieldCache {
    /// Map from value to its unique ID (for deduplication during build).
    value_to_id: FxHashMap<FactValue, ValueId>,

    /// Ordered list of unique values (indexed by ValueId).
    id_to_value: Vec<FactValue>,

    /// Position of each ValueId in the ascending natural order of the
    /// values, indexed by ValueId. Built once when the table is sealed.
    /// Lets callers sort group keys without touching the values.
    rank: Vec<u32>,
}

impl FieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a value and returns its ValueId.
    /// If the value already exists, returns the existing ID.
    pub fn intern(&mut self, value: FactValue) -> ValueId {
        if let Some(&id) = self.value_to_id.get(&value) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(value.clone());
        self.value_to_id.insert(value, id);
        id
    }

    /// Gets the value for a given ID.
    pub fn get_value(&self, id: ValueId) -> Option<&FactValue> {
        self.id_to_value.get(id as usize)
    }

    /// Returns the number of unique values.
    pub fn unique_count(&self) -> usize {
        self.id_to_value.len()
    }

    /// Position of a value in the ascending order of this field.
    pub fn rank_of(&self, id: ValueId) -> u32 {
        self.rank.get(id as usize).copied().unwrap_or(u32::MAX)
    }

    /// Iterates over the unique values with their IDs.
    pub fn values(&self) -> impl Iterator<Item = (ValueId, &FactValue)> {
        self.id_to_value
            .iter()
            .enumerate()
            .map(|(id, value)| (id as ValueId, value))
    }

    /// Rebuilds the rank of every unique value.
    pub(crate) fn seal(&mut self) {
        let values = &self.id_to_value;
        let mut sorted: Vec<ValueId> = (0..values.len() as ValueId).collect();
        sorted.sort_by(|&a, &b| values[a as usize].cmp(&values[b as usize]));

        let mut rank = vec![0u32; values.len()];
        for (position, &id) in sorted.iter().enumerate() {
            rank[id as usize] = position as u32;
        }

        self.rank = rank;
    }
}
