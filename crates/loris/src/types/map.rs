//! Persistent map backed by a flat entry array.
//!
//! The unsorted form preserves insertion order: `assoc` of an existing key
//! replaces in place, `assoc` of a new key appends, and iteration walks
//! the entry array. The sorted form keeps entries ordered by `compare` on
//! keys; probing or inserting a key that does not compare against the
//! resident keys is a TypeError.
//!
//! Lookup is linear (or binary for the sorted form). That is the intended
//! baseline for this core: maps are small, and the entry array keeps
//! iteration order exact.

use std::cmp::Ordering;

use crate::{
    exception::RunResult,
    heap::Heap,
    intern::Interns,
    resource::ResourceTracker,
    types::CljTrait,
    value::Value,
};

/// One key/value entry.
#[derive(Debug, Clone, Copy)]
pub struct MapEntry {
    pub key: Value,
    pub value: Value,
}

/// A persistent map.
#[derive(Debug, Clone, Default)]
pub struct PersistentMap {
    entries: Vec<MapEntry>,
    sorted: bool,
}

impl PersistentMap {
    /// An empty insertion-ordered map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map ordered by `compare` on keys.
    #[must_use]
    pub fn new_sorted() -> Self {
        Self {
            entries: Vec::new(),
            sorted: true,
        }
    }

    /// Wraps an already-valid entry array (distinct keys; ordered when
    /// `sorted`).
    #[must_use]
    pub fn from_entries(entries: Vec<MapEntry>, sorted: bool) -> Self {
        Self { entries, sorted }
    }

    /// Whether this map keeps its entries ordered by `compare`.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Entry count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in iteration order.
    #[must_use]
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    /// Index of `key`, or `None` when absent.
    ///
    /// Errors only on a sorted map probed with an incomparable key.
    pub fn index_of(
        &self,
        key: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Option<usize>> {
        if self.sorted {
            return Ok(self.sorted_search(key, heap, interns)?.ok());
        }
        Ok(self
            .entries
            .iter()
            .position(|entry| entry.key.clj_eql(key, heap, interns)))
    }

    /// The value for `key`, or `None` when absent.
    pub fn get(
        &self,
        key: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Option<Value>> {
        Ok(self.index_of(key, heap, interns)?.map(|i| self.entries[i].value))
    }

    /// A new map with `key` bound to `value`.
    pub fn assoc(
        &self,
        key: Value,
        value: Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Self> {
        let mut entries = self.entries.clone();
        if self.sorted {
            match self.sorted_search(&key, heap, interns)? {
                Ok(index) => entries[index].value = value,
                Err(insert_at) => entries.insert(insert_at, MapEntry { key, value }),
            }
        } else {
            match self.index_of(&key, heap, interns)? {
                Some(index) => entries[index].value = value,
                None => entries.push(MapEntry { key, value }),
            }
        }
        Ok(Self {
            entries,
            sorted: self.sorted,
        })
    }

    /// A new map without `key`; absent keys are a no-op.
    pub fn dissoc(
        &self,
        key: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Self> {
        let Some(index) = self.index_of(key, heap, interns)? else {
            return Ok(self.clone());
        };
        let mut entries = self.entries.clone();
        entries.remove(index);
        Ok(Self {
            entries,
            sorted: self.sorted,
        })
    }

    /// Order-insensitive structural equality against another map.
    pub fn eql_map(
        &self,
        other: &Self,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        self.entries.iter().all(|entry| {
            // A failed sorted probe just means "not equal".
            matches!(
                other.get(&entry.key, heap, interns),
                Ok(Some(v)) if v.clj_eql(&entry.value, heap, interns)
            )
        })
    }

    /// Binary search over the sorted entry array.
    ///
    /// `Ok(Ok(i))` is a hit at `i`; `Ok(Err(i))` is the insertion point.
    fn sorted_search(
        &self,
        key: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Result<usize, usize>> {
        let mut low = 0usize;
        let mut high = self.entries.len();
        while low < high {
            let mid = (low + high) / 2;
            match key.compare(&self.entries[mid].key, heap, interns)? {
                Ordering::Less => high = mid,
                Ordering::Greater => low = mid + 1,
                Ordering::Equal => return Ok(Ok(mid)),
            }
        }
        Ok(Err(low))
    }
}
