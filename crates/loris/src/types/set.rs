//! Persistent set: a map keyed by element with unit values, collapsed to
//! a bare element array.

use std::cmp::Ordering;

use crate::{
    exception::RunResult,
    heap::Heap,
    intern::Interns,
    resource::ResourceTracker,
    types::CljTrait,
    value::Value,
};

/// A persistent set.
#[derive(Debug, Clone, Default)]
pub struct PersistentSet {
    items: Vec<Value>,
    sorted: bool,
}

impl PersistentSet {
    /// An empty unordered set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty set ordered by `compare`.
    #[must_use]
    pub fn new_sorted() -> Self {
        Self {
            items: Vec::new(),
            sorted: true,
        }
    }

    /// Wraps an already-valid element array (distinct; ordered when
    /// `sorted`).
    #[must_use]
    pub fn from_items(items: Vec<Value>, sorted: bool) -> Self {
        Self { items, sorted }
    }

    /// Whether this set keeps its elements ordered by `compare`.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Element count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether the set has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The elements in iteration order.
    #[must_use]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Index of `value`, or `None` when absent.
    pub fn index_of(
        &self,
        value: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Option<usize>> {
        if self.sorted {
            return Ok(self.sorted_search(value, heap, interns)?.ok());
        }
        Ok(self.items.iter().position(|item| item.clj_eql(value, heap, interns)))
    }

    /// The stored element equal to `value`, or `None`.
    pub fn get(
        &self,
        value: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Option<Value>> {
        Ok(self.index_of(value, heap, interns)?.map(|i| self.items[i]))
    }

    /// A new set containing `value`.
    pub fn conj(
        &self,
        value: Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Self> {
        let mut items = self.items.clone();
        if self.sorted {
            if let Err(insert_at) = self.sorted_search(&value, heap, interns)? {
                items.insert(insert_at, value);
            }
        } else if self.index_of(&value, heap, interns)?.is_none() {
            items.push(value);
        }
        Ok(Self {
            items,
            sorted: self.sorted,
        })
    }

    /// A new set without `value`; absent elements are a no-op.
    pub fn disj(
        &self,
        value: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Self> {
        let Some(index) = self.index_of(value, heap, interns)? else {
            return Ok(self.clone());
        };
        let mut items = self.items.clone();
        items.remove(index);
        Ok(Self {
            items,
            sorted: self.sorted,
        })
    }

    /// Membership-based structural equality against another set.
    pub fn eql_set(
        &self,
        other: &Self,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> bool {
        if self.items.len() != other.items.len() {
            return false;
        }
        self.items
            .iter()
            .all(|item| matches!(other.index_of(item, heap, interns), Ok(Some(_))))
    }

    fn sorted_search(
        &self,
        value: &Value,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
    ) -> RunResult<Result<usize, usize>> {
        let mut low = 0usize;
        let mut high = self.items.len();
        while low < high {
            let mid = (low + high) / 2;
            match value.compare(&self.items[mid], heap, interns)? {
                Ordering::Less => high = mid,
                Ordering::Greater => low = mid + 1,
                Ordering::Equal => return Ok(Ok(mid)),
            }
        }
        Ok(Err(low))
    }
}
