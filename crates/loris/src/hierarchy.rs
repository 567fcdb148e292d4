//! Derivation hierarchies and the `isa?` relation.
//!
//! A hierarchy is an ordinary persistent map `{:parents m, :ancestors m,
//! :descendants m}` whose `:parents` entry maps a value to the set of its
//! direct parents. Ancestors and descendants are computed on demand from
//! `:parents` — the other two keys exist for shape compatibility and stay
//! empty. Traversal is depth-limited so a malformed cyclic hierarchy
//! fails instead of hanging.

use smallvec::SmallVec;

use crate::{
    exception::{CoreError, RunResult},
    heap::{Heap, HeapData},
    intern::Interns,
    resource::ResourceTracker,
    types::{CljTrait, MapEntry, PersistentMap, PersistentSet, PrintMode},
    value::Value,
};

/// Upper bound on parent-chain traversal depth.
const MAX_DEPTH: usize = 100;

/// The process-wide hierarchy used when a multimethod has no local one.
///
/// Created lazily on first 2-arg `derive`; `reset` is the cross-test
/// isolation hook.
#[derive(Debug, Default)]
pub struct GlobalHierarchy {
    value: Option<Value>,
}

impl GlobalHierarchy {
    /// An uninitialised global hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current hierarchy value, if initialised.
    #[must_use]
    pub fn get(&self) -> Option<Value> {
        self.value
    }

    /// The hierarchy value, allocating the empty hierarchy on first use.
    pub fn get_or_init(
        &mut self,
        heap: &mut Heap<impl ResourceTracker>,
        interns: &mut Interns,
    ) -> RunResult<Value> {
        if let Some(value) = self.value {
            return Ok(value);
        }
        let value = new_hierarchy(heap, interns)?;
        self.value = Some(value);
        Ok(value)
    }

    /// Replaces the hierarchy value (read-modify-write of `derive`).
    pub fn set(&mut self, value: Value) {
        self.value = Some(value);
    }

    /// Drops the hierarchy so the next use starts fresh.
    pub fn reset(&mut self) {
        self.value = None;
    }
}

/// Allocates the empty hierarchy `{:parents {} :descendants {} :ancestors {}}`.
pub fn new_hierarchy(
    heap: &mut Heap<impl ResourceTracker>,
    interns: &mut Interns,
) -> RunResult<Value> {
    let empty_parents = heap.alloc_value(HeapData::Map(PersistentMap::new()))?;
    let empty_descendants = heap.alloc_value(HeapData::Map(PersistentMap::new()))?;
    let empty_ancestors = heap.alloc_value(HeapData::Map(PersistentMap::new()))?;
    let entries = vec![
        MapEntry {
            key: Value::Keyword(interns.kw_parents()),
            value: empty_parents,
        },
        MapEntry {
            key: Value::Keyword(interns.kw_descendants()),
            value: empty_descendants,
        },
        MapEntry {
            key: Value::Keyword(interns.kw_ancestors()),
            value: empty_ancestors,
        },
    ];
    heap.alloc_value(HeapData::Map(PersistentMap::from_entries(entries, false)))
}

/// The `:parents` map of a hierarchy value.
fn parents_map(
    h: Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
) -> RunResult<PersistentMap> {
    let Value::Ref(id) = h else {
        return Err(CoreError::type_error("hierarchy must be a map"));
    };
    let HeapData::Map(outer) = heap.get(id) else {
        return Err(CoreError::type_error("hierarchy must be a map"));
    };
    let key = Value::Keyword(interns.kw_parents());
    match outer.get(&key, heap, interns)? {
        Some(Value::Ref(parents_id)) => match heap.get(parents_id) {
            HeapData::Map(parents) => Ok(parents.clone()),
            _ => Err(CoreError::type_error("hierarchy :parents must be a map")),
        },
        Some(Value::Nil) | None => Ok(PersistentMap::new()),
        Some(_) => Err(CoreError::type_error("hierarchy :parents must be a map")),
    }
}

/// The direct parents of `child` in hierarchy `h`.
pub fn parents_of(
    h: Value,
    child: &Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
) -> RunResult<Vec<Value>> {
    let parents = parents_map(h, heap, interns)?;
    match parents.get(child, heap, interns)? {
        Some(Value::Ref(id)) => match heap.get(id) {
            HeapData::Set(set) => Ok(set.items().to_vec()),
            _ => Err(CoreError::type_error("hierarchy parent entry must be a set")),
        },
        _ => Ok(Vec::new()),
    }
}

/// The `isa?` relation.
///
/// Holds when `child` and `parent` are `eql`, when both are equal-length
/// vectors related element-wise, or when a parent chain in `h` connects
/// them.
pub fn isa(
    h: Option<Value>,
    child: &Value,
    parent: &Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
) -> RunResult<bool> {
    if child.clj_eql(parent, heap, interns) {
        return Ok(true);
    }
    if let (Value::Ref(a), Value::Ref(b)) = (child, parent)
        && let (HeapData::Vector(va), HeapData::Vector(vb)) = (heap.get(*a), heap.get(*b))
        && va.count() == vb.count()
    {
        let pairs: Vec<(Value, Value)> = va
            .as_slice()
            .iter()
            .copied()
            .zip(vb.as_slice().iter().copied())
            .collect();
        for (c, p) in pairs {
            if !isa(h, &c, &p, heap, interns)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }
    let Some(h) = h else { return Ok(false) };
    // Walk the parent relation breadth-first under the depth cap.
    let mut frontier: SmallVec<[Value; 8]> = SmallVec::new();
    frontier.push(*child);
    let mut seen: Vec<Value> = vec![*child];
    for _ in 0..MAX_DEPTH {
        if frontier.is_empty() {
            return Ok(false);
        }
        let mut next: SmallVec<[Value; 8]> = SmallVec::new();
        for current in frontier.drain(..) {
            for candidate in parents_of(h, &current, heap, interns)? {
                if candidate.clj_eql(parent, heap, interns) {
                    return Ok(true);
                }
                if !seen.iter().any(|s| s.clj_eql(&candidate, heap, interns)) {
                    seen.push(candidate);
                    next.push(candidate);
                }
            }
        }
        frontier = next;
    }
    Ok(false)
}

/// All ancestors of `x` in `h`: the transitive closure of the parent
/// relation, without duplicates.
pub fn ancestors_of(
    h: Value,
    x: &Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
) -> RunResult<Vec<Value>> {
    let mut out: Vec<Value> = Vec::new();
    let mut frontier: SmallVec<[Value; 8]> = SmallVec::new();
    frontier.push(*x);
    for _ in 0..MAX_DEPTH {
        if frontier.is_empty() {
            break;
        }
        let mut next: SmallVec<[Value; 8]> = SmallVec::new();
        for current in frontier.drain(..) {
            for candidate in parents_of(h, &current, heap, interns)? {
                if !out.iter().any(|s| s.clj_eql(&candidate, heap, interns)) {
                    out.push(candidate);
                    next.push(candidate);
                }
            }
        }
        frontier = next;
    }
    Ok(out)
}

/// All descendants of `x` in `h`, computed by scanning the parent table.
pub fn descendants_of(
    h: Value,
    x: &Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
) -> RunResult<Vec<Value>> {
    let parents = parents_map(h, heap, interns)?;
    let children: Vec<Value> = parents.entries().iter().map(|e| e.key).collect();
    let mut out = Vec::new();
    for child in children {
        if child.clj_eql(x, heap, interns) {
            continue;
        }
        if isa(Some(h), &child, x, heap, interns)? {
            out.push(child);
        }
    }
    Ok(out)
}

/// A new hierarchy in which `parent` is a direct parent of `child`.
///
/// Re-deriving a direct edge returns the hierarchy unchanged; deriving
/// through an existing ancestor path or creating a cycle is a StateError.
pub fn derive(
    h: Value,
    child: &Value,
    parent: &Value,
    heap: &mut Heap<impl ResourceTracker>,
    interns: &mut Interns,
) -> RunResult<Value> {
    if child.clj_eql(parent, heap, interns) {
        return Err(CoreError::state_error("a value cannot derive from itself"));
    }
    let direct = parents_of(h, child, heap, interns)?;
    if direct.iter().any(|p| p.clj_eql(parent, heap, interns)) {
        return Ok(h);
    }
    if isa(Some(h), child, parent, heap, interns)? {
        return Err(CoreError::state_error(format!(
            "{} already has {} as ancestor",
            child.to_print_string(heap, interns, PrintMode::Readable),
            parent.to_print_string(heap, interns, PrintMode::Readable),
        )));
    }
    if isa(Some(h), parent, child, heap, interns)? {
        return Err(CoreError::state_error(format!(
            "cyclic derivation: {} has {} as ancestor",
            parent.to_print_string(heap, interns, PrintMode::Readable),
            child.to_print_string(heap, interns, PrintMode::Readable),
        )));
    }
    let mut items = direct;
    items.push(*parent);
    update_parents_entry(h, child, Some(items), heap, interns)
}

/// A new hierarchy without the `child → parent` edge.
///
/// A child whose last parent is removed loses its entry entirely.
pub fn underive(
    h: Value,
    child: &Value,
    parent: &Value,
    heap: &mut Heap<impl ResourceTracker>,
    interns: &mut Interns,
) -> RunResult<Value> {
    let direct = parents_of(h, child, heap, interns)?;
    let remaining: Vec<Value> = direct
        .into_iter()
        .filter(|p| !p.clj_eql(parent, heap, interns))
        .collect();
    let update = if remaining.is_empty() { None } else { Some(remaining) };
    update_parents_entry(h, child, update, heap, interns)
}

/// Rebuilds a hierarchy with the parent set of `child` replaced
/// (`None` removes the entry).
fn update_parents_entry(
    h: Value,
    child: &Value,
    parents: Option<Vec<Value>>,
    heap: &mut Heap<impl ResourceTracker>,
    interns: &mut Interns,
) -> RunResult<Value> {
    let old_parents = parents_map(h, heap, interns)?;
    let new_parents = match parents {
        Some(items) => {
            let set = heap.alloc_value(HeapData::Set(PersistentSet::from_items(items, false)))?;
            old_parents.assoc(*child, set, heap, interns)?
        }
        None => old_parents.dissoc(child, heap, interns)?,
    };
    let parents_value = heap.alloc_value(HeapData::Map(new_parents))?;

    let Value::Ref(id) = h else {
        return Err(CoreError::type_error("hierarchy must be a map"));
    };
    let HeapData::Map(outer) = heap.get(id) else {
        return Err(CoreError::type_error("hierarchy must be a map"));
    };
    let outer = outer.clone();
    let key = Value::Keyword(interns.kw_parents());
    let rebuilt = outer.assoc(key, parents_value, heap, interns)?;
    heap.alloc_value(HeapData::Map(rebuilt))
}
