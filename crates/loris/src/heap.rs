//! The arena heap.
//!
//! Aggregate values live in slots of a `Heap` and are referenced by
//! `Value::Ref(HeapId)`. Slots are never freed individually — the heap is
//! an arena whose contents are released together at teardown — which is
//! what lets `Value` be `Copy` and structural sharing be unrestricted.
//! Mutation happens only through `get_mut` on the marked mutable cells.

use std::{collections::BTreeMap, fmt::Write, mem};

use crate::{
    exception::RunResult,
    intern::Interns,
    resource::{ResourceError, ResourceTracker},
    types::{
        Atom, CljTrait, Closure, Comp, Delay, LazySeq, ListNode, Matcher, MultiFn, Opaque,
        Partial, Pattern, PersistentMap, PersistentSet, PersistentVector, PrintMode, Promise,
        Protocol, ProtocolFn, Transient, Type, Var, Volatile,
    },
    value::{fmt_string_readable, Value},
};

/// Index of a heap slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapId(usize);

impl HeapId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Heap-allocated payload of a `Value::Ref`.
#[derive(Debug)]
pub enum HeapData {
    Str(String),
    List(ListNode),
    Vector(PersistentVector),
    Map(PersistentMap),
    Set(PersistentSet),
    Closure(Closure),
    Partial(Partial),
    Comp(Comp),
    MultiFn(MultiFn),
    Protocol(Protocol),
    ProtocolFn(ProtocolFn),
    Var(Var),
    Atom(Atom),
    LazySeq(LazySeq),
    Delay(Delay),
    Volatile(Volatile),
    Reduced(Value),
    Transient(Transient),
    Promise(Promise),
    Regex(Pattern),
    Matcher(Matcher),
    Opaque(Opaque),
}

impl HeapData {
    /// Static variant name, for heap statistics.
    #[must_use]
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "Str",
            Self::List(_) => "List",
            Self::Vector(_) => "Vector",
            Self::Map(_) => "Map",
            Self::Set(_) => "Set",
            Self::Closure(_) => "Closure",
            Self::Partial(_) => "Partial",
            Self::Comp(_) => "Comp",
            Self::MultiFn(_) => "MultiFn",
            Self::Protocol(_) => "Protocol",
            Self::ProtocolFn(_) => "ProtocolFn",
            Self::Var(_) => "Var",
            Self::Atom(_) => "Atom",
            Self::LazySeq(_) => "LazySeq",
            Self::Delay(_) => "Delay",
            Self::Volatile(_) => "Volatile",
            Self::Reduced(_) => "Reduced",
            Self::Transient(_) => "Transient",
            Self::Promise(_) => "Promise",
            Self::Regex(_) => "Regex",
            Self::Matcher(_) => "Matcher",
            Self::Opaque(_) => "Opaque",
        }
    }
}

/// Snapshot of heap state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapStats {
    /// Total number of objects on the heap.
    pub live_objects: usize,
    /// Breakdown of objects by `HeapData` variant name.
    pub objects_by_type: BTreeMap<&'static str, usize>,
    /// Tracker allocation count, when the tracker keeps one.
    pub tracker_allocations: Option<usize>,
    /// Tracker memory estimate in bytes, when the tracker keeps one.
    pub tracker_memory_bytes: Option<usize>,
}

/// The arena heap.
#[derive(Debug)]
pub struct Heap<T: ResourceTracker> {
    slots: Vec<HeapData>,
    tracker: T,
}

impl<T: ResourceTracker> Heap<T> {
    /// Creates a heap with the given slot capacity hint.
    pub fn new(capacity: usize, tracker: T) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            tracker,
        }
    }

    /// Allocates a slot, consulting the resource tracker first.
    pub fn allocate(&mut self, data: HeapData) -> Result<HeapId, ResourceError> {
        self.tracker
            .on_allocate(|| mem::size_of::<HeapData>() + data.clj_estimate_size())?;
        let id = HeapId(self.slots.len());
        self.slots.push(data);
        Ok(id)
    }

    /// Allocates a slot and wraps it as a `Value`.
    pub fn alloc_value(&mut self, data: HeapData) -> RunResult<Value> {
        Ok(Value::Ref(self.allocate(data)?))
    }

    /// Allocates a string value.
    pub fn alloc_str(&mut self, s: impl Into<String>) -> RunResult<Value> {
        self.alloc_value(HeapData::Str(s.into()))
    }

    /// Allocates a vector value from an element array.
    pub fn alloc_vector(&mut self, items: Vec<Value>) -> RunResult<Value> {
        self.alloc_value(HeapData::Vector(PersistentVector::new(items)))
    }

    /// Allocates a list value from elements; empty input yields the
    /// immediate empty list.
    pub fn alloc_list(&mut self, items: &[Value]) -> RunResult<Value> {
        let mut rest = Value::EmptyList;
        let mut rest_count = 0usize;
        for &item in items.iter().rev() {
            rest = self.alloc_value(HeapData::List(ListNode::counted(item, rest, rest_count)))?;
            rest_count += 1;
        }
        Ok(rest)
    }

    /// Allocates an unrealised lazy-seq over `thunk`.
    pub fn alloc_lazy(&mut self, thunk: Value) -> RunResult<Value> {
        self.alloc_value(HeapData::LazySeq(LazySeq::new(thunk)))
    }

    /// Shared access to a slot.
    #[must_use]
    pub fn get(&self, id: HeapId) -> &HeapData {
        &self.slots[id.0]
    }

    /// Exclusive access to a slot, for the mutable cells.
    #[must_use]
    pub fn get_mut(&mut self, id: HeapId) -> &mut HeapData {
        &mut self.slots[id.0]
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the heap holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The resource tracker.
    #[must_use]
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Captures a snapshot of current heap state.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        let mut objects_by_type: BTreeMap<&'static str, usize> = BTreeMap::new();
        for slot in &self.slots {
            *objects_by_type.entry(slot.variant_name()).or_insert(0) += 1;
        }
        HeapStats {
            live_objects: self.slots.len(),
            objects_by_type,
            tracker_allocations: self.tracker.allocations(),
            tracker_memory_bytes: self.tracker.memory_bytes(),
        }
    }
}

impl CljTrait for HeapData {
    fn clj_type(&self, _heap: &Heap<impl ResourceTracker>) -> Type {
        match self {
            Self::Str(_) => Type::String,
            Self::List(_) => Type::List,
            Self::Vector(_) => Type::Vector,
            Self::Map(_) => Type::Map,
            Self::Set(_) => Type::Set,
            Self::Closure(_) | Self::Partial(_) | Self::Comp(_) => Type::Function,
            Self::MultiFn(_) => Type::MultiFn,
            Self::Protocol(_) => Type::Protocol,
            Self::ProtocolFn(_) => Type::ProtocolFn,
            Self::Var(_) => Type::Var,
            Self::Atom(_) => Type::Atom,
            Self::LazySeq(_) => Type::LazySeq,
            Self::Delay(_) => Type::Delay,
            Self::Volatile(_) => Type::Volatile,
            Self::Reduced(_) => Type::Reduced,
            Self::Transient(_) => Type::Transient,
            Self::Promise(_) => Type::Promise,
            Self::Regex(_) => Type::Regex,
            Self::Matcher(_) => Type::Matcher,
            Self::Opaque(_) => Type::Opaque,
        }
    }

    fn clj_count(&self, _heap: &Heap<impl ResourceTracker>) -> Option<usize> {
        match self {
            Self::Str(s) => Some(s.chars().count()),
            Self::List(node) => node.count,
            Self::Vector(v) => Some(v.count()),
            Self::Map(m) => Some(m.count()),
            Self::Set(s) => Some(s.count()),
            _ => None,
        }
    }

    fn clj_eql(&self, other: &Self, heap: &Heap<impl ResourceTracker>, interns: &Interns) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                if let (Some(ca), Some(cb)) = (a.count, b.count)
                    && ca != cb
                {
                    return false;
                }
                a.first.clj_eql(&b.first, heap, interns) && a.rest.clj_eql(&b.rest, heap, interns)
            }
            (Self::Vector(a), Self::Vector(b)) => {
                a.count() == b.count()
                    && a.as_slice()
                        .iter()
                        .zip(b.as_slice())
                        .all(|(x, y)| x.clj_eql(y, heap, interns))
            }
            (Self::Map(a), Self::Map(b)) => a.eql_map(b, heap, interns),
            (Self::Set(a), Self::Set(b)) => a.eql_set(b, heap, interns),
            (Self::LazySeq(a), Self::LazySeq(b)) => match (a.realized_value(), b.realized_value()) {
                (Some(va), Some(vb)) => va.clj_eql(&vb, heap, interns),
                _ => false,
            },
            (Self::Reduced(a), Self::Reduced(b)) => a.clj_eql(b, heap, interns),
            // Cells, callables, patterns, and matchers are identity-equal;
            // identical ids were handled before dispatching here.
            _ => false,
        }
    }

    fn clj_fmt(
        &self,
        f: &mut impl Write,
        heap: &Heap<impl ResourceTracker>,
        interns: &Interns,
        mode: PrintMode,
    ) -> std::fmt::Result {
        match self {
            Self::Str(s) => match mode {
                PrintMode::Readable => fmt_string_readable(f, s),
                PrintMode::Display => f.write_str(s),
            },
            Self::List(node) => {
                f.write_char('(')?;
                node.first.clj_fmt(f, heap, interns, mode)?;
                fmt_seq_elements(f, node.rest, heap, interns, mode, true)?;
                f.write_char(')')
            }
            Self::Vector(v) => {
                f.write_char('[')?;
                for (i, item) in v.as_slice().iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    item.clj_fmt(f, heap, interns, mode)?;
                }
                f.write_char(']')
            }
            Self::Map(m) => {
                f.write_char('{')?;
                for (i, entry) in m.entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    entry.key.clj_fmt(f, heap, interns, mode)?;
                    f.write_char(' ')?;
                    entry.value.clj_fmt(f, heap, interns, mode)?;
                }
                f.write_char('}')
            }
            Self::Set(s) => {
                f.write_str("#{")?;
                for (i, item) in s.items().iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    item.clj_fmt(f, heap, interns, mode)?;
                }
                f.write_char('}')
            }
            Self::Closure(c) => match c.name {
                Some(sym) => {
                    let (ns, name) = interns.symbol_parts(sym);
                    match ns {
                        Some(ns) => write!(f, "#<fn {ns}/{name}>"),
                        None => write!(f, "#<fn {name}>"),
                    }
                }
                None => f.write_str("#<fn>"),
            },
            Self::Partial(_) => f.write_str("#<partial-fn>"),
            Self::Comp(_) => f.write_str("#<comp-fn>"),
            Self::MultiFn(m) => {
                let (_, name) = interns.symbol_parts(m.name);
                write!(f, "#<multi-fn {name}>")
            }
            Self::Protocol(p) => {
                let (_, name) = interns.symbol_parts(p.name);
                write!(f, "#<protocol {name}>")
            }
            Self::ProtocolFn(p) => {
                let (_, name) = interns.symbol_parts(p.name);
                write!(f, "#<protocol-fn {name}>")
            }
            Self::Var(v) => {
                let (ns, name) = interns.symbol_parts(v.sym);
                match ns {
                    Some(ns) => write!(f, "#'{ns}/{name}"),
                    None => write!(f, "#'{name}"),
                }
            }
            Self::Atom(a) => {
                f.write_str("#<atom ")?;
                a.value.clj_fmt(f, heap, interns, mode)?;
                f.write_char('>')
            }
            Self::LazySeq(ls) => match ls.realized_value() {
                Some(v) => {
                    f.write_char('(')?;
                    fmt_seq_elements(f, v, heap, interns, mode, false)?;
                    f.write_char(')')
                }
                None => f.write_str("#<lazy-seq>"),
            },
            Self::Delay(d) => match d.state {
                crate::types::DelayState::Done(v) => {
                    f.write_str("#<delay ")?;
                    v.clj_fmt(f, heap, interns, mode)?;
                    f.write_char('>')
                }
                _ => f.write_str("#<delay pending>"),
            },
            Self::Volatile(v) => {
                f.write_str("#<volatile ")?;
                v.value.clj_fmt(f, heap, interns, mode)?;
                f.write_char('>')
            }
            Self::Reduced(v) => {
                f.write_str("#<reduced ")?;
                v.clj_fmt(f, heap, interns, mode)?;
                f.write_char('>')
            }
            Self::Transient(t) => write!(f, "#<transient {}>", t.kind_name()),
            Self::Promise(p) => {
                if p.delivered {
                    f.write_str("#<promise ")?;
                    p.value.clj_fmt(f, heap, interns, mode)?;
                    f.write_char('>')
                } else {
                    f.write_str("#<promise pending>")
                }
            }
            Self::Regex(p) => write!(f, "#\"{}\"", p.source()),
            Self::Matcher(m) => {
                let HeapData::Regex(pattern) = heap.get(m.pattern) else {
                    return f.write_str("#<matcher>");
                };
                write!(f, "#<matcher \"{}\">", pattern.source())
            }
            Self::Opaque(o) => write!(f, "#<{}>", o.tag),
        }
    }

    fn clj_estimate_size(&self) -> usize {
        match self {
            Self::Str(s) => s.len(),
            Self::List(_) => mem::size_of::<ListNode>(),
            Self::Vector(v) => v.count() * mem::size_of::<Value>(),
            Self::Map(m) => m.count() * 2 * mem::size_of::<Value>(),
            Self::Set(s) => s.count() * mem::size_of::<Value>(),
            Self::Partial(p) => (p.args.len() + 1) * mem::size_of::<Value>(),
            Self::Comp(c) => c.fns.len() * mem::size_of::<Value>(),
            Self::MultiFn(m) => (m.methods.len() + m.prefers.len()) * 2 * mem::size_of::<Value>(),
            Self::Regex(p) => p.source().len() * 4,
            Self::Matcher(m) => m.input.len(),
            _ => mem::size_of::<Value>(),
        }
    }
}

/// Writes the space-separated elements of a realised seq chain.
///
/// `start` may be the empty seq, a list node, a vector, a string (char
/// elements), or a lazy-seq. An unrealised lazy tail renders as the
/// `#<lazy-seq>` placeholder — printing never forces.
fn fmt_seq_elements(
    f: &mut impl Write,
    start: Value,
    heap: &Heap<impl ResourceTracker>,
    interns: &Interns,
    mode: PrintMode,
    mut need_space: bool,
) -> std::fmt::Result {
    let mut cur = start;
    loop {
        match cur {
            Value::Nil | Value::EmptyList => return Ok(()),
            Value::Ref(id) => match heap.get(id) {
                HeapData::List(node) => {
                    if need_space {
                        f.write_char(' ')?;
                    }
                    node.first.clj_fmt(f, heap, interns, mode)?;
                    need_space = true;
                    cur = node.rest;
                }
                HeapData::Vector(v) => {
                    for item in v.as_slice() {
                        if need_space {
                            f.write_char(' ')?;
                        }
                        item.clj_fmt(f, heap, interns, mode)?;
                        need_space = true;
                    }
                    return Ok(());
                }
                HeapData::Str(s) => {
                    for ch in s.chars() {
                        if need_space {
                            f.write_char(' ')?;
                        }
                        Value::Char(ch).clj_fmt(f, heap, interns, mode)?;
                        need_space = true;
                    }
                    return Ok(());
                }
                HeapData::LazySeq(ls) => match ls.realized_value() {
                    Some(v) => cur = v,
                    None => {
                        if need_space {
                            f.write_char(' ')?;
                        }
                        return f.write_str("#<lazy-seq>");
                    }
                },
                _ => {
                    if need_space {
                        f.write_char(' ')?;
                    }
                    return cur.clj_fmt(f, heap, interns, mode);
                }
            },
            other => {
                if need_space {
                    f.write_char(' ')?;
                }
                return other.clj_fmt(f, heap, interns, mode);
            }
        }
    }
}
