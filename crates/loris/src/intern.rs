//! Keyword and symbol interning.
//!
//! Keywords and symbols are `(namespace, name)` pairs stored once in an
//! [`Interns`] table and referenced by id, so equality is id equality and
//! a `Value` stays `Copy`. Name strings live in an insertion-ordered set;
//! ids index into it.

use ahash::AHashMap;
use indexmap::IndexSet;

/// Index of a name string in the interner.
///
/// `u32` keeps ids small; four billion distinct names is plenty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameId(u32);

impl NameId {
    /// Returns the raw index value.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An interned keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeywordId(u32);

/// An interned symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

/// A `(namespace, name)` spelling shared by keywords and symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Qualified {
    pub ns: Option<NameId>,
    pub name: NameId,
}

/// Interner for keyword and symbol spellings.
///
/// The hierarchy keywords (`:parents`, `:ancestors`, `:descendants`) are
/// pre-interned so the hierarchy code can reference them without a lookup.
#[derive(Debug)]
pub struct Interns {
    names: IndexSet<String, ahash::RandomState>,
    keywords: Vec<Qualified>,
    keyword_lookup: AHashMap<Qualified, u32>,
    symbols: Vec<Qualified>,
    symbol_lookup: AHashMap<Qualified, u32>,
    kw_parents: KeywordId,
    kw_ancestors: KeywordId,
    kw_descendants: KeywordId,
}

impl Default for Interns {
    fn default() -> Self {
        Self::new()
    }
}

impl Interns {
    /// Creates an interner with the well-known keywords pre-interned.
    #[must_use]
    pub fn new() -> Self {
        let mut interns = Self {
            names: IndexSet::default(),
            keywords: Vec::new(),
            keyword_lookup: AHashMap::new(),
            symbols: Vec::new(),
            symbol_lookup: AHashMap::new(),
            kw_parents: KeywordId(0),
            kw_ancestors: KeywordId(0),
            kw_descendants: KeywordId(0),
        };
        interns.kw_parents = interns.keyword(None, "parents");
        interns.kw_ancestors = interns.keyword(None, "ancestors");
        interns.kw_descendants = interns.keyword(None, "descendants");
        interns
    }

    /// Interns a bare name string.
    pub fn name_id(&mut self, name: &str) -> NameId {
        if let Some(index) = self.names.get_index_of(name) {
            return NameId(u32::try_from(index).expect("intern table exceeds u32"));
        }
        let (index, _) = self.names.insert_full(name.to_owned());
        NameId(u32::try_from(index).expect("intern table exceeds u32"))
    }

    /// The string for a name id.
    #[must_use]
    pub fn name(&self, id: NameId) -> &str {
        self.names.get_index(id.index()).expect("NameId out of range")
    }

    /// Interns a keyword spelling.
    pub fn keyword(&mut self, ns: Option<&str>, name: &str) -> KeywordId {
        let qual = Qualified {
            ns: ns.map(|n| self.name_id(n)),
            name: self.name_id(name),
        };
        if let Some(&id) = self.keyword_lookup.get(&qual) {
            return KeywordId(id);
        }
        let id = u32::try_from(self.keywords.len()).expect("keyword table exceeds u32");
        self.keywords.push(qual);
        self.keyword_lookup.insert(qual, id);
        KeywordId(id)
    }

    /// Interns a keyword from a possibly `ns/name` qualified string.
    pub fn keyword_from_str(&mut self, spelling: &str) -> KeywordId {
        let (ns, name) = split_qualified(spelling);
        self.keyword(ns, name)
    }

    /// Interns a symbol spelling.
    pub fn symbol(&mut self, ns: Option<&str>, name: &str) -> SymbolId {
        let qual = Qualified {
            ns: ns.map(|n| self.name_id(n)),
            name: self.name_id(name),
        };
        if let Some(&id) = self.symbol_lookup.get(&qual) {
            return SymbolId(id);
        }
        let id = u32::try_from(self.symbols.len()).expect("symbol table exceeds u32");
        self.symbols.push(qual);
        self.symbol_lookup.insert(qual, id);
        SymbolId(id)
    }

    /// Interns a symbol from a possibly `ns/name` qualified string.
    pub fn symbol_from_str(&mut self, spelling: &str) -> SymbolId {
        let (ns, name) = split_qualified(spelling);
        self.symbol(ns, name)
    }

    /// The `(namespace, name)` spelling of a keyword.
    #[must_use]
    pub fn keyword_parts(&self, id: KeywordId) -> (Option<&str>, &str) {
        let qual = self.keywords[id.0 as usize];
        (qual.ns.map(|n| self.name(n)), self.name(qual.name))
    }

    /// The `(namespace, name)` spelling of a symbol.
    #[must_use]
    pub fn symbol_parts(&self, id: SymbolId) -> (Option<&str>, &str) {
        let qual = self.symbols[id.0 as usize];
        (qual.ns.map(|n| self.name(n)), self.name(qual.name))
    }

    /// The pre-interned `:parents` keyword.
    #[must_use]
    pub fn kw_parents(&self) -> KeywordId {
        self.kw_parents
    }

    /// The pre-interned `:ancestors` keyword.
    #[must_use]
    pub fn kw_ancestors(&self) -> KeywordId {
        self.kw_ancestors
    }

    /// The pre-interned `:descendants` keyword.
    #[must_use]
    pub fn kw_descendants(&self) -> KeywordId {
        self.kw_descendants
    }

    /// Number of distinct interned name strings.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

/// Splits a `ns/name` spelling at its last slash.
///
/// A spelling with no slash, or the bare `/` symbol (division), has no
/// namespace part.
fn split_qualified(spelling: &str) -> (Option<&str>, &str) {
    if spelling == "/" {
        return (None, spelling);
    }
    match spelling.rfind('/') {
        Some(pos) if pos > 0 => (Some(&spelling[..pos]), &spelling[pos + 1..]),
        _ => (None, spelling),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_interning_dedups() {
        let mut interns = Interns::new();
        let a = interns.keyword(Some("user"), "cat");
        let b = interns.keyword(Some("user"), "cat");
        let c = interns.keyword(None, "cat");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interns.keyword_parts(a), (Some("user"), "cat"));
    }

    #[test]
    fn symbols_and_keywords_do_not_collide() {
        let mut interns = Interns::new();
        let k = interns.keyword(None, "x");
        let s = interns.symbol(None, "x");
        assert_eq!(interns.keyword_parts(k).1, interns.symbol_parts(s).1);
    }

    #[test]
    fn qualified_split() {
        assert_eq!(split_qualified("a/b"), (Some("a"), "b"));
        assert_eq!(split_qualified("a/b/c"), (Some("a/b"), "c"));
        assert_eq!(split_qualified("plain"), (None, "plain"));
        assert_eq!(split_qualified("/"), (None, "/"));
    }
}
