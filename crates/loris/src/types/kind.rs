//! The runtime type tag of a value.

use strum::{Display, EnumString, IntoStaticStr};

/// Short symbolic type tag for every value variant.
///
/// `Display` yields the short tag (`long`, `lazy-seq`, …) used in error
/// messages and by the `type` built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Type {
    Nil,
    Boolean,
    Long,
    Double,
    Character,
    String,
    Keyword,
    Symbol,
    List,
    Vector,
    Map,
    Set,
    Function,
    MultiFn,
    Protocol,
    ProtocolFn,
    Var,
    Atom,
    LazySeq,
    Delay,
    Volatile,
    Reduced,
    Transient,
    Promise,
    Regex,
    Matcher,
    Opaque,
}

impl Type {
    /// Host-style class tag, the `class` built-in's view of this type.
    ///
    /// `Nil` has no class; sorted maps and sets refine their tag at the
    /// call site (`loris.lang.PersistentTreeMap` / `…TreeSet`).
    #[must_use]
    pub fn class_name(self) -> Option<&'static str> {
        Some(match self {
            Self::Nil => return None,
            Self::Boolean => "loris.lang.Boolean",
            Self::Long => "loris.lang.Long",
            Self::Double => "loris.lang.Double",
            Self::Character => "loris.lang.Character",
            Self::String => "loris.lang.String",
            Self::Keyword => "loris.lang.Keyword",
            Self::Symbol => "loris.lang.Symbol",
            Self::List => "loris.lang.PersistentList",
            Self::Vector => "loris.lang.PersistentVector",
            Self::Map => "loris.lang.PersistentArrayMap",
            Self::Set => "loris.lang.PersistentHashSet",
            Self::Function => "loris.lang.Fn",
            Self::MultiFn => "loris.lang.MultiFn",
            Self::Protocol => "loris.lang.Protocol",
            Self::ProtocolFn => "loris.lang.ProtocolFn",
            Self::Var => "loris.lang.Var",
            Self::Atom => "loris.lang.Atom",
            Self::LazySeq => "loris.lang.LazySeq",
            Self::Delay => "loris.lang.Delay",
            Self::Volatile => "loris.lang.Volatile",
            Self::Reduced => "loris.lang.Reduced",
            Self::Transient => "loris.lang.Transient",
            Self::Promise => "loris.lang.Promise",
            Self::Regex => "loris.lang.Pattern",
            Self::Matcher => "loris.lang.Matcher",
            Self::Opaque => "loris.lang.Opaque",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tags_are_kebab_case() {
        assert_eq!(Type::LazySeq.to_string(), "lazy-seq");
        assert_eq!(Type::MultiFn.to_string(), "multi-fn");
        assert_eq!(Type::Long.to_string(), "long");
    }

    #[test]
    fn nil_has_no_class() {
        assert_eq!(Type::Nil.class_name(), None);
        assert_eq!(Type::Vector.class_name(), Some("loris.lang.PersistentVector"));
    }
}
