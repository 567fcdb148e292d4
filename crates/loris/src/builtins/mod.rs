//! The built-in function library.
//!
//! Every built-in is a variant of [`BuiltinFn`], small enough to live
//! inside a `Value`. The strum serialisation of a variant is its language
//! name; [`builtin_table`] yields the `(name, fn)` registration rows the
//! external binder installs into the root namespace. Each family has its
//! own submodule.

mod arithmetic;
mod bits;
mod casts;
mod cells;
mod collections;
mod compare;
mod eval;
mod funcs;
mod multimethods;
mod predicates;
mod print;
mod protocols;
mod regex_ops;
mod seqs;
mod strings;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    exception::{CoreError, RunResult},
    heap::HeapData,
    host::Ctx,
    resource::ResourceTracker,
    types::CljTrait,
    value::Value,
};

/// The built-in family a function registers under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Family {
    Arithmetic,
    Comparison,
    Bits,
    Casts,
    Predicates,
    Strings,
    Collections,
    Seqs,
    Cells,
    Funcs,
    Multimethods,
    Protocols,
    Regex,
    Printing,
    Eval,
}

/// Enumerates every host-implemented built-in.
///
/// The strum serialisation of each variant is its name in the language
/// (`+`, `bit-shift-left`, `swap!`, …). Variants with a trailing `*` in
/// their name are internal step functions of the lazy producers and are
/// excluded from the registration table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum BuiltinFn {
    // --- arithmetic ---
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "inc")]
    Inc,
    #[strum(serialize = "dec")]
    Dec,
    #[strum(serialize = "mod")]
    Mod,
    #[strum(serialize = "rem")]
    Rem,
    #[strum(serialize = "quot")]
    Quot,
    #[strum(serialize = "min")]
    Min,
    #[strum(serialize = "max")]
    Max,
    #[strum(serialize = "abs")]
    Abs,
    #[strum(serialize = "+'")]
    AddChecked,
    #[strum(serialize = "-'")]
    SubChecked,
    #[strum(serialize = "*'")]
    MulChecked,
    #[strum(serialize = "inc'")]
    IncChecked,
    #[strum(serialize = "dec'")]
    DecChecked,

    // --- comparison ---
    #[strum(serialize = "=")]
    Eq,
    #[strum(serialize = "not=")]
    NotEq,
    #[strum(serialize = "==")]
    NumEq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "compare")]
    Compare,
    #[strum(serialize = "zero?")]
    ZeroQ,
    #[strum(serialize = "pos?")]
    PosQ,
    #[strum(serialize = "neg?")]
    NegQ,
    #[strum(serialize = "even?")]
    EvenQ,
    #[strum(serialize = "odd?")]
    OddQ,

    // --- bit ops ---
    #[strum(serialize = "bit-and")]
    BitAnd,
    #[strum(serialize = "bit-or")]
    BitOr,
    #[strum(serialize = "bit-xor")]
    BitXor,
    #[strum(serialize = "bit-not")]
    BitNot,
    #[strum(serialize = "bit-and-not")]
    BitAndNot,
    #[strum(serialize = "bit-shift-left")]
    BitShiftLeft,
    #[strum(serialize = "bit-shift-right")]
    BitShiftRight,
    #[strum(serialize = "unsigned-bit-shift-right")]
    UnsignedBitShiftRight,
    #[strum(serialize = "bit-set")]
    BitSet,
    #[strum(serialize = "bit-clear")]
    BitClear,
    #[strum(serialize = "bit-flip")]
    BitFlip,
    #[strum(serialize = "bit-test")]
    BitTest,

    // --- casts & parsers ---
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "long")]
    Long,
    #[strum(serialize = "double")]
    Double,
    #[strum(serialize = "char")]
    CharCast,
    #[strum(serialize = "boolean")]
    Boolean,
    #[strum(serialize = "parse-long")]
    ParseLong,
    #[strum(serialize = "parse-double")]
    ParseDouble,
    #[strum(serialize = "parse-boolean")]
    ParseBoolean,

    // --- predicates ---
    #[strum(serialize = "nil?")]
    NilQ,
    #[strum(serialize = "some?")]
    SomeQ,
    #[strum(serialize = "true?")]
    TrueQ,
    #[strum(serialize = "false?")]
    FalseQ,
    #[strum(serialize = "number?")]
    NumberQ,
    #[strum(serialize = "int?")]
    IntQ,
    #[strum(serialize = "float?")]
    FloatQ,
    #[strum(serialize = "double?")]
    DoubleQ,
    #[strum(serialize = "boolean?")]
    BooleanQ,
    #[strum(serialize = "string?")]
    StringQ,
    #[strum(serialize = "char?")]
    CharQ,
    #[strum(serialize = "keyword?")]
    KeywordQ,
    #[strum(serialize = "symbol?")]
    SymbolQ,
    #[strum(serialize = "fn?")]
    FnQ,
    #[strum(serialize = "ifn?")]
    IfnQ,
    #[strum(serialize = "coll?")]
    CollQ,
    #[strum(serialize = "list?")]
    ListQ,
    #[strum(serialize = "vector?")]
    VectorQ,
    #[strum(serialize = "map?")]
    MapQ,
    #[strum(serialize = "set?")]
    SetQ,
    #[strum(serialize = "seq?")]
    SeqQ,
    #[strum(serialize = "seqable?")]
    SeqableQ,
    #[strum(serialize = "sequential?")]
    SequentialQ,
    #[strum(serialize = "counted?")]
    CountedQ,
    #[strum(serialize = "empty?")]
    EmptyQ,
    #[strum(serialize = "not-empty")]
    NotEmpty,
    #[strum(serialize = "reduced?")]
    ReducedQ,
    #[strum(serialize = "realized?")]
    RealizedQ,
    #[strum(serialize = "delay?")]
    DelayQ,
    #[strum(serialize = "var?")]
    VarQ,
    #[strum(serialize = "volatile?")]
    VolatileQ,
    #[strum(serialize = "instance-of?")]
    InstanceOfQ,
    #[strum(serialize = "type")]
    TypeOf,
    #[strum(serialize = "class")]
    ClassOf,
    #[strum(serialize = "identity")]
    Identity,
    #[strum(serialize = "not")]
    Not,

    // --- strings ---
    #[strum(serialize = "str")]
    Str,
    #[strum(serialize = "pr-str")]
    PrStr,
    #[strum(serialize = "subs")]
    Subs,
    #[strum(serialize = "string-split")]
    StringSplit,
    #[strum(serialize = "string-replace")]
    StringReplace,
    #[strum(serialize = "string-replace-first")]
    StringReplaceFirst,
    #[strum(serialize = "string-join")]
    StringJoin,
    #[strum(serialize = "upper-case")]
    UpperCase,
    #[strum(serialize = "lower-case")]
    LowerCase,
    #[strum(serialize = "capitalize")]
    Capitalize,
    #[strum(serialize = "trim")]
    Trim,
    #[strum(serialize = "triml")]
    Triml,
    #[strum(serialize = "trimr")]
    Trimr,
    #[strum(serialize = "string-includes?")]
    StringIncludesQ,
    #[strum(serialize = "starts-with?")]
    StartsWithQ,
    #[strum(serialize = "ends-with?")]
    EndsWithQ,
    #[strum(serialize = "index-of")]
    IndexOf,
    #[strum(serialize = "last-index-of")]
    LastIndexOf,
    #[strum(serialize = "string-reverse")]
    StringReverse,
    #[strum(serialize = "blank?")]
    BlankQ,
    #[strum(serialize = "char-name-string")]
    CharNameString,
    #[strum(serialize = "char-escape-string")]
    CharEscapeString,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "namespace")]
    Namespace,
    #[strum(serialize = "keyword")]
    KeywordCtor,
    #[strum(serialize = "symbol")]
    SymbolCtor,

    // --- collections ---
    #[strum(serialize = "list")]
    ListCtor,
    #[strum(serialize = "vector")]
    VectorCtor,
    #[strum(serialize = "vec")]
    VecCast,
    #[strum(serialize = "hash-map")]
    HashMapCtor,
    #[strum(serialize = "hash-set")]
    HashSetCtor,
    #[strum(serialize = "set")]
    SetCast,
    #[strum(serialize = "sorted-map")]
    SortedMapCtor,
    #[strum(serialize = "sorted-set")]
    SortedSetCtor,
    #[strum(serialize = "conj")]
    Conj,
    #[strum(serialize = "cons")]
    Cons,
    #[strum(serialize = "first")]
    First,
    #[strum(serialize = "rest")]
    Rest,
    #[strum(serialize = "next")]
    Next,
    #[strum(serialize = "second")]
    Second,
    #[strum(serialize = "last")]
    Last,
    #[strum(serialize = "butlast")]
    Butlast,
    #[strum(serialize = "nth")]
    Nth,
    #[strum(serialize = "get")]
    Get,
    #[strum(serialize = "get-in")]
    GetIn,
    #[strum(serialize = "assoc")]
    Assoc,
    #[strum(serialize = "dissoc")]
    Dissoc,
    #[strum(serialize = "disj")]
    Disj,
    #[strum(serialize = "contains?")]
    ContainsQ,
    #[strum(serialize = "count")]
    Count,
    #[strum(serialize = "empty")]
    Empty,
    #[strum(serialize = "seq")]
    SeqFn,
    #[strum(serialize = "keys")]
    Keys,
    #[strum(serialize = "vals")]
    Vals,
    #[strum(serialize = "peek")]
    Peek,
    #[strum(serialize = "pop")]
    Pop,
    #[strum(serialize = "subvec")]
    Subvec,
    #[strum(serialize = "into")]
    Into,
    #[strum(serialize = "reverse")]
    Reverse,

    // --- seqs & reductions ---
    #[strum(serialize = "range")]
    Range,
    #[strum(serialize = "map")]
    MapFn,
    #[strum(serialize = "filter")]
    FilterFn,
    #[strum(serialize = "take")]
    Take,
    #[strum(serialize = "drop")]
    Drop,
    #[strum(serialize = "concat")]
    Concat,
    #[strum(serialize = "repeat")]
    Repeat,
    #[strum(serialize = "iterate")]
    Iterate,
    #[strum(serialize = "reduce")]
    Reduce,
    #[strum(serialize = "reduced")]
    ReducedCtor,
    #[strum(serialize = "doall")]
    Doall,
    #[strum(serialize = "dorun")]
    Dorun,
    #[strum(serialize = "lazy-seq")]
    LazySeqCtor,
    #[strum(serialize = "range-step*")]
    RangeStep,
    #[strum(serialize = "map-step*")]
    MapStep,
    #[strum(serialize = "filter-step*")]
    FilterStep,
    #[strum(serialize = "take-step*")]
    TakeStep,
    #[strum(serialize = "drop-step*")]
    DropStep,
    #[strum(serialize = "concat-step*")]
    ConcatStep,
    #[strum(serialize = "repeat-step*")]
    RepeatStep,
    #[strum(serialize = "iterate-step*")]
    IterateStep,
    #[strum(serialize = "iterate-tail*")]
    IterateTail,

    // --- cells ---
    #[strum(serialize = "atom")]
    AtomCtor,
    #[strum(serialize = "deref")]
    Deref,
    #[strum(serialize = "reset!")]
    ResetBang,
    #[strum(serialize = "swap!")]
    SwapBang,
    #[strum(serialize = "compare-and-set!")]
    CompareAndSetBang,
    #[strum(serialize = "volatile!")]
    VolatileCtor,
    #[strum(serialize = "vreset!")]
    VresetBang,
    #[strum(serialize = "vswap!")]
    VswapBang,
    #[strum(serialize = "delay")]
    DelayCtor,
    #[strum(serialize = "force")]
    Force,
    #[strum(serialize = "promise")]
    PromiseCtor,
    #[strum(serialize = "deliver")]
    Deliver,
    #[strum(serialize = "var-get")]
    VarGet,
    #[strum(serialize = "var-set")]
    VarSet,
    #[strum(serialize = "transient")]
    TransientCtor,
    #[strum(serialize = "persistent!")]
    PersistentBang,
    #[strum(serialize = "conj!")]
    ConjBang,
    #[strum(serialize = "assoc!")]
    AssocBang,
    #[strum(serialize = "dissoc!")]
    DissocBang,
    #[strum(serialize = "disj!")]
    DisjBang,

    // --- function combinators ---
    #[strum(serialize = "apply")]
    Apply,
    #[strum(serialize = "partial")]
    PartialCtor,
    #[strum(serialize = "comp")]
    CompCtor,

    // --- multimethods & hierarchy ---
    #[strum(serialize = "multi-fn")]
    MultiFnCtor,
    #[strum(serialize = "add-method")]
    AddMethod,
    #[strum(serialize = "remove-method")]
    RemoveMethod,
    #[strum(serialize = "remove-all-methods")]
    RemoveAllMethods,
    #[strum(serialize = "prefer-method")]
    PreferMethod,
    #[strum(serialize = "prefers")]
    Prefers,
    #[strum(serialize = "methods")]
    MethodsFn,
    #[strum(serialize = "get-method")]
    GetMethod,
    #[strum(serialize = "make-hierarchy")]
    MakeHierarchy,
    #[strum(serialize = "derive")]
    Derive,
    #[strum(serialize = "underive")]
    Underive,
    #[strum(serialize = "isa?")]
    IsaQ,
    #[strum(serialize = "parents")]
    Parents,
    #[strum(serialize = "ancestors")]
    Ancestors,
    #[strum(serialize = "descendants")]
    Descendants,
    #[strum(serialize = "reset-global-hierarchy!")]
    ResetGlobalHierarchyBang,

    // --- protocols ---
    #[strum(serialize = "protocol")]
    ProtocolCtor,
    #[strum(serialize = "protocol-fn")]
    ProtocolFnCtor,
    #[strum(serialize = "extend-type!")]
    ExtendTypeBang,

    // --- regex ---
    #[strum(serialize = "re-pattern")]
    RePattern,
    #[strum(serialize = "re-matcher")]
    ReMatcher,
    #[strum(serialize = "re-matches")]
    ReMatches,
    #[strum(serialize = "re-find")]
    ReFind,
    #[strum(serialize = "re-seq")]
    ReSeq,
    #[strum(serialize = "re-groups")]
    ReGroups,

    // --- printing ---
    #[strum(serialize = "pr")]
    Pr,
    #[strum(serialize = "prn")]
    Prn,
    #[strum(serialize = "print")]
    PrintFn,
    #[strum(serialize = "println")]
    Println,
    #[strum(serialize = "newline")]
    Newline,
    #[strum(serialize = "print-str")]
    PrintStr,
    #[strum(serialize = "println-str")]
    PrintlnStr,

    // --- eval / host interop ---
    #[strum(serialize = "read-string")]
    ReadString,
    #[strum(serialize = "eval")]
    EvalFn,
    #[strum(serialize = "load-string")]
    LoadString,
    #[strum(serialize = "resolve")]
    Resolve,
}

impl BuiltinFn {
    /// The registration name of this built-in.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Internal step functions of the lazy producers are not registered.
    #[must_use]
    pub fn is_internal(self) -> bool {
        self.name().ends_with('*')
    }

    /// The registration family of this built-in.
    #[must_use]
    pub fn family(self) -> Family {
        use BuiltinFn as B;
        match self {
            B::Add
            | B::Sub
            | B::Mul
            | B::Div
            | B::Inc
            | B::Dec
            | B::Mod
            | B::Rem
            | B::Quot
            | B::Min
            | B::Max
            | B::Abs
            | B::AddChecked
            | B::SubChecked
            | B::MulChecked
            | B::IncChecked
            | B::DecChecked => Family::Arithmetic,
            B::Eq
            | B::NotEq
            | B::NumEq
            | B::Lt
            | B::Le
            | B::Gt
            | B::Ge
            | B::Compare
            | B::ZeroQ
            | B::PosQ
            | B::NegQ
            | B::EvenQ
            | B::OddQ => Family::Comparison,
            B::BitAnd
            | B::BitOr
            | B::BitXor
            | B::BitNot
            | B::BitAndNot
            | B::BitShiftLeft
            | B::BitShiftRight
            | B::UnsignedBitShiftRight
            | B::BitSet
            | B::BitClear
            | B::BitFlip
            | B::BitTest => Family::Bits,
            B::Int
            | B::Long
            | B::Double
            | B::CharCast
            | B::Boolean
            | B::ParseLong
            | B::ParseDouble
            | B::ParseBoolean => Family::Casts,
            B::NilQ
            | B::SomeQ
            | B::TrueQ
            | B::FalseQ
            | B::NumberQ
            | B::IntQ
            | B::FloatQ
            | B::DoubleQ
            | B::BooleanQ
            | B::StringQ
            | B::CharQ
            | B::KeywordQ
            | B::SymbolQ
            | B::FnQ
            | B::IfnQ
            | B::CollQ
            | B::ListQ
            | B::VectorQ
            | B::MapQ
            | B::SetQ
            | B::SeqQ
            | B::SeqableQ
            | B::SequentialQ
            | B::CountedQ
            | B::EmptyQ
            | B::NotEmpty
            | B::ReducedQ
            | B::RealizedQ
            | B::DelayQ
            | B::VarQ
            | B::VolatileQ
            | B::InstanceOfQ
            | B::TypeOf
            | B::ClassOf
            | B::Identity
            | B::Not => Family::Predicates,
            B::Str
            | B::PrStr
            | B::Subs
            | B::StringSplit
            | B::StringReplace
            | B::StringReplaceFirst
            | B::StringJoin
            | B::UpperCase
            | B::LowerCase
            | B::Capitalize
            | B::Trim
            | B::Triml
            | B::Trimr
            | B::StringIncludesQ
            | B::StartsWithQ
            | B::EndsWithQ
            | B::IndexOf
            | B::LastIndexOf
            | B::StringReverse
            | B::BlankQ
            | B::CharNameString
            | B::CharEscapeString
            | B::Name
            | B::Namespace
            | B::KeywordCtor
            | B::SymbolCtor => Family::Strings,
            B::ListCtor
            | B::VectorCtor
            | B::VecCast
            | B::HashMapCtor
            | B::HashSetCtor
            | B::SetCast
            | B::SortedMapCtor
            | B::SortedSetCtor
            | B::Conj
            | B::Cons
            | B::First
            | B::Rest
            | B::Next
            | B::Second
            | B::Last
            | B::Butlast
            | B::Nth
            | B::Get
            | B::GetIn
            | B::Assoc
            | B::Dissoc
            | B::Disj
            | B::ContainsQ
            | B::Count
            | B::Empty
            | B::SeqFn
            | B::Keys
            | B::Vals
            | B::Peek
            | B::Pop
            | B::Subvec
            | B::Into
            | B::Reverse => Family::Collections,
            B::Range
            | B::MapFn
            | B::FilterFn
            | B::Take
            | B::Drop
            | B::Concat
            | B::Repeat
            | B::Iterate
            | B::Reduce
            | B::ReducedCtor
            | B::Doall
            | B::Dorun
            | B::LazySeqCtor
            | B::RangeStep
            | B::MapStep
            | B::FilterStep
            | B::TakeStep
            | B::DropStep
            | B::ConcatStep
            | B::RepeatStep
            | B::IterateStep
            | B::IterateTail => Family::Seqs,
            B::AtomCtor
            | B::Deref
            | B::ResetBang
            | B::SwapBang
            | B::CompareAndSetBang
            | B::VolatileCtor
            | B::VresetBang
            | B::VswapBang
            | B::DelayCtor
            | B::Force
            | B::PromiseCtor
            | B::Deliver
            | B::VarGet
            | B::VarSet
            | B::TransientCtor
            | B::PersistentBang
            | B::ConjBang
            | B::AssocBang
            | B::DissocBang
            | B::DisjBang => Family::Cells,
            B::Apply | B::PartialCtor | B::CompCtor => Family::Funcs,
            B::MultiFnCtor
            | B::AddMethod
            | B::RemoveMethod
            | B::RemoveAllMethods
            | B::PreferMethod
            | B::Prefers
            | B::MethodsFn
            | B::GetMethod
            | B::MakeHierarchy
            | B::Derive
            | B::Underive
            | B::IsaQ
            | B::Parents
            | B::Ancestors
            | B::Descendants
            | B::ResetGlobalHierarchyBang => Family::Multimethods,
            B::ProtocolCtor | B::ProtocolFnCtor | B::ExtendTypeBang => Family::Protocols,
            B::RePattern | B::ReMatcher | B::ReMatches | B::ReFind | B::ReSeq | B::ReGroups => {
                Family::Regex
            }
            B::Pr | B::Prn | B::PrintFn | B::Println | B::Newline | B::PrintStr | B::PrintlnStr => {
                Family::Printing
            }
            B::ReadString | B::EvalFn | B::LoadString | B::Resolve => Family::Eval,
        }
    }

    /// Calls this built-in with the given arguments.
    pub fn call(self, ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
        use BuiltinFn as B;
        match self {
            B::Add => arithmetic::builtin_add(ctx, args),
            B::Sub => arithmetic::builtin_sub(ctx, args),
            B::Mul => arithmetic::builtin_mul(ctx, args),
            B::Div => arithmetic::builtin_div(ctx, args),
            B::Inc => arithmetic::builtin_inc(ctx, args),
            B::Dec => arithmetic::builtin_dec(ctx, args),
            B::Mod => arithmetic::builtin_mod(ctx, args),
            B::Rem => arithmetic::builtin_rem(ctx, args),
            B::Quot => arithmetic::builtin_quot(ctx, args),
            B::Min => arithmetic::builtin_min(ctx, args),
            B::Max => arithmetic::builtin_max(ctx, args),
            B::Abs => arithmetic::builtin_abs(ctx, args),
            B::AddChecked => arithmetic::builtin_add_checked(ctx, args),
            B::SubChecked => arithmetic::builtin_sub_checked(ctx, args),
            B::MulChecked => arithmetic::builtin_mul_checked(ctx, args),
            B::IncChecked => arithmetic::builtin_inc_checked(ctx, args),
            B::DecChecked => arithmetic::builtin_dec_checked(ctx, args),

            B::Eq => compare::builtin_eq(ctx, args),
            B::NotEq => compare::builtin_not_eq(ctx, args),
            B::NumEq => compare::builtin_num_eq(ctx, args),
            B::Lt => compare::builtin_lt(ctx, args),
            B::Le => compare::builtin_le(ctx, args),
            B::Gt => compare::builtin_gt(ctx, args),
            B::Ge => compare::builtin_ge(ctx, args),
            B::Compare => compare::builtin_compare(ctx, args),
            B::ZeroQ => compare::builtin_zero(ctx, args),
            B::PosQ => compare::builtin_pos(ctx, args),
            B::NegQ => compare::builtin_neg(ctx, args),
            B::EvenQ => compare::builtin_even(ctx, args),
            B::OddQ => compare::builtin_odd(ctx, args),

            B::BitAnd => bits::builtin_bit_and(ctx, args),
            B::BitOr => bits::builtin_bit_or(ctx, args),
            B::BitXor => bits::builtin_bit_xor(ctx, args),
            B::BitNot => bits::builtin_bit_not(ctx, args),
            B::BitAndNot => bits::builtin_bit_and_not(ctx, args),
            B::BitShiftLeft => bits::builtin_bit_shift_left(ctx, args),
            B::BitShiftRight => bits::builtin_bit_shift_right(ctx, args),
            B::UnsignedBitShiftRight => bits::builtin_unsigned_bit_shift_right(ctx, args),
            B::BitSet => bits::builtin_bit_set(ctx, args),
            B::BitClear => bits::builtin_bit_clear(ctx, args),
            B::BitFlip => bits::builtin_bit_flip(ctx, args),
            B::BitTest => bits::builtin_bit_test(ctx, args),

            B::Int | B::Long => casts::builtin_long(ctx, args),
            B::Double => casts::builtin_double(ctx, args),
            B::CharCast => casts::builtin_char(ctx, args),
            B::Boolean => casts::builtin_boolean(ctx, args),
            B::ParseLong => casts::builtin_parse_long(ctx, args),
            B::ParseDouble => casts::builtin_parse_double(ctx, args),
            B::ParseBoolean => casts::builtin_parse_boolean(ctx, args),

            B::NilQ
            | B::SomeQ
            | B::TrueQ
            | B::FalseQ
            | B::NumberQ
            | B::IntQ
            | B::FloatQ
            | B::DoubleQ
            | B::BooleanQ
            | B::StringQ
            | B::CharQ
            | B::KeywordQ
            | B::SymbolQ
            | B::FnQ
            | B::IfnQ
            | B::CollQ
            | B::ListQ
            | B::VectorQ
            | B::MapQ
            | B::SetQ
            | B::SeqQ
            | B::SeqableQ
            | B::SequentialQ
            | B::CountedQ
            | B::ReducedQ
            | B::RealizedQ
            | B::DelayQ
            | B::VarQ
            | B::VolatileQ => predicates::builtin_predicate(self, ctx, args),
            B::EmptyQ => predicates::builtin_empty_q(ctx, args),
            B::NotEmpty => predicates::builtin_not_empty(ctx, args),
            B::InstanceOfQ => predicates::builtin_instance_of(ctx, args),
            B::TypeOf => predicates::builtin_type(ctx, args),
            B::ClassOf => predicates::builtin_class(ctx, args),
            B::Identity => predicates::builtin_identity(ctx, args),
            B::Not => predicates::builtin_not(ctx, args),

            B::Str => strings::builtin_str(ctx, args),
            B::PrStr => strings::builtin_pr_str(ctx, args),
            B::Subs => strings::builtin_subs(ctx, args),
            B::StringSplit => strings::builtin_split(ctx, args),
            B::StringReplace => strings::builtin_replace(ctx, args),
            B::StringReplaceFirst => strings::builtin_replace_first(ctx, args),
            B::StringJoin => strings::builtin_join(ctx, args),
            B::UpperCase => strings::builtin_upper_case(ctx, args),
            B::LowerCase => strings::builtin_lower_case(ctx, args),
            B::Capitalize => strings::builtin_capitalize(ctx, args),
            B::Trim => strings::builtin_trim(ctx, args),
            B::Triml => strings::builtin_triml(ctx, args),
            B::Trimr => strings::builtin_trimr(ctx, args),
            B::StringIncludesQ => strings::builtin_includes(ctx, args),
            B::StartsWithQ => strings::builtin_starts_with(ctx, args),
            B::EndsWithQ => strings::builtin_ends_with(ctx, args),
            B::IndexOf => strings::builtin_index_of(ctx, args),
            B::LastIndexOf => strings::builtin_last_index_of(ctx, args),
            B::StringReverse => strings::builtin_reverse(ctx, args),
            B::BlankQ => strings::builtin_blank(ctx, args),
            B::CharNameString => strings::builtin_char_name_string(ctx, args),
            B::CharEscapeString => strings::builtin_char_escape_string(ctx, args),
            B::Name => strings::builtin_name(ctx, args),
            B::Namespace => strings::builtin_namespace(ctx, args),
            B::KeywordCtor => strings::builtin_keyword(ctx, args),
            B::SymbolCtor => strings::builtin_symbol(ctx, args),

            B::ListCtor => collections::builtin_list(ctx, args),
            B::VectorCtor => collections::builtin_vector(ctx, args),
            B::VecCast => collections::builtin_vec(ctx, args),
            B::HashMapCtor => collections::builtin_hash_map(ctx, args),
            B::HashSetCtor => collections::builtin_hash_set(ctx, args),
            B::SetCast => collections::builtin_set(ctx, args),
            B::SortedMapCtor => collections::builtin_sorted_map(ctx, args),
            B::SortedSetCtor => collections::builtin_sorted_set(ctx, args),
            B::Conj => collections::builtin_conj(ctx, args),
            B::Cons => collections::builtin_cons(ctx, args),
            B::First => collections::builtin_first(ctx, args),
            B::Rest => collections::builtin_rest(ctx, args),
            B::Next => collections::builtin_next(ctx, args),
            B::Second => collections::builtin_second(ctx, args),
            B::Last => collections::builtin_last(ctx, args),
            B::Butlast => collections::builtin_butlast(ctx, args),
            B::Nth => collections::builtin_nth(ctx, args),
            B::Get => collections::builtin_get(ctx, args),
            B::GetIn => collections::builtin_get_in(ctx, args),
            B::Assoc => collections::builtin_assoc(ctx, args),
            B::Dissoc => collections::builtin_dissoc(ctx, args),
            B::Disj => collections::builtin_disj(ctx, args),
            B::ContainsQ => collections::builtin_contains(ctx, args),
            B::Count => collections::builtin_count(ctx, args),
            B::Empty => collections::builtin_empty(ctx, args),
            B::SeqFn => collections::builtin_seq(ctx, args),
            B::Keys => collections::builtin_keys(ctx, args),
            B::Vals => collections::builtin_vals(ctx, args),
            B::Peek => collections::builtin_peek(ctx, args),
            B::Pop => collections::builtin_pop(ctx, args),
            B::Subvec => collections::builtin_subvec(ctx, args),
            B::Into => collections::builtin_into(ctx, args),
            B::Reverse => collections::builtin_reverse(ctx, args),

            B::Range => seqs::builtin_range(ctx, args),
            B::MapFn => seqs::builtin_map(ctx, args),
            B::FilterFn => seqs::builtin_filter(ctx, args),
            B::Take => seqs::builtin_take(ctx, args),
            B::Drop => seqs::builtin_drop(ctx, args),
            B::Concat => seqs::builtin_concat(ctx, args),
            B::Repeat => seqs::builtin_repeat(ctx, args),
            B::Iterate => seqs::builtin_iterate(ctx, args),
            B::Reduce => seqs::builtin_reduce(ctx, args),
            B::ReducedCtor => seqs::builtin_reduced(ctx, args),
            B::Doall => seqs::builtin_doall(ctx, args),
            B::Dorun => seqs::builtin_dorun(ctx, args),
            B::LazySeqCtor => seqs::builtin_lazy_seq(ctx, args),
            B::RangeStep => seqs::step_range(ctx, args),
            B::MapStep => seqs::step_map(ctx, args),
            B::FilterStep => seqs::step_filter(ctx, args),
            B::TakeStep => seqs::step_take(ctx, args),
            B::DropStep => seqs::step_drop(ctx, args),
            B::ConcatStep => seqs::step_concat(ctx, args),
            B::RepeatStep => seqs::step_repeat(ctx, args),
            B::IterateStep => seqs::step_iterate(ctx, args),
            B::IterateTail => seqs::step_iterate_tail(ctx, args),

            B::AtomCtor => cells::builtin_atom(ctx, args),
            B::Deref => cells::builtin_deref(ctx, args),
            B::ResetBang => cells::builtin_reset(ctx, args),
            B::SwapBang => cells::builtin_swap(ctx, args),
            B::CompareAndSetBang => cells::builtin_compare_and_set(ctx, args),
            B::VolatileCtor => cells::builtin_volatile(ctx, args),
            B::VresetBang => cells::builtin_vreset(ctx, args),
            B::VswapBang => cells::builtin_vswap(ctx, args),
            B::DelayCtor => cells::builtin_delay(ctx, args),
            B::Force => cells::builtin_force(ctx, args),
            B::PromiseCtor => cells::builtin_promise(ctx, args),
            B::Deliver => cells::builtin_deliver(ctx, args),
            B::VarGet => cells::builtin_var_get(ctx, args),
            B::VarSet => cells::builtin_var_set(ctx, args),
            B::TransientCtor => cells::builtin_transient(ctx, args),
            B::PersistentBang => cells::builtin_persistent(ctx, args),
            B::ConjBang => cells::builtin_conj_bang(ctx, args),
            B::AssocBang => cells::builtin_assoc_bang(ctx, args),
            B::DissocBang => cells::builtin_dissoc_bang(ctx, args),
            B::DisjBang => cells::builtin_disj_bang(ctx, args),

            B::Apply => funcs::builtin_apply(ctx, args),
            B::PartialCtor => funcs::builtin_partial(ctx, args),
            B::CompCtor => funcs::builtin_comp(ctx, args),

            B::MultiFnCtor => multimethods::builtin_multi_fn(ctx, args),
            B::AddMethod => multimethods::builtin_add_method(ctx, args),
            B::RemoveMethod => multimethods::builtin_remove_method(ctx, args),
            B::RemoveAllMethods => multimethods::builtin_remove_all_methods(ctx, args),
            B::PreferMethod => multimethods::builtin_prefer_method(ctx, args),
            B::Prefers => multimethods::builtin_prefers(ctx, args),
            B::MethodsFn => multimethods::builtin_methods(ctx, args),
            B::GetMethod => multimethods::builtin_get_method(ctx, args),
            B::MakeHierarchy => multimethods::builtin_make_hierarchy(ctx, args),
            B::Derive => multimethods::builtin_derive(ctx, args),
            B::Underive => multimethods::builtin_underive(ctx, args),
            B::IsaQ => multimethods::builtin_isa(ctx, args),
            B::Parents => multimethods::builtin_parents(ctx, args),
            B::Ancestors => multimethods::builtin_ancestors(ctx, args),
            B::Descendants => multimethods::builtin_descendants(ctx, args),
            B::ResetGlobalHierarchyBang => multimethods::builtin_reset_global_hierarchy(ctx, args),

            B::ProtocolCtor => protocols::builtin_protocol(ctx, args),
            B::ProtocolFnCtor => protocols::builtin_protocol_fn(ctx, args),
            B::ExtendTypeBang => protocols::builtin_extend_type(ctx, args),

            B::RePattern => regex_ops::builtin_re_pattern(ctx, args),
            B::ReMatcher => regex_ops::builtin_re_matcher(ctx, args),
            B::ReMatches => regex_ops::builtin_re_matches(ctx, args),
            B::ReFind => regex_ops::builtin_re_find(ctx, args),
            B::ReSeq => regex_ops::builtin_re_seq(ctx, args),
            B::ReGroups => regex_ops::builtin_re_groups(ctx, args),

            B::Pr => print::builtin_pr(ctx, args),
            B::Prn => print::builtin_prn(ctx, args),
            B::PrintFn => print::builtin_print(ctx, args),
            B::Println => print::builtin_println(ctx, args),
            B::Newline => print::builtin_newline(ctx, args),
            B::PrintStr => print::builtin_print_str(ctx, args),
            B::PrintlnStr => print::builtin_println_str(ctx, args),

            B::ReadString => eval::builtin_read_string(ctx, args),
            B::EvalFn => eval::builtin_eval(ctx, args),
            B::LoadString => eval::builtin_load_string(ctx, args),
            B::Resolve => eval::builtin_resolve(ctx, args),
        }
    }
}

/// The registration table the external binder walks: every public
/// built-in under its language name.
#[must_use]
pub fn builtin_table() -> Vec<(&'static str, BuiltinFn)> {
    BuiltinFn::iter()
        .filter(|b| !b.is_internal())
        .map(|b| (b.name(), b))
        .collect()
}

/// The uniform calling convention.
///
/// Dispatches every core-callable value: built-ins, partial and comp
/// composites, keywords/maps/sets/vectors as functions, multi-fns,
/// protocol-fns, and vars (through their root). Interpreter closures are
/// routed to the host after an arity check.
pub fn call_value(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    target: Value,
    args: &[Value],
) -> RunResult<Value> {
    match target {
        Value::Builtin(b) => b.call(ctx, args),
        Value::Keyword(_) => {
            crate::args::check_between("keyword lookup", args, 1, 2)?;
            let default = args.get(1).copied().unwrap_or(Value::Nil);
            collections::lookup(ctx, args[0], target, default)
        }
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Closure(closure) => {
                let closure = *closure;
                if !closure.arity.accepts(args.len()) {
                    let name = match closure.name {
                        Some(sym) => ctx.interns.symbol_parts(sym).1.to_owned(),
                        None => "fn".to_owned(),
                    };
                    return Err(if closure.arity.variadic {
                        CoreError::arity_at_least(&name, closure.arity.required, args.len())
                    } else {
                        CoreError::arity_exact(&name, closure.arity.required, args.len())
                    });
                }
                ctx.host
                    .call_closure(ctx.heap, ctx.interns, ctx.print, target, args)
            }
            HeapData::Partial(partial) => {
                let callee = partial.target;
                let mut combined = partial.args.clone();
                combined.extend_from_slice(args);
                call_value(ctx, callee, &combined)
            }
            HeapData::Comp(comp) => {
                let fns = comp.fns.clone();
                match fns.split_last() {
                    None => {
                        crate::args::check_exact("comp", args, 1)?;
                        Ok(args[0])
                    }
                    Some((innermost, outer)) => {
                        let mut acc = call_value(ctx, *innermost, args)?;
                        for f in outer.iter().rev() {
                            acc = call_value(ctx, *f, &[acc])?;
                        }
                        Ok(acc)
                    }
                }
            }
            HeapData::MultiFn(_) => multimethods::dispatch_call(ctx, id, args),
            HeapData::ProtocolFn(_) => protocols::dispatch_call(ctx, id, args),
            HeapData::Var(var) => {
                let root = var.root;
                call_value(ctx, root, args)
            }
            HeapData::Map(_) => {
                crate::args::check_between("map lookup", args, 1, 2)?;
                let default = args.get(1).copied().unwrap_or(Value::Nil);
                collections::lookup(ctx, target, args[0], default)
            }
            HeapData::Set(_) => {
                crate::args::check_exact("set lookup", args, 1)?;
                collections::lookup(ctx, target, args[0], Value::Nil)
            }
            HeapData::Vector(_) => {
                crate::args::check_exact("vector lookup", args, 1)?;
                let index = crate::args::as_int("vector lookup", args[0], ctx.heap)?;
                collections::nth_value(ctx, target, index, None)
            }
            _ => Err(not_callable(ctx, target)),
        },
        _ => Err(not_callable(ctx, target)),
    }
}

fn not_callable(ctx: &Ctx<'_, impl ResourceTracker>, target: Value) -> CoreError {
    CoreError::type_error(format!("not a function: {}", target.clj_type(ctx.heap)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_strum() {
        assert_eq!(BuiltinFn::Add.name(), "+");
        assert_eq!(BuiltinFn::BitShiftLeft.name(), "bit-shift-left");
        assert_eq!(BuiltinFn::SwapBang.name(), "swap!");
        assert_eq!("unsigned-bit-shift-right".parse::<BuiltinFn>().unwrap(),
            BuiltinFn::UnsignedBitShiftRight);
    }

    #[test]
    fn registration_table_skips_internal_steps() {
        let table = builtin_table();
        assert!(table.iter().any(|(name, _)| *name == "re-find"));
        assert!(table.iter().all(|(name, _)| !name.ends_with('*')));
    }
}
