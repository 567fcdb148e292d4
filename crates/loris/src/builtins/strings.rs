//! String built-ins: formatting, slicing, case, search, split/replace,
//! and the keyword/symbol constructors.
//!
//! Indices are character indices. `str` uses display formatting and
//! forces lazy-seq arguments first; `pr-str` uses readable formatting and
//! does not force.

use crate::{
    args::{as_int, as_str, check_between, check_exact},
    exception::{CoreError, RunResult},
    heap::HeapData,
    host::Ctx,
    resource::ResourceTracker,
    seq::seq_to_vec,
    types::{
        regex::{expand_template, next_scan_pos},
        CljTrait, MapEntry, PersistentMap, PrintMode,
    },
    value::{char_escape, Value, NAMED_CHARS},
};

/// Byte offset of the `index`-th character, or `None` past the end.
fn char_to_byte(s: &str, index: usize) -> Option<usize> {
    if index == 0 {
        return Some(0);
    }
    s.char_indices()
        .nth(index - 1)
        .map(|(byte, ch)| byte + ch.len_utf8())
}

/// Character index of a byte offset that sits on a char boundary.
fn byte_to_char(s: &str, byte: usize) -> usize {
    s[..byte].chars().count()
}

pub(crate) fn builtin_str(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    let mut out = String::new();
    for &arg in args {
        if matches!(arg, Value::Nil) {
            continue;
        }
        // Force lazy sequences so their contents print, not a placeholder.
        if let Value::Ref(id) = arg
            && matches!(ctx.heap.get(id), HeapData::LazySeq(_))
        {
            seq_to_vec(ctx, arg)?;
        }
        out.push_str(&arg.to_print_string(ctx.heap, ctx.interns, PrintMode::Display));
    }
    ctx.heap.alloc_str(out)
}

pub(crate) fn builtin_pr_str(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&arg.to_print_string(ctx.heap, ctx.interns, PrintMode::Readable));
    }
    ctx.heap.alloc_str(out)
}

pub(crate) fn builtin_subs(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_between("subs", args, 2, 3)?;
    let s = as_str("subs", args[0], ctx.heap)?;
    let total = s.chars().count();
    let start = as_int("subs", args[1], ctx.heap)?;
    let end = match args.get(2) {
        Some(&v) => as_int("subs", v, ctx.heap)?,
        None => i64::try_from(total).unwrap_or(i64::MAX),
    };
    let start_usize = usize::try_from(start).map_err(|_| CoreError::index_out_of_bounds(start, total))?;
    let end_usize = usize::try_from(end).map_err(|_| CoreError::index_out_of_bounds(end, total))?;
    if start_usize > total {
        return Err(CoreError::index_out_of_bounds(start, total));
    }
    if end_usize > total {
        return Err(CoreError::index_out_of_bounds(end, total));
    }
    if end_usize < start_usize {
        return Err(CoreError::index_error(format!(
            "subs: end {end} is before start {start}"
        )));
    }
    let from = char_to_byte(s, start_usize).unwrap_or(s.len());
    let to = char_to_byte(s, end_usize).unwrap_or(s.len());
    let piece = s[from..to].to_owned();
    ctx.heap.alloc_str(piece)
}

/// The split separator: a compiled pattern or a literal string/char.
enum SplitSep {
    Literal(String),
    Pattern(regex::Regex),
}

fn split_separator(
    name: &str,
    v: Value,
    ctx: &Ctx<'_, impl ResourceTracker>,
) -> RunResult<SplitSep> {
    match v {
        Value::Char(c) => Ok(SplitSep::Literal(c.to_string())),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Str(s) => Ok(SplitSep::Literal(s.clone())),
            HeapData::Regex(p) => Ok(SplitSep::Pattern(p.regex().clone())),
            _ => Err(CoreError::wrong_type(
                name,
                "a string, character, or regex",
                v.clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            name,
            "a string, character, or regex",
            v.clj_type(ctx.heap),
        )),
    }
}

/// Splits `s` into parts, each span reported as `(start, end)` bytes.
fn split_spans(s: &str, sep: &SplitSep, limit: Option<usize>) -> Vec<(usize, usize)> {
    let mut parts: Vec<(usize, usize)> = Vec::new();
    let mut last = 0usize;
    let mut pos = 0usize;
    loop {
        if let Some(limit) = limit
            && parts.len() + 1 >= limit
        {
            break;
        }
        let found = match sep {
            SplitSep::Literal(lit) => {
                if lit.is_empty() {
                    // An empty separator splits between characters.
                    s[pos..].chars().next().map(|_| (pos, pos))
                } else if pos > s.len() {
                    None
                } else {
                    s[pos..].find(lit.as_str()).map(|at| (pos + at, pos + at + lit.len()))
                }
            }
            SplitSep::Pattern(regex) => {
                if pos > s.len() {
                    None
                } else {
                    regex.find_at(s, pos).map(|m| (m.start(), m.end()))
                }
            }
        };
        let Some((start, end)) = found else { break };
        // A zero-width match at the very start yields no leading empty part.
        if !(start == end && start == 0) {
            parts.push((last, start));
            last = end;
        }
        pos = next_scan_pos(s, end, end - start);
        if pos > s.len() {
            break;
        }
    }
    parts.push((last, s.len()));
    if limit.is_none() {
        while parts.len() > 1 {
            let &(from, to) = parts.last().expect("non-empty");
            if from == to {
                parts.pop();
            } else {
                break;
            }
        }
    }
    parts
}

pub(crate) fn builtin_split(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("string-split", args, 2, 3)?;
    let s = as_str("string-split", args[0], ctx.heap)?.to_owned();
    let sep = split_separator("string-split", args[1], ctx)?;
    let limit = match args.get(2) {
        Some(&v) => {
            let n = as_int("string-split", v, ctx.heap)?;
            usize::try_from(n).ok().filter(|&n| n > 0)
        }
        None => None,
    };
    let spans = split_spans(&s, &sep, limit);
    let mut parts = Vec::with_capacity(spans.len());
    for (from, to) in spans {
        parts.push(ctx.heap.alloc_str(s[from..to].to_owned())?);
    }
    ctx.heap.alloc_vector(parts)
}

/// The match argument of `string-replace`: a literal or a pattern.
enum ReplaceMatch {
    Literal(String),
    Pattern(regex::Regex),
}

fn replace_match(
    name: &str,
    v: Value,
    ctx: &Ctx<'_, impl ResourceTracker>,
) -> RunResult<ReplaceMatch> {
    match v {
        Value::Char(c) => Ok(ReplaceMatch::Literal(c.to_string())),
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Str(s) => Ok(ReplaceMatch::Literal(s.clone())),
            HeapData::Regex(p) => Ok(ReplaceMatch::Pattern(p.regex().clone())),
            _ => Err(CoreError::wrong_type(
                name,
                "a string, character, or regex",
                v.clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            name,
            "a string, character, or regex",
            v.clj_type(ctx.heap),
        )),
    }
}

/// Regex replacement driver shared by `string-replace` and `-first`.
///
/// Zero-width matches advance the scan by one character so the loop
/// terminates.
fn replace_regex(s: &str, regex: &regex::Regex, template: &str, only_first: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last = 0usize;
    let mut pos = 0usize;
    while pos <= s.len() {
        let Some(caps) = regex.captures_at(s, pos) else { break };
        let whole = caps.get(0).expect("group 0 always participates");
        out.push_str(&s[last..whole.start()]);
        expand_template(&mut out, template, |i| {
            caps.get(i).map(|g| g.as_str().to_owned())
        });
        last = whole.end();
        if only_first {
            break;
        }
        pos = next_scan_pos(s, whole.end(), whole.len());
        if pos > s.len() {
            break;
        }
        // A zero-width match leaves the skipped character in the output.
        if pos > last {
            out.push_str(&s[last..pos]);
            last = pos;
        }
    }
    out.push_str(&s[last..]);
    out
}

fn replace_impl(
    name: &str,
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    only_first: bool,
) -> RunResult<Value> {
    check_exact(name, args, 3)?;
    let s = as_str(name, args[0], ctx.heap)?.to_owned();
    let matcher = replace_match(name, args[1], ctx)?;
    let result = match matcher {
        ReplaceMatch::Literal(from) => {
            let to = match args[2] {
                Value::Char(c) => c.to_string(),
                v => as_str(name, v, ctx.heap)?.to_owned(),
            };
            if from.is_empty() {
                s
            } else if only_first {
                s.replacen(&from, &to, 1)
            } else {
                s.replace(&from, &to)
            }
        }
        ReplaceMatch::Pattern(regex) => {
            let template = as_str(name, args[2], ctx.heap)?.to_owned();
            replace_regex(&s, &regex, &template, only_first)
        }
    };
    ctx.heap.alloc_str(result)
}

pub(crate) fn builtin_replace(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    replace_impl("string-replace", ctx, args, false)
}

pub(crate) fn builtin_replace_first(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    replace_impl("string-replace-first", ctx, args, true)
}

pub(crate) fn builtin_join(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_between("string-join", args, 1, 2)?;
    let (sep, coll) = match args {
        [coll] => (String::new(), *coll),
        [sep, coll] => (
            sep.to_print_string(ctx.heap, ctx.interns, PrintMode::Display),
            *coll,
        ),
        _ => unreachable!("arity checked"),
    };
    let items = seq_to_vec(ctx, coll)?;
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(&sep);
        }
        if !matches!(item, Value::Nil) {
            out.push_str(&item.to_print_string(ctx.heap, ctx.interns, PrintMode::Display));
        }
    }
    ctx.heap.alloc_str(out)
}

fn map_str(
    name: &str,
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
    f: impl Fn(&str) -> String,
) -> RunResult<Value> {
    check_exact(name, args, 1)?;
    let out = f(as_str(name, args[0], ctx.heap)?);
    ctx.heap.alloc_str(out)
}

pub(crate) fn builtin_upper_case(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    map_str("upper-case", ctx, args, str::to_uppercase)
}

pub(crate) fn builtin_lower_case(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    map_str("lower-case", ctx, args, str::to_lowercase)
}

pub(crate) fn builtin_capitalize(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    map_str("capitalize", ctx, args, |s| {
        let mut chars = s.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            }
        }
    })
}

pub(crate) fn builtin_trim(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    map_str("trim", ctx, args, |s| s.trim().to_owned())
}

pub(crate) fn builtin_triml(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    map_str("triml", ctx, args, |s| s.trim_start().to_owned())
}

pub(crate) fn builtin_trimr(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    map_str("trimr", ctx, args, |s| s.trim_end().to_owned())
}

pub(crate) fn builtin_includes(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("string-includes?", args, 2)?;
    let s = as_str("string-includes?", args[0], ctx.heap)?;
    let sub = as_str("string-includes?", args[1], ctx.heap)?;
    Ok(Value::Bool(s.contains(sub)))
}

pub(crate) fn builtin_starts_with(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("starts-with?", args, 2)?;
    let s = as_str("starts-with?", args[0], ctx.heap)?;
    let prefix = as_str("starts-with?", args[1], ctx.heap)?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

pub(crate) fn builtin_ends_with(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("ends-with?", args, 2)?;
    let s = as_str("ends-with?", args[0], ctx.heap)?;
    let suffix = as_str("ends-with?", args[1], ctx.heap)?;
    Ok(Value::Bool(s.ends_with(suffix)))
}

/// The needle of `index-of`: a string or a single character.
fn needle(name: &str, v: Value, ctx: &Ctx<'_, impl ResourceTracker>) -> RunResult<String> {
    match v {
        Value::Char(c) => Ok(c.to_string()),
        _ => Ok(as_str(name, v, ctx.heap)?.to_owned()),
    }
}

pub(crate) fn builtin_index_of(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("index-of", args, 2, 3)?;
    let s = as_str("index-of", args[0], ctx.heap)?;
    let sub = needle("index-of", args[1], ctx)?;
    let from = match args.get(2) {
        Some(&v) => {
            let i = as_int("index-of", v, ctx.heap)?;
            usize::try_from(i.max(0)).unwrap_or(0)
        }
        None => 0,
    };
    let Some(from_byte) = char_to_byte(s, from) else {
        return Ok(Value::Nil);
    };
    Ok(match s[from_byte..].find(&sub) {
        Some(at) => Value::Int(byte_to_char(s, from_byte + at) as i64),
        None => Value::Nil,
    })
}

pub(crate) fn builtin_last_index_of(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("last-index-of", args, 2, 3)?;
    let s = as_str("last-index-of", args[0], ctx.heap)?;
    let sub = needle("last-index-of", args[1], ctx)?;
    let end = match args.get(2) {
        Some(&v) => {
            let i = as_int("last-index-of", v, ctx.heap)?;
            usize::try_from(i.max(0)).unwrap_or(0)
        }
        None => s.chars().count(),
    };
    let end_byte = char_to_byte(s, end.min(s.chars().count())).unwrap_or(s.len());
    // Search in s[..end_byte + len(sub)] so a match starting at `end` counts.
    let window_end = (end_byte + sub.len()).min(s.len());
    Ok(match s[..window_end].rfind(&sub) {
        Some(at) => Value::Int(byte_to_char(s, at) as i64),
        None => Value::Nil,
    })
}

pub(crate) fn builtin_reverse(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    map_str("string-reverse", ctx, args, |s| s.chars().rev().collect())
}

pub(crate) fn builtin_blank(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("blank?", args, 1)?;
    Ok(Value::Bool(match args[0] {
        Value::Nil => true,
        v => as_str("blank?", v, ctx.heap)?.trim().is_empty(),
    }))
}

/// The canonical named-character map.
pub(crate) fn builtin_char_name_string(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("char-name-string", args, 0)?;
    let mut entries = Vec::with_capacity(NAMED_CHARS.len());
    for (ch, name) in NAMED_CHARS {
        let value = ctx.heap.alloc_str(name)?;
        entries.push(MapEntry {
            key: Value::Char(ch),
            value,
        });
    }
    ctx.heap
        .alloc_value(HeapData::Map(PersistentMap::from_entries(entries, false)))
}

/// The named characters plus `\"` and `\\`, mapped to their two-character
/// escape forms.
pub(crate) fn builtin_char_escape_string(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("char-escape-string", args, 0)?;
    let chars = ['\n', '\t', '\r', '\u{8}', '\u{c}', '"', '\\'];
    let mut entries = Vec::with_capacity(chars.len());
    for ch in chars {
        let escape = char_escape(ch).expect("listed characters all have escapes");
        let value = ctx.heap.alloc_str(escape)?;
        entries.push(MapEntry {
            key: Value::Char(ch),
            value,
        });
    }
    ctx.heap
        .alloc_value(HeapData::Map(PersistentMap::from_entries(entries, false)))
}

pub(crate) fn builtin_name(ctx: &mut Ctx<'_, impl ResourceTracker>, args: &[Value]) -> RunResult<Value> {
    check_exact("name", args, 1)?;
    let text = match args[0] {
        Value::Keyword(id) => ctx.interns.keyword_parts(id).1.to_owned(),
        Value::Symbol(id) => ctx.interns.symbol_parts(id).1.to_owned(),
        v => as_str("name", v, ctx.heap)?.to_owned(),
    };
    ctx.heap.alloc_str(text)
}

pub(crate) fn builtin_namespace(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("namespace", args, 1)?;
    let ns = match args[0] {
        Value::Keyword(id) => ctx.interns.keyword_parts(id).0.map(str::to_owned),
        Value::Symbol(id) => ctx.interns.symbol_parts(id).0.map(str::to_owned),
        v => {
            return Err(CoreError::wrong_type(
                "namespace",
                "a keyword or symbol",
                v.clj_type(ctx.heap),
            ));
        }
    };
    match ns {
        Some(ns) => ctx.heap.alloc_str(ns),
        None => Ok(Value::Nil),
    }
}

pub(crate) fn builtin_keyword(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("keyword", args, 1, 2)?;
    if args.len() == 2 {
        let ns = match args[0] {
            Value::Nil => None,
            v => Some(as_str("keyword", v, ctx.heap)?.to_owned()),
        };
        let name = as_str("keyword", args[1], ctx.heap)?.to_owned();
        return Ok(Value::Keyword(ctx.interns.keyword(ns.as_deref(), &name)));
    }
    match args[0] {
        Value::Keyword(id) => Ok(Value::Keyword(id)),
        Value::Symbol(id) => {
            let (ns, name) = ctx.interns.symbol_parts(id);
            let (ns, name) = (ns.map(str::to_owned), name.to_owned());
            Ok(Value::Keyword(ctx.interns.keyword(ns.as_deref(), &name)))
        }
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Str(s) => {
                let spelling = s.clone();
                Ok(Value::Keyword(ctx.interns.keyword_from_str(&spelling)))
            }
            _ => Ok(Value::Nil),
        },
        _ => Ok(Value::Nil),
    }
}

pub(crate) fn builtin_symbol(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_between("symbol", args, 1, 2)?;
    if args.len() == 2 {
        let ns = match args[0] {
            Value::Nil => None,
            v => Some(as_str("symbol", v, ctx.heap)?.to_owned()),
        };
        let name = as_str("symbol", args[1], ctx.heap)?.to_owned();
        return Ok(Value::Symbol(ctx.interns.symbol(ns.as_deref(), &name)));
    }
    match args[0] {
        Value::Symbol(id) => Ok(Value::Symbol(id)),
        Value::Keyword(id) => {
            let (ns, name) = ctx.interns.keyword_parts(id);
            let (ns, name) = (ns.map(str::to_owned), name.to_owned());
            Ok(Value::Symbol(ctx.interns.symbol(ns.as_deref(), &name)))
        }
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Str(s) => {
                let spelling = s.clone();
                Ok(Value::Symbol(ctx.interns.symbol_from_str(&spelling)))
            }
            _ => Err(CoreError::wrong_type(
                "symbol",
                "a string, symbol, or keyword",
                args[0].clj_type(ctx.heap),
            )),
        },
        v => Err(CoreError::wrong_type(
            "symbol",
            "a string, symbol, or keyword",
            v.clj_type(ctx.heap),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_index_mapping() {
        assert_eq!(char_to_byte("héllo", 0), Some(0));
        assert_eq!(char_to_byte("héllo", 2), Some(3));
        assert_eq!(char_to_byte("ab", 2), Some(2));
        assert_eq!(char_to_byte("ab", 3), None);
        assert_eq!(byte_to_char("héllo", 3), 2);
    }

    #[test]
    fn split_spans_drop_trailing_empties() {
        let sep = SplitSep::Literal(",".to_owned());
        let spans = split_spans("a,b,,", &sep, None);
        assert_eq!(spans, vec![(0, 1), (2, 3)]);
        let spans = split_spans("a,b,,", &sep, Some(10));
        assert_eq!(spans.len(), 4);
    }

    #[test]
    fn replace_regex_zero_width_terminates() {
        let regex = regex::Regex::new("x*").unwrap();
        let out = replace_regex("ab", &regex, "-", false);
        // Every inter-character gap matches zero-width.
        assert_eq!(out, "-a-b-");
    }
}
