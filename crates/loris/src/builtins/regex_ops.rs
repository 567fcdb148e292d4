//! Regex built-ins: pattern compilation, matchers, find/matches/seq.
//!
//! The match value is the whole-match string when the pattern has no
//! capture groups, otherwise a `[whole g1 …]` vector with nil for groups
//! that did not participate. Zero-width matches always advance the scan
//! by at least one character.

use crate::{
    args::{as_heap_id, as_str, check_exact},
    exception::{CoreError, RunResult},
    heap::{HeapData, HeapId},
    host::Ctx,
    resource::ResourceTracker,
    types::{
        regex::{next_scan_pos, Matcher, Pattern},
        CljTrait, Type,
    },
    value::Value,
};

/// The pattern argument: a compiled pattern, or a source string compiled
/// here (`re-pattern` is idempotent on patterns).
fn pattern_arg(
    name: &str,
    v: Value,
    ctx: &mut Ctx<'_, impl ResourceTracker>,
) -> RunResult<Value> {
    match v {
        Value::Ref(id) => match ctx.heap.get(id) {
            HeapData::Regex(_) => Ok(v),
            HeapData::Str(s) => {
                let source = s.clone();
                let pattern = Pattern::compile(&source)?;
                ctx.heap.alloc_value(HeapData::Regex(pattern))
            }
            _ => Err(CoreError::wrong_type(
                name,
                "a regex or string",
                v.clj_type(ctx.heap),
            )),
        },
        _ => Err(CoreError::wrong_type(
            name,
            "a regex or string",
            v.clj_type(ctx.heap),
        )),
    }
}

/// Captured spans of one match as owned strings: whole match first, then
/// each group (`None` when it did not participate).
fn captured_groups(caps: &regex::Captures<'_>) -> Vec<Option<String>> {
    (0..caps.len())
        .map(|i| caps.get(i).map(|g| g.as_str().to_owned()))
        .collect()
}

/// Builds the match value from captured groups.
fn match_value(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    groups: &[Option<String>],
) -> RunResult<Value> {
    let whole = groups[0].clone().unwrap_or_default();
    if groups.len() == 1 {
        return ctx.heap.alloc_str(whole);
    }
    let mut items = Vec::with_capacity(groups.len());
    for group in groups {
        items.push(match group {
            Some(text) => ctx.heap.alloc_str(text.clone())?,
            None => Value::Nil,
        });
    }
    ctx.heap.alloc_vector(items)
}

pub(crate) fn builtin_re_pattern(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("re-pattern", args, 1)?;
    pattern_arg("re-pattern", args[0], ctx)
}

pub(crate) fn builtin_re_matcher(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("re-matcher", args, 2)?;
    let pattern = pattern_arg("re-matcher", args[0], ctx)?;
    let Value::Ref(pattern_id) = pattern else {
        unreachable!("pattern_arg returns a heap regex")
    };
    let input = as_str("re-matcher", args[1], ctx.heap)?.to_owned();
    ctx.heap
        .alloc_value(HeapData::Matcher(Matcher::new(pattern_id, input)))
}

pub(crate) fn builtin_re_matches(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("re-matches", args, 2)?;
    let pattern = pattern_arg("re-matches", args[0], ctx)?;
    let Value::Ref(pattern_id) = pattern else {
        unreachable!("pattern_arg returns a heap regex")
    };
    let input = as_str("re-matches", args[1], ctx.heap)?.to_owned();
    let groups = {
        let HeapData::Regex(p) = ctx.heap.get(pattern_id) else {
            unreachable!("pattern_arg returns a heap regex")
        };
        p.full().captures(&input).map(|caps| captured_groups(&caps))
    };
    match groups {
        Some(groups) => match_value(ctx, &groups),
        None => Ok(Value::Nil),
    }
}

pub(crate) fn builtin_re_find(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    match args.len() {
        1 => {
            let matcher_id = as_heap_id("re-find", args[0], ctx.heap, Type::Matcher)?;
            matcher_find(ctx, matcher_id)
        }
        2 => {
            let pattern = pattern_arg("re-find", args[0], ctx)?;
            let Value::Ref(pattern_id) = pattern else {
                unreachable!("pattern_arg returns a heap regex")
            };
            let input = as_str("re-find", args[1], ctx.heap)?.to_owned();
            let groups = {
                let HeapData::Regex(p) = ctx.heap.get(pattern_id) else {
                    unreachable!("pattern_arg returns a heap regex")
                };
                p.regex().captures(&input).map(|caps| captured_groups(&caps))
            };
            match groups {
                Some(groups) => match_value(ctx, &groups),
                None => Ok(Value::Nil),
            }
        }
        got => Err(CoreError::arity_between("re-find", 1, 2, got)),
    }
}

/// Advances a matcher to its next match, saving the captured groups.
fn matcher_find(ctx: &mut Ctx<'_, impl ResourceTracker>, matcher_id: HeapId) -> RunResult<Value> {
    let (pattern_id, input, pos) = {
        let HeapData::Matcher(m) = ctx.heap.get(matcher_id) else {
            unreachable!("probed as matcher")
        };
        (m.pattern, m.input.clone(), m.pos)
    };
    let found = {
        let HeapData::Regex(p) = ctx.heap.get(pattern_id) else {
            return Err(CoreError::state_error("matcher pattern slot is not a regex"));
        };
        if pos > input.len() {
            None
        } else {
            p.regex().captures_at(&input, pos).map(|caps| {
                let whole = caps.get(0).expect("group 0 always participates");
                (captured_groups(&caps), whole.end(), whole.len())
            })
        }
    };
    match found {
        Some((groups, end, width)) => {
            let next_pos = next_scan_pos(&input, end, width);
            {
                let HeapData::Matcher(m) = ctx.heap.get_mut(matcher_id) else {
                    unreachable!("probed as matcher")
                };
                m.pos = next_pos;
                m.groups = Some(groups.clone());
            }
            match_value(ctx, &groups)
        }
        None => {
            let HeapData::Matcher(m) = ctx.heap.get_mut(matcher_id) else {
                unreachable!("probed as matcher")
            };
            m.groups = None;
            Ok(Value::Nil)
        }
    }
}

pub(crate) fn builtin_re_groups(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("re-groups", args, 1)?;
    let matcher_id = as_heap_id("re-groups", args[0], ctx.heap, Type::Matcher)?;
    let groups = {
        let HeapData::Matcher(m) = ctx.heap.get(matcher_id) else {
            unreachable!("probed as matcher")
        };
        m.groups.clone()
    };
    match groups {
        Some(groups) => match_value(ctx, &groups),
        None => Err(CoreError::state_error("re-groups: no match has been found")),
    }
}

pub(crate) fn builtin_re_seq(
    ctx: &mut Ctx<'_, impl ResourceTracker>,
    args: &[Value],
) -> RunResult<Value> {
    check_exact("re-seq", args, 2)?;
    let pattern = pattern_arg("re-seq", args[0], ctx)?;
    let Value::Ref(pattern_id) = pattern else {
        unreachable!("pattern_arg returns a heap regex")
    };
    let input = as_str("re-seq", args[1], ctx.heap)?.to_owned();
    // Collect all non-overlapping matches eagerly.
    let all_groups = {
        let HeapData::Regex(p) = ctx.heap.get(pattern_id) else {
            unreachable!("pattern_arg returns a heap regex")
        };
        let mut found: Vec<Vec<Option<String>>> = Vec::new();
        let mut pos = 0usize;
        while pos <= input.len() {
            let Some(caps) = p.regex().captures_at(&input, pos) else {
                break;
            };
            let whole = caps.get(0).expect("group 0 always participates");
            let (end, width) = (whole.end(), whole.len());
            found.push(captured_groups(&caps));
            pos = next_scan_pos(&input, end, width);
        }
        found
    };
    if all_groups.is_empty() {
        return Ok(Value::Nil);
    }
    let mut items = Vec::with_capacity(all_groups.len());
    for groups in &all_groups {
        items.push(match_value(ctx, groups)?);
    }
    ctx.heap.alloc_list(&items)
}
