//! The regex layer: compiled patterns and stateful matchers.
//!
//! A `Pattern` compiles its source once through the `regex` crate; a
//! second anchored compilation backs whole-input matching (`re-matches`).
//! A `Matcher` scans one input string, remembering its position and the
//! groups of the most recent successful match.

use regex::Regex;

use crate::{
    exception::{CoreError, RunResult},
    heap::HeapId,
};

/// A compiled regular expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    full: Regex,
    group_count: usize,
}

impl Pattern {
    /// Compiles `source`, reporting malformed patterns as EvalError.
    pub fn compile(source: &str) -> RunResult<Self> {
        let regex = Regex::new(source)
            .map_err(|err| CoreError::eval_error(format!("invalid regex {source:?}: {err}")))?;
        // Anchored twin for whole-input matching; (?:…) keeps group
        // numbering identical.
        let full = Regex::new(&format!("\\A(?:{source})\\z"))
            .map_err(|err| CoreError::eval_error(format!("invalid regex {source:?}: {err}")))?;
        let group_count = regex.captures_len() - 1;
        Ok(Self {
            source: source.to_owned(),
            regex,
            full,
            group_count,
        })
    }

    /// The original pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The unanchored compiled form.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// The whole-input anchored compiled form.
    #[must_use]
    pub fn full(&self) -> &Regex {
        &self.full
    }

    /// Number of capture groups (excluding the whole match).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }
}

/// A stateful scanner over one input string.
#[derive(Debug, Clone)]
pub struct Matcher {
    /// The pattern this matcher scans with.
    pub pattern: HeapId,
    /// The input being scanned.
    pub input: String,
    /// Byte offset the next `re-find` starts from.
    pub pos: usize,
    /// Captured spans of the most recent successful match: the whole
    /// match followed by each group, `None` for non-participating groups.
    pub groups: Option<Vec<Option<String>>>,
}

impl Matcher {
    /// A matcher positioned at the start of `input`.
    #[must_use]
    pub fn new(pattern: HeapId, input: String) -> Self {
        Self {
            pattern,
            input,
            pos: 0,
            groups: None,
        }
    }
}

/// The scan position after a match ending at `end`.
///
/// Zero-width matches advance past one character so repeated scans
/// terminate; `width` is the matched byte length.
#[must_use]
pub fn next_scan_pos(input: &str, end: usize, width: usize) -> usize {
    if width > 0 {
        return end;
    }
    match input[end..].chars().next() {
        Some(ch) => end + ch.len_utf8(),
        None => end + 1,
    }
}

/// Expands a replacement template against the groups of one match.
///
/// `$0`–`$9` substitute the group's text (empty when the group did not
/// participate); `\c` emits `c` literally, so `\$` is a literal dollar.
/// A trailing lone `$` or `\` is literal.
pub fn expand_template(out: &mut String, template: &str, group: impl Fn(usize) -> Option<String>) {
    let mut chars = template.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '$' => match chars.clone().next() {
                Some(digit @ '0'..='9') => {
                    chars.next();
                    let index = digit as usize - '0' as usize;
                    if let Some(text) = group(index) {
                        out.push_str(&text);
                    }
                }
                _ => out.push('$'),
            },
            '\\' => match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            },
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_counts_groups() {
        let p = Pattern::compile(r"(\d+)-(\d+)").unwrap();
        assert_eq!(p.group_count(), 2);
        assert!(Pattern::compile("(unclosed").is_err());
    }

    #[test]
    fn zero_width_scan_advances() {
        assert_eq!(next_scan_pos("ab", 0, 0), 1);
        assert_eq!(next_scan_pos("ab", 1, 1), 1);
        // multibyte character boundary
        assert_eq!(next_scan_pos("é", 0, 0), 2);
        // end of input still advances past the end to stop the scan
        assert_eq!(next_scan_pos("ab", 2, 0), 3);
    }

    #[test]
    fn template_expansion() {
        let groups = ["12-34", "12", "34"];
        let lookup = |i: usize| groups.get(i).map(|s| (*s).to_string());
        let mut out = String::new();
        expand_template(&mut out, "$2<$1>\\$ $9 $x$", lookup);
        assert_eq!(out, "34<12>$  $x$");
    }
}
