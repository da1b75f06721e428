//! Definition extraction: `type <Name> struct { <field> <type> ... }` blocks
//! into a [`Catalog`].
//!
//! Grammar limits:
//! - a body ends at the first `}` (no nested composites);
//! - fields are whitespace-separated `<word> <word>` pairs, one or more per
//!   `;`/newline segment; backtick tags are discarded (tags are re-derived
//!   on emission);
//! - anything else inside a body (pointers, slices, maps, qualified types,
//!   embedded types) is not a field. It is reported as a [`DroppedField`]
//!   instead of vanishing.
//!
//! Comments and backtick tags are blanked out before scanning, so neither
//! can open a definition, close a body or split a field.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::FormatError;
use crate::inference::has_identifier_suffix;
use crate::ir::{Catalog, DefinitionSpec, FieldSpec};

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\btype\s+(\S+)\s+struct\b").expect("static header regex")
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+$").expect("static word regex")
});

/// Body text that could not be read as a `<name> <type>` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedField {
    pub definition: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub catalog: Catalog,
    pub dropped: Vec<DroppedField>,
}

/// Scan `body` (header already removed) for definition blocks.
///
/// Each definition is flagged primary when one of its parsed fields ends
/// with `identifier_suffix` (case-insensitive). Any structural problem
/// fails the whole extraction.
pub fn extract(body: &str, identifier_suffix: &str) -> Result<Extraction, FormatError> {
    let body = mask_trivia(body);
    let body = body.as_str();
    let mut out = Extraction::default();
    let mut pos = 0;

    while let Some(caps) = HEADER_RE.captures_at(body, pos) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else { break };
        let name = name.as_str();
        if !is_word(name) {
            return Err(FormatError::InvalidName { name: name.to_string() });
        }

        let rest = &body[whole.end()..];
        let skipped = rest.len() - rest.trim_start().len();
        let open = whole.end() + skipped;
        if !body[open..].starts_with('{') {
            return Err(FormatError::MissingBody { name: name.to_string() });
        }
        let inner_start = open + 1;
        let Some(close) = body[inner_start..].find('}') else {
            return Err(FormatError::Unterminated { name: name.to_string() });
        };
        let inner = &body[inner_start..inner_start + close];
        pos = inner_start + close + 1;

        let def = parse_definition(name, inner, identifier_suffix, &mut out.dropped);
        log::debug!(
            "parsed `{}` with {} field(s){}",
            def.name,
            def.fields.len(),
            if def.is_primary { " (primary candidate)" } else { "" },
        );
        if out.catalog.insert(def).is_some() {
            log::warn!("definition `{name}` declared more than once; keeping the last body");
        }
    }

    Ok(out)
}

fn parse_definition(
    name: &str,
    inner: &str,
    identifier_suffix: &str,
    dropped: &mut Vec<DroppedField>,
) -> DefinitionSpec {
    let mut def = DefinitionSpec::new(name);
    let mut report = |text: String| {
        log::warn!("`{name}`: skipping unsupported field `{text}`");
        dropped.push(DroppedField { definition: name.to_string(), text });
    };

    for segment in inner.split(['\n', ';']) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        // nested composite header; its fields follow on later lines
        if segment.contains('{') {
            report(segment.to_string());
            continue;
        }

        let tokens: Vec<&str> = segment.split_whitespace().collect();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if !is_word(token) {
                report(token.to_string());
                i += 1;
                continue;
            }
            match tokens.get(i + 1) {
                Some(ty) if is_word(ty) => {
                    let field = FieldSpec { name: token.to_string(), ty: ty.to_string() };
                    if has_identifier_suffix(&field.name, identifier_suffix) {
                        def.is_primary = true;
                    }
                    def.fields.push(field);
                }
                Some(ty) => report(format!("{token} {ty}")),
                None => {
                    report(token.to_string());
                    break;
                }
            }
            i += 2;
        }
    }
    def
}

fn is_word(token: &str) -> bool {
    WORD_RE.is_match(token)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trivia { Code, Tag, LineComment, BlockComment }

/// Replace comments and backtick tags with spaces. Newlines and byte
/// offsets are preserved.
fn mask_trivia(src: &str) -> String {
    fn blank(out: &mut String, c: char) {
        if c == '\n' {
            out.push('\n');
        } else {
            for _ in 0..c.len_utf8() {
                out.push(' ');
            }
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut state = Trivia::Code;
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            Trivia::Code => match (c, chars.peek()) {
                ('`', _) => {
                    state = Trivia::Tag;
                    out.push(' ');
                }
                ('/', Some('/')) => {
                    chars.next();
                    state = Trivia::LineComment;
                    out.push_str("  ");
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = Trivia::BlockComment;
                    out.push_str("  ");
                }
                _ => out.push(c),
            },
            Trivia::Tag => {
                if c == '`' {
                    state = Trivia::Code;
                }
                blank(&mut out, c);
            }
            Trivia::LineComment => {
                if c == '\n' {
                    state = Trivia::Code;
                }
                blank(&mut out, c);
            }
            Trivia::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = Trivia::Code;
                    out.push_str("  ");
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }
    out
}
