//! Header stripping.
//!
//! Pulls the leading `package <name>` declaration out of the raw input so
//! the extractor only sees definition blocks. Only the first line that is
//! neither blank nor a `//` comment can carry the header. The header travels with the
//! remaining text as a value; nothing is stashed globally.
use once_cell::sync::Lazy;
use regex::Regex;

static PACKAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^package\s+\w+\b").expect("static package regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preprocessed {
    /// Input with the header removed, trimmed.
    pub body: String,
    /// Normalized header (`package main`), empty if the input had none.
    pub header: String,
}

impl Preprocessed {
    pub fn package_name(&self) -> Option<&str> {
        self.header.split_whitespace().nth(1)
    }
}

pub fn split_header(input: &str) -> Preprocessed {
    let start = leading_code_offset(input);
    let Some(m) = PACKAGE_RE.find(&input[start..]) else {
        return Preprocessed { body: input.trim().to_string(), header: String::new() };
    };
    // collapse `package\n\tmain` down to a single space
    let header = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    let mut body = String::with_capacity(input.len());
    body.push_str(&input[..start + m.start()]);
    body.push_str(&input[start + m.end()..]);
    log::debug!("stripped header `{header}`");
    Preprocessed { body: body.trim().to_string(), header }
}

/// Byte offset of the first non-blank character on the first line that is
/// not blank and not a `//` comment.
fn leading_code_offset(input: &str) -> usize {
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        let code = line.trim_start();
        if !code.is_empty() && !code.starts_with("//") {
            return offset + (line.len() - code.len());
        }
        offset += line.len();
    }
    offset
}
