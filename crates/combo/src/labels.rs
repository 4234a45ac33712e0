//! Textual substitution between `$<index>` placeholders and variable labels.
//!
//! A variable starts at `$` and ends at the next space, `)` or newline (or at
//! the end of the text). Only the part after the `$` is rewritten. Quoted
//! literals such as `message:"…"` are copied through untouched.

use std::ops::Range;

use crate::errors::{ComboError, Result};

fn ends_variable(c: char) -> bool {
    c == ' ' || c == ')' || c == '\n'
}

/// Byte ranges of the variable names in `text`, excluding the leading `$`.
fn variable_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    let mut quoted = false;

    for (i, c) in text.char_indices() {
        match start {
            Some(s) if ends_variable(c) => {
                spans.push(s..i);
                start = None;
            }
            Some(_) => {}
            None if c == '"' => quoted = !quoted,
            None if c == '$' && !quoted => start = Some(i + 1),
            None => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..text.len());
    }
    spans
}

/// Splice `substitute(name)` over every variable name in `text`.
fn rewrite_variables<F>(text: &str, mut substitute: F) -> Result<String>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut res = String::with_capacity(text.len());
    let mut copied = 0;
    for span in variable_spans(text) {
        res.push_str(&text[copied..span.start]);
        res.push_str(&substitute(&text[span.clone()])?);
        copied = span.end;
    }
    res.push_str(&text[copied..]);
    Ok(res)
}

/// Replace `$<index>` placeholders by `$<label>`.
pub fn placeholders_to_labels(text: &str, labels: &[String]) -> Result<String> {
    rewrite_variables(text, |name| {
        name.parse::<usize>()
            .ok()
            .and_then(|idx| idx.checked_sub(1))
            .and_then(|idx| labels.get(idx))
            .cloned()
            .ok_or_else(|| ComboError::MissingLabel(name.to_string()))
    })
}

/// Replace `$<label>` by its 1-based positional placeholder `$<index>`.
pub fn labels_to_placeholders(text: &str, labels: &[String]) -> Result<String> {
    rewrite_variables(text, |name| {
        labels
            .iter()
            .position(|label| label == name)
            .map(|pos| (pos + 1).to_string())
            .ok_or_else(|| ComboError::MissingLabel(name.to_string()))
    })
}

/// Collect the variable names referenced in `text`, in order of appearance.
pub fn parse_variables(text: &str) -> Vec<String> {
    variable_spans(text)
        .into_iter()
        .map(|span| text[span].to_string())
        .collect()
}
