//! Rendering combo trees in the supported output syntaxes
//!
//! - `combo`: canonical prefix form, `and($1 !$2)`; the only syntax that can
//!   be parsed back
//! - `python`: expression over an input list `i`, `(i[0] and not(i[1]))`
//! - `scheme`: link style, `(AndLink (PredicateNode "$1") (NotLink (PredicateNode "$2")))`

use std::fmt;
use std::str::FromStr;

use crate::errors::{ComboError, Result};
use crate::labels::placeholders_to_labels;
use crate::tree::ComboTree;
use crate::vertex::{Argument, Builtin, Vertex};

/// Target syntax for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Combo,
    Python,
    Scheme,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Combo => "combo",
            OutputFormat::Python => "python",
            OutputFormat::Scheme => "scheme",
        }
    }

    /// File extension used when writing rendered programs
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Combo => "combo",
            OutputFormat::Python => "py",
            OutputFormat::Scheme => "scm",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ComboError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "combo" => Ok(OutputFormat::Combo),
            "python" => Ok(OutputFormat::Python),
            "scheme" => Ok(OutputFormat::Scheme),
            other => Err(ComboError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Variable labels, indexed by 0-based column. Empty means `$<index>`.
    pub labels: &'a [String],
    /// Write a negated argument as `!$k` rather than `not($k)` (combo only)
    pub abbreviate_negation: bool,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            labels: &[],
            abbreviate_negation: true,
        }
    }
}

impl<'a> RenderOptions<'a> {
    pub fn with_labels(labels: &'a [String]) -> Self {
        Self {
            labels,
            ..Self::default()
        }
    }

    fn variable(&self, arg: &Argument) -> Result<String> {
        if self.labels.is_empty() {
            return Ok(arg.abs_idx().to_string());
        }
        self.labels
            .get(arg.abs_idx_from_zero())
            .cloned()
            .ok_or_else(|| ComboError::MissingLabel(arg.abs_idx().to_string()))
    }
}

/// Render `tree` in the requested syntax.
pub fn render(tree: &ComboTree, format: OutputFormat, opts: &RenderOptions<'_>) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Combo => {
            write_combo(&mut out, tree, opts)?;
            if !opts.labels.is_empty() {
                out = placeholders_to_labels(&out, opts.labels)?;
            }
        }
        OutputFormat::Python => write_python(&mut out, tree, opts)?,
        OutputFormat::Scheme => write_scheme(&mut out, tree, opts)?,
    }
    Ok(out)
}

fn unrepresentable(vertex: &Vertex, format: OutputFormat) -> ComboError {
    ComboError::Unrepresentable {
        vertex: format!("{:?}", vertex),
        format: format.to_string(),
    }
}

fn quote_if_needed(text: &str) -> String {
    if text.is_empty() || text.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
        format!("\"{}\"", text)
    } else {
        text.to_string()
    }
}

// combo

fn combo_vertex(out: &mut String, vertex: &Vertex, opts: &RenderOptions<'_>) -> Result<()> {
    match vertex {
        Vertex::Builtin(b) => out.push_str(b.name()),
        Vertex::Argument(a) => {
            let var = a.abs_idx();
            match (a.is_negated(), opts.abbreviate_negation) {
                (false, _) => out.push_str(&format!("${}", var)),
                (true, true) => out.push_str(&format!("!${}", var)),
                (true, false) => out.push_str(&format!("not(${})", var)),
            }
        }
        Vertex::Constant(c) => out.push_str(&c.to_string()),
        Vertex::Enum(name) => out.push_str(&format!("enum:{}", quote_if_needed(name))),
        Vertex::Message(text) => out.push_str(&format!("message:\"{}\"", text)),
        Vertex::Ann(ann) => out.push_str(&ann.to_string()),
        Vertex::WildCard => out.push_str("_*_"),
    }
    Ok(())
}

fn write_combo(out: &mut String, tree: &ComboTree, opts: &RenderOptions<'_>) -> Result<()> {
    combo_vertex(out, tree.vertex(), opts)?;
    if tree.has_children() {
        out.push('(');
        for (i, child) in tree.children().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write_combo(out, child, opts)?;
        }
        out.push(')');
    }
    Ok(())
}

// python

fn python_builtin(b: Builtin) -> Option<&'static str> {
    let name = match b {
        Builtin::NullVertex => "null_vertex",
        Builtin::LogicalAnd => "and",
        Builtin::LogicalOr => "or",
        Builtin::LogicalNot => "not",
        Builtin::LogicalTrue => "True",
        Builtin::LogicalFalse => "False",
        Builtin::Plus => "adds",
        Builtin::Times => "muls",
        Builtin::Div => "pdiv",
        Builtin::GreaterThanZero => "l0",
        Builtin::Log => "log",
        Builtin::Exp => "exp",
        Builtin::Sin => "sin",
        _ => return None,
    };
    Some(name)
}

fn python_vertex(vertex: &Vertex) -> Result<String> {
    match vertex {
        Vertex::Builtin(b) => python_builtin(*b)
            .map(str::to_string)
            .ok_or_else(|| unrepresentable(vertex, OutputFormat::Python)),
        Vertex::Argument(a) if a.is_negated() => Ok(format!("not(i[{}])", a.abs_idx_from_zero())),
        Vertex::Argument(a) => Ok(format!("i[{}]", a.abs_idx_from_zero())),
        Vertex::Constant(c) => Ok(c.to_string()),
        Vertex::Enum(text) | Vertex::Message(text) => Ok(text.clone()),
        Vertex::Ann(_) | Vertex::WildCard => Err(unrepresentable(vertex, OutputFormat::Python)),
    }
}

fn write_python(out: &mut String, tree: &ComboTree, opts: &RenderOptions<'_>) -> Result<()> {
    let head = python_vertex(tree.vertex())?;
    let infix = tree.is_builtin(Builtin::LogicalAnd) || tree.is_builtin(Builtin::LogicalOr);

    if infix {
        if !tree.has_children() {
            let empty = if tree.is_builtin(Builtin::LogicalAnd) { "True" } else { "False" };
            out.push_str(empty);
            return Ok(());
        }
        out.push('(');
        for (i, child) in tree.children().iter().enumerate() {
            if i > 0 {
                out.push_str(&format!(" {} ", head));
            }
            write_python(out, child, opts)?;
        }
        out.push(')');
        return Ok(());
    }

    out.push_str(&head);
    if tree.has_children() {
        out.push('(');
        for (i, child) in tree.children().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_python(out, child, opts)?;
        }
        out.push(')');
    }
    Ok(())
}

// scheme

fn scheme_builtin(b: Builtin) -> Option<&'static str> {
    let name = match b {
        Builtin::NullVertex => "null_vertex",
        Builtin::LogicalAnd => "AndLink",
        Builtin::LogicalOr => "OrLink",
        Builtin::LogicalNot => "NotLink",
        Builtin::LogicalTrue => "PredicateNode \"Top\"",
        Builtin::LogicalFalse => "PredicateNode \"Bottom\"",
        _ => return None,
    };
    Some(name)
}

fn scheme_vertex(vertex: &Vertex, opts: &RenderOptions<'_>) -> Result<String> {
    match vertex {
        Vertex::Builtin(b) => scheme_builtin(*b)
            .map(str::to_string)
            .ok_or_else(|| unrepresentable(vertex, OutputFormat::Scheme)),
        Vertex::Argument(a) => {
            let name = if opts.labels.is_empty() {
                format!("${}", a.abs_idx())
            } else {
                opts.variable(a)?
            };
            let predicate = format!("PredicateNode \"{}\"", name);
            if a.is_negated() {
                Ok(format!("NotLink ({})", predicate))
            } else {
                Ok(predicate)
            }
        }
        Vertex::Constant(c) => Ok(c.to_string()),
        Vertex::Enum(text) | Vertex::Message(text) => Ok(text.clone()),
        Vertex::Ann(_) | Vertex::WildCard => Err(unrepresentable(vertex, OutputFormat::Scheme)),
    }
}

fn write_scheme(out: &mut String, tree: &ComboTree, opts: &RenderOptions<'_>) -> Result<()> {
    out.push('(');
    out.push_str(&scheme_vertex(tree.vertex(), opts)?);
    for child in tree.children() {
        out.push(' ');
        write_scheme(out, child, opts)?;
    }
    out.push(')');
    Ok(())
}

impl fmt::Display for ComboTree {
    /// Canonical combo text without labels
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_combo(&mut out, self, &RenderOptions::default()).map_err(|_| fmt::Error)?;
        f.write_str(&out)
    }
}
