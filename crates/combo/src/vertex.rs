//! Vertex vocabulary for combo trees
//!
//! A vertex is the value held by one tree node. The set of variants is
//! closed; every output syntax matches on it exhaustively.

use std::fmt;

use crate::errors::{ComboError, Result};

/// Child-count contract of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    /// Any number of children, at least `min`
    Variadic { min: usize },
}

impl Arity {
    pub fn admits(&self, count: usize) -> bool {
        match *self {
            Arity::Fixed(n) => count == n,
            Arity::Variadic { min } => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "exactly {}", n),
            Arity::Variadic { min } => write!(f, "at least {}", min),
        }
    }
}

/// Builtin operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    NullVertex,
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    LogicalTrue,
    LogicalFalse,
    Cond,
    ContinIf,
    Equ,
    Plus,
    Times,
    Div,
    Log,
    Exp,
    Sin,
    GreaterThanZero,
    Impulse,
    Rand,
    List,
    Car,
    Cdr,
    Cons,
    Foldr,
    Foldl,
    Lambda,
    Apply,
}

impl Builtin {
    /// Look up a builtin by its canonical name or one of its aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let builtin = match name {
            "null_vertex" => Builtin::NullVertex,
            "and" | "logical_and" => Builtin::LogicalAnd,
            "or" | "logical_or" => Builtin::LogicalOr,
            "not" | "logical_not" => Builtin::LogicalNot,
            "true" | "logical_true" => Builtin::LogicalTrue,
            "false" | "logical_false" => Builtin::LogicalFalse,
            "cond" => Builtin::Cond,
            "contin_if" | "contin_boolean_if" => Builtin::ContinIf,
            "equ" => Builtin::Equ,
            "+" | "plus" => Builtin::Plus,
            "*" | "times" => Builtin::Times,
            "/" | "div" => Builtin::Div,
            "log" => Builtin::Log,
            "exp" => Builtin::Exp,
            "sin" => Builtin::Sin,
            "0<" => Builtin::GreaterThanZero,
            "impulse" => Builtin::Impulse,
            "rand" => Builtin::Rand,
            "list" => Builtin::List,
            "car" => Builtin::Car,
            "cdr" => Builtin::Cdr,
            "cons" => Builtin::Cons,
            "foldr" => Builtin::Foldr,
            "foldl" => Builtin::Foldl,
            "->" | "lambda" => Builtin::Lambda,
            "apply" => Builtin::Apply,
            _ => return None,
        };
        Some(builtin)
    }

    /// Canonical combo spelling
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::NullVertex => "null_vertex",
            Builtin::LogicalAnd => "and",
            Builtin::LogicalOr => "or",
            Builtin::LogicalNot => "not",
            Builtin::LogicalTrue => "true",
            Builtin::LogicalFalse => "false",
            Builtin::Cond => "cond",
            Builtin::ContinIf => "contin_if",
            Builtin::Equ => "equ",
            Builtin::Plus => "+",
            Builtin::Times => "*",
            Builtin::Div => "/",
            Builtin::Log => "log",
            Builtin::Exp => "exp",
            Builtin::Sin => "sin",
            Builtin::GreaterThanZero => "0<",
            Builtin::Impulse => "impulse",
            Builtin::Rand => "rand",
            Builtin::List => "list",
            Builtin::Car => "car",
            Builtin::Cdr => "cdr",
            Builtin::Cons => "cons",
            Builtin::Foldr => "foldr",
            Builtin::Foldl => "foldl",
            Builtin::Lambda => "->",
            Builtin::Apply => "apply",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Builtin::NullVertex | Builtin::LogicalTrue | Builtin::LogicalFalse | Builtin::Rand => {
                Arity::Fixed(0)
            }
            Builtin::LogicalNot
            | Builtin::Log
            | Builtin::Exp
            | Builtin::Sin
            | Builtin::GreaterThanZero
            | Builtin::Impulse
            | Builtin::Car
            | Builtin::Cdr => Arity::Fixed(1),
            Builtin::Equ | Builtin::Div | Builtin::Cons | Builtin::Apply => Arity::Fixed(2),
            Builtin::ContinIf | Builtin::Foldr | Builtin::Foldl => Arity::Fixed(3),
            Builtin::LogicalAnd
            | Builtin::LogicalOr
            | Builtin::Cond
            | Builtin::Plus
            | Builtin::Times
            | Builtin::Lambda => Arity::Variadic { min: 1 },
            Builtin::List => Arity::Variadic { min: 0 },
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to an input column.
///
/// The magnitude is the 1-based column index; a negative value stands for
/// the logical negation of that input. Zero never occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Argument(i32);

impl Argument {
    pub fn new(idx: i32) -> Result<Self> {
        if idx == 0 {
            return Err(ComboError::ZeroArgument);
        }
        Ok(Self(idx))
    }

    pub fn idx(&self) -> i32 {
        self.0
    }

    pub fn is_negated(&self) -> bool {
        self.0 < 0
    }

    /// 1-based column index
    pub fn abs_idx(&self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// 0-based column index
    pub fn abs_idx_from_zero(&self) -> usize {
        self.abs_idx() - 1
    }

    pub fn negate(&self) -> Self {
        Self(-self.0)
    }
}

/// Kinds of artificial neural-net vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnKind {
    Ann,
    Node,
    Input,
}

/// Reference into an artificial neural-net structure (`ann`, `$N<k>`, `$I<k>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnVertex {
    pub kind: AnnKind,
    pub idx: i32,
}

impl fmt::Display for AnnVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AnnKind::Ann => f.write_str("ann"),
            AnnKind::Node => write!(f, "$N{}", self.idx),
            AnnKind::Input => write!(f, "$I{}", self.idx),
        }
    }
}

/// Value occupying one node of a combo tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertex {
    Builtin(Builtin),
    Argument(Argument),
    Constant(f64),
    Enum(String),
    Message(String),
    Ann(AnnVertex),
    /// `_*_`
    WildCard,
}

impl Vertex {
    pub fn arity(&self) -> Arity {
        match self {
            Vertex::Builtin(b) => b.arity(),
            Vertex::Ann(AnnVertex {
                kind: AnnKind::Input,
                ..
            }) => Arity::Fixed(0),
            Vertex::Ann(_) => Arity::Variadic { min: 0 },
            Vertex::Argument(_)
            | Vertex::Constant(_)
            | Vertex::Enum(_)
            | Vertex::Message(_)
            | Vertex::WildCard => Arity::Fixed(0),
        }
    }

    pub fn as_builtin(&self) -> Option<Builtin> {
        match self {
            Vertex::Builtin(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<Builtin> for Vertex {
    fn from(b: Builtin) -> Self {
        Vertex::Builtin(b)
    }
}

impl From<Argument> for Vertex {
    fn from(a: Argument) -> Self {
        Vertex::Argument(a)
    }
}

impl From<f64> for Vertex {
    fn from(c: f64) -> Self {
        Vertex::Constant(c)
    }
}
