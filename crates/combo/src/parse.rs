//! Reading canonical combo text into trees
//!
//! Grammar:
//!
//! ```text
//! tree  := token [ "(" tree* ")" ]
//! token := builtin | $k | !$k | number | enum:.. | message:".." | _*_ | ann | $N<k> | $I<k>
//! ```
//!
//! Labels, when given, are first rewritten to their `$<index>` placeholders.

use crate::errors::{ComboError, ParseError};
use crate::labels::labels_to_placeholders;
use crate::tree::ComboTree;
use crate::vertex::{AnnKind, AnnVertex, Argument, Builtin, Vertex};

const MESSAGE_PREFIX: &str = "message:";
const ENUM_PREFIX: &str = "enum:";

/// Deepest nesting accepted from text
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    Open,
    Close,
    Word(String),
}

#[derive(Debug, Clone)]
struct Token {
    lexeme: Lexeme,
    offset: usize,
}

struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos >= self.source.len() {
            return Ok(None);
        }

        let start = self.pos;
        let lexeme = match self.source[self.pos] {
            b'(' => {
                self.pos += 1;
                Lexeme::Open
            }
            b')' => {
                self.pos += 1;
                Lexeme::Close
            }
            _ => self.scan_word()?,
        };
        Ok(Some(Token {
            lexeme,
            offset: start,
        }))
    }

    /// A word runs up to whitespace or a parenthesis. Double-quoted sections
    /// (enum and message literals) may contain either.
    fn scan_word(&mut self) -> Result<Lexeme, ParseError> {
        let start = self.pos;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'"' => {
                    let quote = self.pos;
                    self.pos += 1;
                    while self.pos < self.source.len() && self.source[self.pos] != b'"' {
                        self.pos += 1;
                    }
                    if self.pos >= self.source.len() {
                        return Err(ParseError::UnterminatedString { offset: quote });
                    }
                    self.pos += 1;
                }
                b'(' | b')' => break,
                c if c.is_ascii_whitespace() => break,
                _ => self.pos += 1,
            }
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        Ok(Lexeme::Word(text))
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    text.strip_prefix('"').and_then(|t| t.strip_suffix('"'))
}

fn argument_vertex(digits: &str, negated: bool, offset: usize) -> Result<Option<Vertex>, ParseError> {
    let Ok(idx) = digits.parse::<i32>() else {
        return Ok(None);
    };
    if idx < 0 {
        return Ok(None);
    }
    let idx = if negated { -idx } else { idx };
    let arg = Argument::new(idx).map_err(|_| ParseError::ZeroArgument { offset })?;
    Ok(Some(Vertex::Argument(arg)))
}

fn ann_vertex(word: &str) -> Option<Vertex> {
    if word == "ann" {
        return Some(Vertex::Ann(AnnVertex {
            kind: AnnKind::Ann,
            idx: 0,
        }));
    }
    let rest = word.strip_prefix('$')?;
    let kind = match rest.as_bytes().first()? {
        b'N' => AnnKind::Node,
        b'I' => AnnKind::Input,
        _ => return None,
    };
    let idx = rest[1..].parse::<i32>().ok()?;
    Some(Vertex::Ann(AnnVertex { kind, idx }))
}

/// Interpret one word as a vertex.
fn word_to_vertex(word: &str, offset: usize) -> Result<Vertex, ParseError> {
    let unknown = || ParseError::UnknownToken {
        token: word.to_string(),
        offset,
    };

    if let Some(b) = Builtin::from_name(word) {
        return Ok(Vertex::Builtin(b));
    }
    if word == "_*_" {
        return Ok(Vertex::WildCard);
    }
    if let Some(ann) = ann_vertex(word) {
        return Ok(ann);
    }
    if let Some(digits) = word.strip_prefix("!$") {
        return argument_vertex(digits, true, offset)?.ok_or_else(unknown);
    }
    if let Some(digits) = word.strip_prefix('$') {
        return argument_vertex(digits, false, offset)?.ok_or_else(unknown);
    }
    if let Ok(c) = word.parse::<f64>() {
        return Ok(Vertex::Constant(c));
    }
    if let Some(rest) = word.strip_prefix(MESSAGE_PREFIX) {
        return strip_quotes(rest)
            .map(|m| Vertex::Message(m.to_string()))
            .ok_or_else(unknown);
    }
    if let Some(rest) = word.strip_prefix(ENUM_PREFIX) {
        let name = strip_quotes(rest).unwrap_or(rest);
        return Ok(Vertex::Enum(name.to_string()));
    }
    Err(unknown())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, end: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn parse_tree(&mut self, depth: usize) -> Result<ComboTree, ParseError> {
        let Some(tok) = self.tokens.get(self.pos).cloned() else {
            return Err(ParseError::Unbalanced { offset: self.end });
        };
        if depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { offset: tok.offset });
        }
        self.pos += 1;

        let word = match tok.lexeme {
            Lexeme::Word(word) => word,
            Lexeme::Open | Lexeme::Close => {
                return Err(ParseError::Unbalanced { offset: tok.offset })
            }
        };
        let mut tree = ComboTree::leaf(word_to_vertex(&word, tok.offset)?);

        if matches!(self.peek(), Some(Token { lexeme: Lexeme::Open, .. })) {
            self.pos += 1;
            loop {
                match self.peek() {
                    Some(Token {
                        lexeme: Lexeme::Close,
                        ..
                    }) => {
                        self.pos += 1;
                        break;
                    }
                    Some(_) => {
                        let child = self.parse_tree(depth + 1)?;
                        tree.push_child(child);
                    }
                    None => return Err(ParseError::Unbalanced { offset: self.end }),
                }
            }
        }
        Ok(tree)
    }
}

/// Parse canonical combo text. `labels` may be empty; otherwise every
/// `$<label>` is resolved to its position first.
pub fn parse_combo(text: &str, labels: &[String]) -> Result<ComboTree, ComboError> {
    let placeholder_text;
    let source = if labels.is_empty() {
        text
    } else {
        placeholder_text = labels_to_placeholders(text, labels)?;
        placeholder_text.as_str()
    };

    let tokens = Lexer::new(source).tokenize()?;
    if tokens.is_empty() {
        return Err(ParseError::Empty.into());
    }

    let mut parser = Parser::new(tokens, source.len());
    let tree = parser.parse_tree(0)?;
    if let Some(tok) = parser.peek() {
        let err = match tok.lexeme {
            Lexeme::Close => ParseError::Unbalanced { offset: tok.offset },
            _ => ParseError::TrailingInput { offset: tok.offset },
        };
        return Err(err.into());
    }

    tree.validate()?;
    tracing::trace!(nodes = tree.size(), "parsed combo tree");
    Ok(tree)
}
