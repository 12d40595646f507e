//! Type system definitions for the AST.
//!
//! The language has exactly four primitive types. Each has a keyword, a
//! one-letter tag used by typed instructions, and a default value that
//! declarations materialise.

use std::fmt::Display;

use crate::lexer::tokens::TokenKind;

/// Represents the primitive types in the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Literals {
    Int,
    Float,
    Bool,
    String,
}

impl Literals {
    /// Maps a type keyword token to its type.
    pub fn from_keyword(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Int => Some(Literals::Int),
            TokenKind::Float => Some(Literals::Float),
            TokenKind::Bool => Some(Literals::Bool),
            TokenKind::StringType => Some(Literals::String),
            _ => None,
        }
    }

    /// The one-letter tag carried by typed instructions.
    pub fn tag(&self) -> &'static str {
        match self {
            Literals::Int => "I",
            Literals::Float => "F",
            Literals::Bool => "B",
            Literals::String => "S",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "I" => Some(Literals::Int),
            "F" => Some(Literals::Float),
            "B" => Some(Literals::Bool),
            "S" => Some(Literals::String),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Literals::Int | Literals::Float)
    }
}

impl Display for Literals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literals::Int => write!(f, "int"),
            Literals::Float => write!(f, "float"),
            Literals::Bool => write!(f, "bool"),
            Literals::String => write!(f, "string"),
        }
    }
}
