//! Type: a single built-in type name.
use super::{short::*, Table};
use crate::tokens::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TypeTerminal {
    Type,
    Other,
}

impl TypeTerminal {
    pub fn classify(token: &Token) -> Self {
        match &token.kind {
            TokenKind::Reserved(word) if word.is_type() => TypeTerminal::Type,
            _ => TypeTerminal::Other,
        }
    }
}

impl From<TypeTerminal> for usize {
    fn from(terminal: TypeTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   type other
#[rustfmt::skip]
pub(super) const TABLE: Table<2, 2> = Table {
    next: [
        /* 0 */ [1, X],
        /* 1 */ [1, 1],
    ],
    call: [
        /* 0 */ [NO, NO],
        /* 1 */ [FS, FS],
    ],
};
