//! Expression list: comma separated arguments of calls, `print` and
//! array literals. String literals are taken as list items directly.
use super::{short::*, Table};
use crate::tokens::{Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListTerminal {
    Comma,
    Str,
    Other,
}

impl ListTerminal {
    pub fn classify(token: &Token) -> Self {
        match &token.kind {
            TokenKind::Symbol(Symbol::Comma) => ListTerminal::Comma,
            TokenKind::Str(_) => ListTerminal::Str,
            _ => ListTerminal::Other,
        }
    }
}

impl From<ListTerminal> for usize {
    fn from(terminal: ListTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   , string other
#[rustfmt::skip]
pub(super) const TABLE: Table<2, 3> = Table {
    next: [
        /* 0 */ [1, 1, 1],
        /* 1 */ [0, 1, 1],
    ],
    call: [
        /* 0 */ [EX, NO, EX],
        /* 1 */ [NO, FS, FS],
    ],
};
