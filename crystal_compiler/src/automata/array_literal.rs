//! Array literal: bracketed, possibly nested, lists of expressions.
use super::{short::*, Table};
use crate::tokens::{Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ArrayTerminal {
    OpenBracket,
    CloseBracket,
    Comma,
    Other,
}

impl ArrayTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        match &token.kind {
            TokenKind::Symbol(Symbol::LeftBracket)  => ArrayTerminal::OpenBracket,
            TokenKind::Symbol(Symbol::RightBracket) => ArrayTerminal::CloseBracket,
            TokenKind::Symbol(Symbol::Comma)        => ArrayTerminal::Comma,
            _                                       => ArrayTerminal::Other,
        }
    }
}

impl From<ArrayTerminal> for usize {
    fn from(terminal: ArrayTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   [ ] , other
#[rustfmt::skip]
pub(super) const TABLE: Table<6, 4> = Table {
    next: [
        /* 0 */ [2, 1, 1, 1],
        /* 1 */ [1, 1, 1, 1],
        /* 2 */ [3, 3, 3, 3],
        /* 3 */ [X, 4, X, X],
        /* 4 */ [4, 4, 5, 4],
        /* 5 */ [2, X, X, X],
    ],
    call: [
        /* 0 */ [NO, EL, EL, EL],
        /* 1 */ [FS, FS, FS, FS],
        /* 2 */ [AL, AL, AL, AL],
        /* 3 */ [NO, NO, NO, NO],
        /* 4 */ [FS, FS, NO, FS],
        /* 5 */ [NO, NO, NO, NO],
    ],
};
