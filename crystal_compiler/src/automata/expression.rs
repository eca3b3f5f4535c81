//! Expression: atoms joined by unary and binary operators.
//!
//! Two character operators (`==`, `!=`, `<=`, `>=`, `&&`, `||`) are
//! recognized here one character at a time.
use super::{short::*, Table};
use crate::tokens::{Reserved, Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExprTerminal {
    Not,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Eq,
    Amp,
    Pipe,
    Greater,
    Less,
    Other,
}

impl ExprTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        use ExprTerminal as E;
        match &token.kind {
            TokenKind::Reserved(Reserved::Not) => E::Not,
            TokenKind::Symbol(symbol) => match symbol {
                Symbol::Plus    => E::Plus,
                Symbol::Minus   => E::Minus,
                Symbol::Star    => E::Star,
                Symbol::Slash   => E::Slash,
                Symbol::Percent => E::Percent,
                Symbol::Bang    => E::Bang,
                Symbol::Eq      => E::Eq,
                Symbol::Amp     => E::Amp,
                Symbol::Pipe    => E::Pipe,
                Symbol::Greater => E::Greater,
                Symbol::Less    => E::Less,
                _               => E::Other,
            },
            _ => E::Other,
        }
    }
}

impl From<ExprTerminal> for usize {
    fn from(terminal: ExprTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   not + - * / % ! = & | > < other
#[rustfmt::skip]
pub(super) const TABLE: Table<8, 13> = Table {
    next: [
        /* 0 */ [2, 1, 2, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        /* 1 */ [X, 2, 2, 2, 2, 2, 5, 5, 3, 4, 6, 6, 1],
        /* 2 */ [7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7],
        /* 3 */ [X, X, X, X, X, X, X, X, 2, X, X, X, X],
        /* 4 */ [X, X, X, X, X, X, X, X, X, 2, X, X, X],
        /* 5 */ [X, X, X, X, X, X, X, 2, X, X, X, X, X],
        /* 6 */ [7, 7, 7, 7, 7, 7, 7, 2, 7, 7, 7, 7, 7],
        /* 7 */ [7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7],
    ],
    call: [
        /* 0 */ [NO, AO, NO, AO, AO, AO, AO, AO, AO, AO, AO, AO, AO],
        /* 1 */ [FS, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, FS],
        /* 2 */ [EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX],
        /* 3 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 4 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 5 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 6 */ [EX, EX, EX, EX, EX, EX, EX, NO, EX, EX, EX, EX, EX],
        /* 7 */ [FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS],
    ],
};
