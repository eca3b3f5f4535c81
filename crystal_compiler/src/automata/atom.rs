//! Atom: literals, parenthesized expressions and variable references
//! with field and index accessors, or a function call.
use super::{short::*, Table};
use crate::tokens::{Reserved, Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AtomTerminal {
    True,
    False,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Dot,
    Ident,
    Int,
    Float,
    Char,
    Other,
}

impl AtomTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        use AtomTerminal as A;
        match &token.kind {
            TokenKind::Reserved(Reserved::True)  => A::True,
            TokenKind::Reserved(Reserved::False) => A::False,
            TokenKind::Symbol(symbol) => match symbol {
                Symbol::LeftParen    => A::OpenParen,
                Symbol::RightParen   => A::CloseParen,
                Symbol::LeftBracket  => A::OpenBracket,
                Symbol::RightBracket => A::CloseBracket,
                Symbol::Dot          => A::Dot,
                _                    => A::Other,
            },
            TokenKind::Ident(_) => A::Ident,
            TokenKind::Int(_)   => A::Int,
            TokenKind::Float(_) => A::Float,
            TokenKind::Char(_)  => A::Char,
            _                   => A::Other,
        }
    }
}

impl From<AtomTerminal> for usize {
    fn from(terminal: AtomTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   true false ( ) [ ] . id int float char other
#[rustfmt::skip]
pub(super) const TABLE: Table<10, 12> = Table {
    next: [
        /* 0 */ [1, 1, 3, 1, 1, 1, 1, 2, 1, 1, 1, 1],
        /* 1 */ [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        /* 2 */ [2, 2, 7, 2, 5, 2, 6, 2, 2, 2, 2, 2],
        /* 3 */ [4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4],
        /* 4 */ [X, X, X, 1, X, X, X, X, X, X, X, X],
        /* 5 */ [X, X, X, X, X, X, X, X, 8, X, X, X],
        /* 6 */ [X, X, X, X, X, X, X, 9, X, X, X, X],
        /* 7 */ [4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4],
        /* 8 */ [X, X, X, X, X, 9, X, X, X, X, X, X],
        /* 9 */ [9, 9, 9, 9, 5, 9, 6, 9, 9, 9, 9, 9],
    ],
    call: [
        /* 0 */ [NO, NO, NO, EX, EX, EX, EX, NO, NO, NO, NO, EX],
        /* 1 */ [FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS],
        /* 2 */ [FS, FS, NO, FS, NO, FS, NO, FS, FS, FS, FS, FS],
        /* 3 */ [EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX],
        /* 4 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 5 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 6 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 7 */ [EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL],
        /* 8 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 9 */ [FS, FS, FS, FS, NO, FS, NO, FS, FS, FS, FS, FS],
    ],
};
