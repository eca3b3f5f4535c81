//! Attribution: assignment to a variable, field or element, or a call
//! statement.
use super::{short::*, Table};
use crate::tokens::{Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AttrTerminal {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Eq,
    Dot,
    Ident,
    Int,
    Str,
    Other,
}

impl AttrTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        use AttrTerminal as A;
        match &token.kind {
            TokenKind::Symbol(symbol) => match symbol {
                Symbol::LeftParen    => A::OpenParen,
                Symbol::RightParen   => A::CloseParen,
                Symbol::LeftBracket  => A::OpenBracket,
                Symbol::RightBracket => A::CloseBracket,
                Symbol::Eq           => A::Eq,
                Symbol::Dot          => A::Dot,
                _                    => A::Other,
            },
            TokenKind::Ident(_) => A::Ident,
            TokenKind::Int(_)   => A::Int,
            TokenKind::Str(_)   => A::Str,
            _                   => A::Other,
        }
    }
}

impl From<AttrTerminal> for usize {
    fn from(terminal: AttrTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   ( ) [ ] = . id int string other
#[rustfmt::skip]
pub(super) const TABLE: Table<12, 10> = Table {
    next: [
        /*  0 */ [ X,  X,  X,  X,  X,  X,  1,  X,  X,  X],
        /*  1 */ [ 5,  X,  2,  X,  4,  3,  X,  X,  X,  X],
        /*  2 */ [ X,  X,  X,  X,  X,  X,  X,  6,  X,  X],
        /*  3 */ [ X,  X,  X,  X,  X,  X,  8,  X,  X,  X],
        /*  4 */ [ 9,  9, 10,  9,  9,  9,  9,  9,  9,  9],
        /*  5 */ [ 7,  7,  7,  7,  7,  7,  7,  7,  7,  7],
        /*  6 */ [ X,  X,  X,  8,  X,  X,  X,  X,  X,  X],
        /*  7 */ [ X,  9,  X,  X,  X,  X,  X,  X,  X,  X],
        /*  8 */ [ X,  X,  2,  X,  4,  3,  X,  X,  X,  X],
        /*  9 */ [ 9,  9,  9,  9,  9,  9,  9,  9,  9,  9],
        /* 10 */ [11, 11, 11, 11, 11, 11, 11, 11, 11, 11],
        /* 11 */ [ X,  X,  X,  9,  X,  X,  X,  X,  X,  X],
    ],
    call: [
        /*  0 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  1 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  2 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  3 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  4 */ [EX, EX, NO, EX, EX, EX, EX, EX, NO, EX],
        /*  5 */ [EL, EL, EL, EL, EL, EL, EL, EL, EL, EL],
        /*  6 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  7 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  8 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  9 */ [FS, FS, FS, FS, FS, FS, FS, FS, FS, FS],
        /* 10 */ [AL, AL, AL, AL, AL, AL, AL, AL, AL, AL],
        /* 11 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
    ],
};
