//! If body: condition, then-block and the optional `elsif` and `else`
//! arms, up to `endif`.
use super::{short::*, Table};
use crate::tokens::{Reserved, Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IfTerminal {
    Else,
    ElsIf,
    EndIf,
    OpenParen,
    CloseParen,
    Colon,
    Other,
}

impl IfTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        use IfTerminal as I;
        match &token.kind {
            TokenKind::Reserved(Reserved::Else)   => I::Else,
            TokenKind::Reserved(Reserved::ElsIf)  => I::ElsIf,
            TokenKind::Reserved(Reserved::EndIf)  => I::EndIf,
            TokenKind::Symbol(Symbol::LeftParen)  => I::OpenParen,
            TokenKind::Symbol(Symbol::RightParen) => I::CloseParen,
            TokenKind::Symbol(Symbol::Colon)      => I::Colon,
            _                                     => I::Other,
        }
    }
}

impl From<IfTerminal> for usize {
    fn from(terminal: IfTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   else elsif endif ( ) : other
#[rustfmt::skip]
pub(super) const TABLE: Table<9, 7> = Table {
    next: [
        /* 0 */ [X, X, X, 1, X, X, X],
        /* 1 */ [2, 2, 2, 2, 2, 2, 2],
        /* 2 */ [X, X, X, X, 3, X, X],
        /* 3 */ [X, X, X, X, X, 4, X],
        /* 4 */ [5, 7, 6, 4, 4, 4, 4],
        /* 5 */ [X, X, X, X, X, 8, X],
        /* 6 */ [6, 6, 6, 6, 6, 6, 6],
        /* 7 */ [6, 6, 6, 6, 6, 6, 6],
        /* 8 */ [8, 8, 6, 8, 8, 8, 8],
    ],
    call: [
        /* 0 */ [NO, NO, NO, NO, NO, NO, NO],
        /* 1 */ [EX, EX, EX, EX, EX, EX, EX],
        /* 2 */ [NO, NO, NO, NO, NO, NO, NO],
        /* 3 */ [NO, NO, NO, NO, NO, NO, NO],
        /* 4 */ [NO, NO, NO, CM, CM, CM, CM],
        /* 5 */ [NO, NO, NO, NO, NO, NO, NO],
        /* 6 */ [FS, FS, FS, FS, FS, FS, FS],
        /* 7 */ [IB, IB, IB, IB, IB, IB, IB],
        /* 8 */ [CM, CM, NO, CM, CM, CM, CM],
    ],
};
