//! Declarations: comma separated `type name[dim]...` lists.
use super::{short::*, Table};
use crate::tokens::{Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeclTerminal {
    OpenBracket,
    Comma,
    CloseBracket,
    Ident,
    Int,
    Other,
}

impl DeclTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        use DeclTerminal as D;
        match &token.kind {
            TokenKind::Symbol(Symbol::LeftBracket)  => D::OpenBracket,
            TokenKind::Symbol(Symbol::Comma)        => D::Comma,
            TokenKind::Symbol(Symbol::RightBracket) => D::CloseBracket,
            TokenKind::Ident(_)                     => D::Ident,
            TokenKind::Int(_)                       => D::Int,
            _                                       => D::Other,
        }
    }
}

impl From<DeclTerminal> for usize {
    fn from(terminal: DeclTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   [ , ] id int other
#[rustfmt::skip]
pub(super) const TABLE: Table<5, 6> = Table {
    next: [
        /* 0 */ [1, 1, 1, 1, 1, 1],
        /* 1 */ [X, X, X, 2, X, X],
        /* 2 */ [3, 0, 2, 2, 2, 2],
        /* 3 */ [X, X, X, X, 4, X],
        /* 4 */ [X, X, 2, X, X, X],
    ],
    call: [
        /* 0 */ [TY, TY, TY, NO, TY, TY],
        /* 1 */ [NO, NO, NO, NO, NO, NO],
        /* 2 */ [NO, NO, FS, FS, FS, FS],
        /* 3 */ [NO, NO, NO, NO, NO, NO],
        /* 4 */ [NO, NO, NO, NO, NO, NO],
    ],
};
