//! Program: struct declarations, function declarations and `main`.
use super::{short::*, Table};
use crate::tokens::{Reserved, Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ProgramTerminal {
    Void,
    Main,
    Begin,
    End,
    Struct,
    EndStruct,
    OpenParen,
    Colon,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Ident,
    Int,
    Other,
}

impl ProgramTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        use ProgramTerminal as P;
        match &token.kind {
            TokenKind::Reserved(word) => match word {
                Reserved::Void      => P::Void,
                Reserved::Main      => P::Main,
                Reserved::Begin     => P::Begin,
                Reserved::End       => P::End,
                Reserved::Struct    => P::Struct,
                Reserved::EndStruct => P::EndStruct,
                _                   => P::Other,
            },
            TokenKind::Symbol(symbol) => match symbol {
                Symbol::LeftParen    => P::OpenParen,
                Symbol::Colon        => P::Colon,
                Symbol::RightParen   => P::CloseParen,
                Symbol::LeftBracket  => P::OpenBracket,
                Symbol::RightBracket => P::CloseBracket,
                _                    => P::Other,
            },
            TokenKind::Ident(_) => P::Ident,
            TokenKind::Int(_)   => P::Int,
            _                   => P::Other,
        }
    }
}

impl From<ProgramTerminal> for usize {
    fn from(terminal: ProgramTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   void main begin end struct endstruct ( : ) [ ] id int other
#[rustfmt::skip]
pub(super) const TABLE: Table<22, 14> = Table {
    next: [
        /*  0 */ [ 1,  2,  2,  2,  3,  2,  2,  2,  2,  2,  2,  2,  2,  2],
        /*  1 */ [ X,  5,  X,  X,  X,  X,  X,  X,  X,  X,  X,  4,  X,  X],
        /*  2 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 13,  X,  X],
        /*  3 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  6,  X,  X],
        /*  4 */ [ X,  X,  X,  X,  X,  X, 15,  X,  X,  X,  X,  X,  X,  X],
        /*  5 */ [ X,  X,  X,  X,  X,  X,  X,  7,  X,  X,  X,  X,  X,  X],
        /*  6 */ [ X,  X,  X,  X,  X,  X,  X,  8,  X,  X,  X,  X,  X,  X],
        /*  7 */ [ 9,  9, 10,  9,  9,  9,  9,  9,  9,  9,  9,  9,  9,  9],
        /*  8 */ [11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11],
        /*  9 */ [ X,  X, 10,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X],
        /* 10 */ [10, 10, 10, 12, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10],
        /* 11 */ [ X,  X,  X,  X,  X,  0,  X,  X,  X,  X,  X,  X,  X,  X],
        /* 12 */ [12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12],
        /* 13 */ [ X,  X,  X,  X,  X,  X, 15,  X,  X, 14,  X,  X,  X,  X],
        /* 14 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 19,  X],
        /* 15 */ [16, 16, 16, 16, 16, 16, 16, 16, 17, 16, 16, 16, 16, 16],
        /* 16 */ [ X,  X,  X,  X,  X,  X,  X,  X, 17,  X,  X,  X,  X,  X],
        /* 17 */ [ X,  X,  X,  X,  X,  X,  X, 18,  X,  X,  X,  X,  X,  X],
        /* 18 */ [20, 20, 21, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20],
        /* 19 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 13,  X,  X,  X],
        /* 20 */ [ X,  X, 21,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X],
        /* 21 */ [21, 21, 21,  0, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21],
    ],
    call: [
        /*  0 */ [NO, TY, TY, TY, NO, TY, TY, TY, TY, TY, TY, NO, TY, TY],
        /*  1 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  2 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  3 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  4 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  5 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  6 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  7 */ [DC, DC, NO, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC],
        /*  8 */ [DC, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC],
        /*  9 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 10 */ [CM, CM, CM, NO, CM, CM, CM, CM, CM, CM, CM, CM, CM, CM],
        /* 11 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 12 */ [FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS],
        /* 13 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 14 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 15 */ [DC, DC, DC, DC, DC, DC, DC, DC, NO, DC, DC, DC, DC, DC],
        /* 16 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 17 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 18 */ [DC, DC, NO, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC, DC],
        /* 19 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 20 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 21 */ [CM, CM, CM, NO, CM, CM, CM, CM, CM, CM, CM, CM, CM, CM],
    ],
};
