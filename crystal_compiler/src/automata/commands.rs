//! Commands: a single statement.
use super::{short::*, Table};
use crate::tokens::{Reserved, Symbol, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandTerminal {
    If,
    While,
    For,
    Scan,
    Print,
    Return,
    EndWhile,
    EndFor,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Int,
    Ident,
    Other,
}

impl CommandTerminal {
    #[rustfmt::skip]
    pub fn classify(token: &Token) -> Self {
        use CommandTerminal as C;
        match &token.kind {
            TokenKind::Reserved(word) => match word {
                Reserved::If       => C::If,
                Reserved::While    => C::While,
                Reserved::For      => C::For,
                Reserved::Scan     => C::Scan,
                Reserved::Print    => C::Print,
                Reserved::Return   => C::Return,
                Reserved::EndWhile => C::EndWhile,
                Reserved::EndFor   => C::EndFor,
                _                  => C::Other,
            },
            TokenKind::Symbol(symbol) => match symbol {
                Symbol::LeftBracket  => C::OpenBracket,
                Symbol::RightBracket => C::CloseBracket,
                Symbol::LeftParen    => C::OpenParen,
                Symbol::RightParen   => C::CloseParen,
                Symbol::Comma        => C::Comma,
                Symbol::Semicolon    => C::Semicolon,
                Symbol::Colon        => C::Colon,
                Symbol::Dot          => C::Dot,
                _                    => C::Other,
            },
            TokenKind::Int(_)   => C::Int,
            TokenKind::Ident(_) => C::Ident,
            _                   => C::Other,
        }
    }
}

impl From<CommandTerminal> for usize {
    fn from(terminal: CommandTerminal) -> usize {
        terminal as usize
    }
}

// Columns:
//   if while for scan print return endwhile endfor [ ] ( ) , ; : . int id other
#[rustfmt::skip]
pub(super) const TABLE: Table<27, 19> = Table {
    next: [
        /*  0 */ [ 2,  3,  4,  5,  6,  7,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1],
        /*  1 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  8,  X,  X,  X,  X,  X],
        /*  2 */ [ 8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8],
        /*  3 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 10,  X,  X,  X,  X,  X,  X,  X,  X],
        /*  4 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 18,  X,  X,  X,  X,  X,  X,  X,  X],
        /*  5 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 15,  X,  X,  X,  X,  X,  X,  X,  X],
        /*  6 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  9,  X,  X,  X,  X,  X,  X,  X,  X],
        /*  7 */ [ 1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  1,  8,  1,  1,  1,  1,  1],
        /*  8 */ [ 8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8,  8],
        /*  9 */ [11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11, 11],
        /* 10 */ [12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12],
        /* 11 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  1,  X,  X,  X,  X,  X,  X,  X],
        /* 12 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 13,  X,  X,  X,  X,  X,  X,  X],
        /* 13 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 14,  X,  X,  X,  X],
        /* 14 */ [14, 14, 14, 14, 14, 14,  8, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14, 14],
        /* 15 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 16,  X],
        /* 16 */ [ X,  X,  X,  X,  X,  X,  X,  X, 17,  X,  X,  1, 15,  X,  X, 15,  X, 17,  X],
        /* 17 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 23,  X,  X],
        /* 18 */ [19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19, 19],
        /* 19 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 20,  X,  X,  X,  X,  X],
        /* 20 */ [21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21],
        /* 21 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 22,  X,  X,  X,  X,  X],
        /* 22 */ [24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24],
        /* 23 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X, 16,  X,  X,  X,  X,  X,  X,  X,  X,  X],
        /* 24 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 25,  X,  X,  X,  X,  X,  X,  X],
        /* 25 */ [ X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X,  X, 26,  X,  X,  X,  X],
        /* 26 */ [26, 26, 26, 26, 26, 26, 26,  8, 26, 26, 26, 26, 26, 26, 26, 26, 26, 26, 26],
    ],
    call: [
        /*  0 */ [NO, NO, NO, NO, NO, NO, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT],
        /*  1 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  2 */ [IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB, IB],
        /*  3 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  4 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  5 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  6 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /*  7 */ [EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, NO, EX, EX, EX, EX, EX],
        /*  8 */ [FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS, FS],
        /*  9 */ [EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL, EL],
        /* 10 */ [EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX],
        /* 11 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 12 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 13 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 14 */ [CM, CM, CM, CM, CM, CM, NO, CM, CM, CM, CM, CM, CM, CM, CM, CM, CM, CM, CM],
        /* 15 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 16 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 17 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 18 */ [AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT],
        /* 19 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 20 */ [EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX, EX],
        /* 21 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 22 */ [AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT, AT],
        /* 23 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 24 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 25 */ [NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO, NO],
        /* 26 */ [CM, CM, CM, CM, CM, CM, CM, NO, CM, CM, CM, CM, CM, CM, CM, CM, CM, CM, CM],
    ],
};
