//! Sub-automata of the pushdown recognizer.
//!
//! Each grammar fragment is recognized by a small finite automaton with a
//! transition table and a parallel call table. A call cell hands control to
//! another sub-automaton without consuming the token, and a final cell
//! returns to the caller. The driver in [`crate::driver`] composes them.
mod array_literal;
mod atom;
mod attribution;
mod commands;
mod declarations;
mod expression;
mod expression_list;
mod if_body;
mod program;
mod types;

pub use self::{
    array_literal::ArrayTerminal, atom::AtomTerminal, attribution::AttrTerminal,
    commands::CommandTerminal, declarations::DeclTerminal, expression::ExprTerminal,
    expression_list::ListTerminal, if_body::IfTerminal, program::ProgramTerminal,
    types::TypeTerminal,
};

use crate::tokens::Token;
use std::fmt;

/// Marker in a transition table for a cell without a legal transition.
pub const INVALID: i8 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum AutomatonId {
    Program,
    Declarations,
    Commands,
    Attribution,
    ArrayLiteral,
    IfBody,
    ExpressionList,
    Expression,
    Atom,
    Type,
}

impl AutomatonId {
    pub const ALL: [AutomatonId; 10] = [
        AutomatonId::Program,
        AutomatonId::Declarations,
        AutomatonId::Commands,
        AutomatonId::Attribution,
        AutomatonId::ArrayLiteral,
        AutomatonId::IfBody,
        AutomatonId::ExpressionList,
        AutomatonId::Expression,
        AutomatonId::Atom,
        AutomatonId::Type,
    ];

    /// Single bit identifying this automaton in a set.
    #[inline]
    pub fn bit(self) -> u16 {
        1 << self as u8
    }

    /// Table dimensions as `(states, terminal classes)`.
    pub fn shape(self) -> (usize, usize) {
        use AutomatonId as A;
        match self {
            A::Program => program::TABLE.shape(),
            A::Declarations => declarations::TABLE.shape(),
            A::Commands => commands::TABLE.shape(),
            A::Attribution => attribution::TABLE.shape(),
            A::ArrayLiteral => array_literal::TABLE.shape(),
            A::IfBody => if_body::TABLE.shape(),
            A::ExpressionList => expression_list::TABLE.shape(),
            A::Expression => expression::TABLE.shape(),
            A::Atom => atom::TABLE.shape(),
            A::Type => types::TABLE.shape(),
        }
    }

    /// Raw cell access by column index, for table inspection.
    ///
    /// Returns `None` when the coordinates are outside the table.
    pub fn raw_cell(self, state: usize, column: usize) -> Option<(i8, Directive)> {
        use AutomatonId as A;
        match self {
            A::Program => program::TABLE.raw(state, column),
            A::Declarations => declarations::TABLE.raw(state, column),
            A::Commands => commands::TABLE.raw(state, column),
            A::Attribution => attribution::TABLE.raw(state, column),
            A::ArrayLiteral => array_literal::TABLE.raw(state, column),
            A::IfBody => if_body::TABLE.raw(state, column),
            A::ExpressionList => expression_list::TABLE.raw(state, column),
            A::Expression => expression::TABLE.raw(state, column),
            A::Atom => atom::TABLE.raw(state, column),
            A::Type => types::TABLE.raw(state, column),
        }
    }

    /// Classify the token for this automaton and look up the cell
    /// for the given state.
    #[rustfmt::skip]
    pub fn step(self, state: usize, token: &Token) -> Step {
        use AutomatonId as A;
        match self {
            A::Program        => Step::lookup(&program::TABLE, state, ProgramTerminal::classify(token), Terminal::Program),
            A::Declarations   => Step::lookup(&declarations::TABLE, state, DeclTerminal::classify(token), Terminal::Declarations),
            A::Commands       => Step::lookup(&commands::TABLE, state, CommandTerminal::classify(token), Terminal::Commands),
            A::Attribution    => Step::lookup(&attribution::TABLE, state, AttrTerminal::classify(token), Terminal::Attribution),
            A::ArrayLiteral   => Step::lookup(&array_literal::TABLE, state, ArrayTerminal::classify(token), Terminal::ArrayLiteral),
            A::IfBody         => Step::lookup(&if_body::TABLE, state, IfTerminal::classify(token), Terminal::IfBody),
            A::ExpressionList => Step::lookup(&expression_list::TABLE, state, ListTerminal::classify(token), Terminal::ExpressionList),
            A::Expression     => Step::lookup(&expression::TABLE, state, ExprTerminal::classify(token), Terminal::Expression),
            A::Atom           => Step::lookup(&atom::TABLE, state, AtomTerminal::classify(token), Terminal::Atom),
            A::Type           => Step::lookup(&types::TABLE, state, TypeTerminal::classify(token), Terminal::Type),
        }
    }
}

impl fmt::Display for AutomatonId {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AutomatonId as A;
        match self {
            A::Program        => write!(f, "program"),
            A::Declarations   => write!(f, "declarations"),
            A::Commands       => write!(f, "commands"),
            A::Attribution    => write!(f, "attribution"),
            A::ArrayLiteral   => write!(f, "array literal"),
            A::IfBody         => write!(f, "if body"),
            A::ExpressionList => write!(f, "expression list"),
            A::Expression     => write!(f, "expression"),
            A::Atom           => write!(f, "atom"),
            A::Type           => write!(f, "type"),
        }
    }
}

/// What the driver does with the current token after a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Run the semantic action and consume the token.
    None,
    /// Invoke another sub-automaton, leaving the token in place.
    Call(AutomatonId),
    /// Return to the calling sub-automaton.
    Final,
}

/// A legal table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// State to move to, or the resume state of a call.
    pub next: usize,
    pub directive: Directive,
}

/// Terminal class of a token, tagged with the automaton that classified it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Program(ProgramTerminal),
    Declarations(DeclTerminal),
    Commands(CommandTerminal),
    Attribution(AttrTerminal),
    ArrayLiteral(ArrayTerminal),
    IfBody(IfTerminal),
    ExpressionList(ListTerminal),
    Expression(ExprTerminal),
    Atom(AtomTerminal),
    Type(TypeTerminal),
}

/// Result of a table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub terminal: Terminal,
    /// `None` when the table holds no transition for the terminal.
    pub cell: Option<Cell>,
}

impl Step {
    fn lookup<T, const S: usize, const N: usize>(
        table: &Table<S, N>,
        state: usize,
        terminal: T,
        wrap: fn(T) -> Terminal,
    ) -> Self
    where
        T: Copy + Into<usize>,
    {
        Step {
            cell: table.cell(state, terminal.into()),
            terminal: wrap(terminal),
        }
    }
}

/// Transition and call tables of one sub-automaton.
///
/// Rows are states, columns are terminal classes.
pub(crate) struct Table<const S: usize, const N: usize> {
    pub(crate) next: [[i8; N]; S],
    pub(crate) call: [[Directive; N]; S],
}

impl<const S: usize, const N: usize> Table<S, N> {
    #[inline]
    fn shape(&self) -> (usize, usize) {
        (S, N)
    }

    #[inline]
    fn raw(&self, state: usize, column: usize) -> Option<(i8, Directive)> {
        let next = *self.next.get(state)?.get(column)?;
        let call = *self.call.get(state)?.get(column)?;
        Some((next, call))
    }

    fn cell(&self, state: usize, column: usize) -> Option<Cell> {
        match self.raw(state, column)? {
            (INVALID, _) => None,
            (next, directive) => Some(Cell {
                next: next as usize,
                directive,
            }),
        }
    }
}

/// Short cell names used by the table literals.
mod short {
    use super::{AutomatonId as A, Directive};

    pub const NO: Directive = Directive::None;
    pub const FS: Directive = Directive::Final;
    pub const DC: Directive = Directive::Call(A::Declarations);
    pub const CM: Directive = Directive::Call(A::Commands);
    pub const AT: Directive = Directive::Call(A::Attribution);
    pub const AL: Directive = Directive::Call(A::ArrayLiteral);
    pub const IB: Directive = Directive::Call(A::IfBody);
    pub const EL: Directive = Directive::Call(A::ExpressionList);
    pub const EX: Directive = Directive::Call(A::Expression);
    pub const AO: Directive = Directive::Call(A::Atom);
    pub const TY: Directive = Directive::Call(A::Type);

    pub const X: i8 = super::INVALID;
}
