//! Result and errors.
use crate::{automata::AutomatonId, lex::LexError, symbol::Type};
use log::warn;
use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter};

pub type CompileResult<T> = std::result::Result<T, CompileError>;

#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Syntax(SyntaxError),
    /// Semantic warning promoted to an error by strict mode.
    Semantic(Warning),
    Fmt(fmt::Error),
}

impl Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "lexical error: {}", err),
            Self::Syntax(err) => write!(f, "{}", err),
            Self::Semantic(warning) => write!(f, "semantic error: {}", warning),
            Self::Fmt(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(err) => Some(err),
            Self::Syntax(err) => Some(err),
            Self::Semantic(warning) => Some(&warning.error),
            Self::Fmt(err) => Some(err),
        }
    }
}

impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lex(err)
    }
}

impl From<SyntaxError> for CompileError {
    fn from(err: SyntaxError) -> Self {
        CompileError::Syntax(err)
    }
}

impl From<fmt::Error> for CompileError {
    fn from(err: fmt::Error) -> Self {
        CompileError::Fmt(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// No transition for the token in the current state.
    UnexpectedToken,
    /// Source ended before the program was complete.
    UnexpectedEnd,
    /// Program was complete but more tokens followed.
    TrailingInput,
    /// Calling the automaton would recurse without consuming input.
    NoProgress(AutomatonId),
}

/// Fatal error in the structure of the program.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub automaton: AutomatonId,
    pub state: usize,
    /// Text of the offending token.
    pub token: String,
    pub line: usize,
    pub column: usize,
    /// Source line containing the token.
    pub excerpt: Option<String>,
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error at {}:{}: ", self.line, self.column)?;
        match self.kind {
            SyntaxErrorKind::UnexpectedToken => write!(
                f,
                "unexpected `{}` in {} (state {})",
                self.token, self.automaton, self.state
            )?,
            SyntaxErrorKind::UnexpectedEnd => write!(
                f,
                "unexpected end of source in {} (state {})",
                self.automaton, self.state
            )?,
            SyntaxErrorKind::TrailingInput => write!(f, "unexpected `{}` after end of program", self.token)?,
            SyntaxErrorKind::NoProgress(target) => write!(
                f,
                "`{}` can not start {} in {} (state {})",
                self.token, target, self.automaton, self.state
            )?,
        }

        if let Some(excerpt) = &self.excerpt {
            writeln!(f)?;
            writeln!(f, "    {}", excerpt)?;
            write!(f, "    {:>width$}", "^", width = self.column.max(1))?;
        }

        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Problem in the meaning of the program.
///
/// These do not stop compilation. The offending construct is replaced by
/// a placeholder and the problem is reported as a [`Warning`].
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    UndeclaredIdentifier(SmolStr),
    UndeclaredType(SmolStr),
    UnknownField(SmolStr),
    /// Field access on a value that is not a struct.
    NotAStruct,
    NotAssignable,
    /// Identifier used as a value, but declared as something else.
    NotAValue(SmolStr),
    UnsupportedScan(Type),
    UnsupportedPrint(Type),
    Redeclared(SmolStr),
    MissingOperand,
    UnsupportedFloat(f64),
    TooManyIndices,
    IndexOutOfBounds { index: usize, size: usize },
    /// Declaration whose size or address does not fit a machine word.
    ArrayTooLarge(SmolStr),
}

impl Display for SemanticError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use SemanticError as E;
        match self {
            E::UndeclaredIdentifier(name) => write!(f, "undeclared identifier `{}`", name),
            E::UndeclaredType(name) => write!(f, "undeclared type `{}`", name),
            E::UnknownField(name) => write!(f, "unknown field `{}`", name),
            E::NotAStruct => write!(f, "field access on a value that is not a struct"),
            E::NotAssignable => write!(f, "left side of assignment is not a variable"),
            E::NotAValue(name) => write!(f, "`{}` is not a variable", name),
            E::UnsupportedScan(ty) => write!(f, "can not scan a value of type {}", ty),
            E::UnsupportedPrint(ty) => write!(f, "can not print a value of type {}", ty),
            E::Redeclared(name) => write!(f, "`{}` is already declared in this scope", name),
            E::MissingOperand => write!(f, "operator is missing an operand"),
            E::UnsupportedFloat(value) => write!(f, "floating point literal {} is truncated to an integer", value),
            E::TooManyIndices => write!(f, "too many indices for array"),
            E::IndexOutOfBounds { index, size } => {
                write!(f, "index {} out of bounds for dimension of size {}", index, size)
            }
            E::ArrayTooLarge(name) => write!(f, "`{}` is too large to lay out", name),
        }
    }
}

impl std::error::Error for SemanticError {}

/// Semantic error with the position it was detected at.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub error: SemanticError,
    pub line: usize,
    pub column: usize,
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.error)
    }
}

/// Collects warnings, tagged with the position of the token
/// being processed when they are reported.
#[derive(Debug, Default)]
pub struct Diagnostics {
    line: usize,
    column: usize,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn locate(&mut self, line: usize, column: usize) {
        self.line = line;
        self.column = column;
    }

    pub fn report(&mut self, error: SemanticError) {
        let warning = Warning {
            error,
            line: self.line,
            column: self.column,
        };
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    #[inline]
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_syntax_error_caret() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::UnexpectedToken,
            automaton: AutomatonId::Commands,
            state: 1,
            token: "print".to_string(),
            line: 3,
            column: 5,
            excerpt: Some("x = 1 print(x);".to_string()),
        };
        let text = err.to_string();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("syntax error at 3:5: unexpected `print` in commands (state 1)")
        );
        assert_eq!(lines.next(), Some("    x = 1 print(x);"));
        assert_eq!(lines.next(), Some("        ^"));
    }

    #[test]
    fn test_diagnostics_position() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.locate(2, 7);
        diagnostics.report(SemanticError::UndeclaredIdentifier("y".into()));
        assert_eq!(
            diagnostics.warnings(),
            &[Warning {
                error: SemanticError::UndeclaredIdentifier("y".into()),
                line: 2,
                column: 7,
            }]
        );
        assert_eq!(
            diagnostics.warnings()[0].to_string(),
            "2:7: undeclared identifier `y`"
        );
    }
}
