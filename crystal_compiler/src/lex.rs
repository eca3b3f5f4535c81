//! Lexical analysis (tokenizer)
use crate::tokens::{Reserved, Span, Symbol, Token, TokenKind};

use itertools::{multipeek, MultiPeek};
use smol_str::SmolStr;
use std::{
    error, fmt,
    iter::Iterator,
    str::{CharIndices, FromStr},
};

/// Print every token of the source, one per line.
pub fn debug_print_lexer(lexer: Lexer) {
    let source = lexer.source.original;
    println!("Source Byte Count: {}", source.len());
    println!("line:col  | token");

    for result in lexer {
        match result {
            Ok(token) => {
                println!(
                    "{:4}:{:<4} | {:?}",
                    token.span.line, token.span.column, token.kind
                );
                if token.is_end() {
                    break;
                }
            }
            Err(err) => {
                println!("{err}");
                break;
            }
        }
    }
}

/// Lexical analyzer.
pub struct Lexer<'a> {
    pub(crate) source: SourceText<'a>,
    token_start: SourcePos,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self {
            source: SourceText::new(source_code),
            token_start: SourcePos {
                position: 0,
                line: 1,
                column: 1,
            },
        }
    }

    #[inline]
    pub fn source_code(&self) -> &'a str {
        self.source.original
    }

    #[rustfmt::skip]
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        use Symbol as S;
        use TokenKind as T;

        while let Some((_, next_char)) = self.source.next_char() {
            self.start_token();

            match next_char {
                '('  => return Ok(self.make_token(T::Symbol(S::LeftParen))),
                ')'  => return Ok(self.make_token(T::Symbol(S::RightParen))),
                '['  => return Ok(self.make_token(T::Symbol(S::LeftBracket))),
                ']'  => return Ok(self.make_token(T::Symbol(S::RightBracket))),
                ';'  => return Ok(self.make_token(T::Symbol(S::Semicolon))),
                ':'  => return Ok(self.make_token(T::Symbol(S::Colon))),
                ','  => return Ok(self.make_token(T::Symbol(S::Comma))),
                '.'  => return Ok(self.make_token(T::Symbol(S::Dot))),
                '='  => return Ok(self.make_token(T::Symbol(S::Eq))),
                '<'  => return Ok(self.make_token(T::Symbol(S::Less))),
                '>'  => return Ok(self.make_token(T::Symbol(S::Greater))),
                '!'  => return Ok(self.make_token(T::Symbol(S::Bang))),
                '&'  => return Ok(self.make_token(T::Symbol(S::Amp))),
                '|'  => return Ok(self.make_token(T::Symbol(S::Pipe))),
                '+'  => return Ok(self.make_token(T::Symbol(S::Plus))),
                '-'  => return Ok(self.make_token(T::Symbol(S::Minus))),
                '*'  => return Ok(self.make_token(T::Symbol(S::Star))),
                '%'  => return Ok(self.make_token(T::Symbol(S::Percent))),
                '/'  => {
                    match self.source.peek_char() {
                        Some((_, '/')) => {
                            self.source.next_char();
                            self.consume_line_comment();
                        }
                        Some((_, '*')) => {
                            self.source.next_char();
                            self.consume_block_comment()?;
                        }
                        _ => {
                            self.source.reset_peek();
                            return Ok(self.make_token(T::Symbol(S::Slash)));
                        }
                    }
                }
                ' ' | '\t'
                    | '\r' | '\n' => self.consume_whitespace(),
                '\''              => return self.consume_char(),
                '"'               => return self.consume_string(),
                '0'..='9'         => return self.consume_number(),
                'a'..='z'
                    | 'A'..='Z'   => return Ok(self.consume_ident()),
                _                 => return Err(LexError::InvalidCharacter {
                    character: next_char,
                    line: self.token_start.line,
                    column: self.token_start.column,
                }),
            }
        }

        // Give end-of-source its own character position.
        self.start_token();
        Ok(self.make_token(T::EOS))
    }

    /// Prime the lexer state for recording a new token.
    fn start_token(&mut self) {
        self.token_start = SourcePos {
            position: self.source.current.0,
            column: self.source.current_column,
            line: self.source.current_line,
        };
    }

    fn make_token(&mut self, token_kind: TokenKind) -> Token {
        let (position, c) = self.source.current;
        let end = if self.source.at_end() {
            position
        } else {
            position + c.len_utf8()
        };

        let span = Span {
            start: self.token_start.position,
            end,
            line: self.token_start.line,
            column: self.token_start.column,
        };

        Token::new(token_kind, span)
    }

    fn consume_whitespace(&mut self) {
        self.source.reset_peek();

        while let Some((_, ' ' | '\t' | '\r' | '\n')) = self.source.peek_char() {
            self.source.next_char();
        }
    }

    fn consume_line_comment(&mut self) {
        self.source.reset_peek();

        while let Some((_, c)) = self.source.peek_char() {
            if c == '\n' {
                break;
            }
            self.source.next_char();
        }
    }

    fn consume_block_comment(&mut self) -> Result<(), LexError> {
        loop {
            match self.source.next_char() {
                Some((_, '*')) => {
                    if let Some((_, '/')) = self.source.peek_char() {
                        self.source.next_char();
                        return Ok(());
                    }
                    self.source.reset_peek();
                }
                Some(_) => {}
                None => {
                    return Err(LexError::UnterminatedComment {
                        line: self.token_start.line,
                        column: self.token_start.column,
                    })
                }
            }
        }
    }

    fn consume_number(&mut self) -> Result<Token, LexError> {
        self.source.reset_peek();

        while let Some((_, '0'..='9')) = self.source.peek_char() {
            self.source.next_char();
        }

        // A dot only continues the literal when a digit follows it,
        // otherwise it belongs to the next token.
        self.source.reset_peek();
        let is_float = matches!(self.source.peek_char2(), (Some('.'), Some('0'..='9')));
        self.source.reset_peek();

        if is_float {
            self.source.next_char();
            while let Some((_, '0'..='9')) = self.source.peek_char() {
                self.source.next_char();
            }

            let value = f64::from_str(self.token_fragment()).map_err(|_| self.overflow())?;
            return Ok(self.make_token(TokenKind::Float(value)));
        }

        let value = i64::from_str(self.token_fragment()).map_err(|_| self.overflow())?;
        Ok(self.make_token(TokenKind::Int(value)))
    }

    fn consume_ident(&mut self) -> Token {
        self.source.reset_peek();

        while let Some((_, 'a'..='z' | 'A'..='Z' | '0'..='9')) = self.source.peek_char() {
            self.source.next_char();
        }

        // If a valid keyword can be parsed from the source fragment, then
        // the token is a reserved word instead of a user defined identifier.
        let fragment = self.token_fragment();
        let token_kind = Reserved::from_str(fragment)
            .map(TokenKind::Reserved)
            .unwrap_or_else(|_| TokenKind::Ident(SmolStr::new(fragment)));
        self.make_token(token_kind)
    }

    fn consume_char(&mut self) -> Result<Token, LexError> {
        let unterminated = LexError::UnterminatedChar {
            line: self.token_start.line,
            column: self.token_start.column,
        };

        let value = match self.source.next_char() {
            Some((_, '\\')) => match self.source.next_char() {
                Some((_, c)) => unescape(c),
                None => return Err(unterminated),
            },
            Some((_, '\'')) | Some((_, '\n')) | None => return Err(unterminated),
            Some((_, c)) => c,
        };

        match self.source.next_char() {
            Some((_, '\'')) => Ok(self.make_token(TokenKind::Char(value))),
            _ => Err(unterminated),
        }
    }

    fn consume_string(&mut self) -> Result<Token, LexError> {
        let mut text = String::new();

        loop {
            match self.source.next_char() {
                Some((_, '"')) => return Ok(self.make_token(TokenKind::Str(SmolStr::new(text)))),
                Some((_, '\\')) => match self.source.next_char() {
                    Some((_, c)) => text.push(unescape(c)),
                    None => break,
                },
                Some((_, '\n')) | None => break,
                Some((_, c)) => text.push(c),
            }
        }

        Err(LexError::UnterminatedString {
            line: self.token_start.line,
            column: self.token_start.column,
        })
    }

    fn overflow(&self) -> LexError {
        LexError::NumberOverflow {
            line: self.token_start.line,
            column: self.token_start.column,
        }
    }

    fn token_fragment(&self) -> &'a str {
        let (position, c) = self.source.current;
        &self.source.original[self.token_start.position..position + c.len_utf8()]
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        '0' => '\0',
        other => other,
    }
}

/// Implement `Lexer` as an interator for consuming
/// tokens lazily.
impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_token())
    }
}

/// Wrapper for source code that keeps a cursor position.
///
/// Allows forward lookup via peeking.
pub(crate) struct SourceText<'a> {
    /// Keep reference to the source so tokens can
    /// be sliced from it.
    pub(crate) original: &'a str,

    /// Iterator over UTF-8 encoded source code.
    ///
    /// Peeking advances the internal peek cursor by 1, so each call returns
    /// the next element. The peek cursor offset is restored to 0 when calling
    /// `MultiPeek::next()` or `MultiPeek::reset_peek()`.
    source: MultiPeek<CharIndices<'a>>,

    /// Byte position in the source string of the current character.
    current: (usize, char),
    current_line: usize,
    current_column: usize,
}

impl<'a> SourceText<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            original: source,
            source: multipeek(source.char_indices()),
            current: (0, '\0'),
            current_line: 1,
            current_column: 0,
        }
    }

    /// Advance the cursor and return the next position and character.
    ///
    /// Line and column describe the returned character.
    fn next_char(&mut self) -> Option<(usize, char)> {
        if let Some((index, c)) = self.source.next() {
            if self.current.1 == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
            self.current = (index, c);
            Some((index, c))
        } else {
            // There is no end-of-file character, so the
            // null-byte stands in at the end of the string.
            if !self.at_end() {
                if self.current.1 == '\n' {
                    self.current_line += 1;
                    self.current_column = 1;
                } else {
                    self.current_column += 1;
                }
            }
            self.current = (self.original.len(), '\0');
            None
        }
    }

    /// Peeks the next character in the stream.
    ///
    /// This call advances the peek cursor. Subsequent
    /// calls will look ahead by one character each call.
    fn peek_char(&mut self) -> Option<(usize, char)> {
        self.source.peek().cloned()
    }

    /// Two character lookahead.
    fn peek_char2(&mut self) -> (Option<char>, Option<char>) {
        (
            self.source.peek().map(|(_, c)| c).cloned(),
            self.source.peek().map(|(_, c)| c).cloned(),
        )
    }

    /// Reset the stream peek cursor.
    fn reset_peek(&mut self) {
        self.source.reset_peek()
    }

    /// Indicates if the cursor is at the end of the source.
    fn at_end(&self) -> bool {
        self.current.0 >= self.original.len() && self.current.1 == '\0'
    }
}

#[derive(Debug, Default)]
struct SourcePos {
    position: usize,
    column: usize,
    line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    InvalidCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    UnterminatedString {
        line: usize,
        column: usize,
    },
    UnterminatedChar {
        line: usize,
        column: usize,
    },
    UnterminatedComment {
        line: usize,
        column: usize,
    },
    NumberOverflow {
        line: usize,
        column: usize,
    },
}

impl LexError {
    /// Line and column where the offending token starts.
    pub fn position(&self) -> (usize, usize) {
        use LexError as E;
        match *self {
            E::InvalidCharacter { line, column, .. }
            | E::UnterminatedString { line, column }
            | E::UnterminatedChar { line, column }
            | E::UnterminatedComment { line, column }
            | E::NumberOverflow { line, column } => (line, column),
        }
    }
}

impl error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use LexError as E;
        let (line, column) = self.position();
        match self {
            E::InvalidCharacter { character, .. } => write!(
                f,
                "use of invalid character '{}' at line {line}, column {column}",
                character.escape_default()
            ),
            E::UnterminatedString { .. } => {
                write!(f, "unterminated string literal at line {line}, column {column}")
            }
            E::UnterminatedChar { .. } => {
                write!(f, "malformed character literal at line {line}, column {column}")
            }
            E::UnterminatedComment { .. } => {
                write!(f, "unterminated comment at line {line}, column {column}")
            }
            E::NumberOverflow { .. } => {
                write!(f, "number literal out of range at line {line}, column {column}")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut kinds = vec![];
        loop {
            let token = lexer.next_token().unwrap();
            if token.is_end() {
                break;
            }
            kinds.push(token.kind);
        }
        kinds
    }

    #[test]
    fn test_reserved_and_idents() {
        use TokenKind as T;
        assert_eq!(
            kinds("void main: int x2 begin end"),
            vec![
                T::Reserved(Reserved::Void),
                T::Reserved(Reserved::Main),
                T::Symbol(Symbol::Colon),
                T::Reserved(Reserved::Int),
                T::Ident(SmolStr::new("x2")),
                T::Reserved(Reserved::Begin),
                T::Reserved(Reserved::End),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        use TokenKind as T;
        assert_eq!(
            kinds("42 3.25 p.x 7."),
            vec![
                T::Int(42),
                T::Float(3.25),
                T::Ident(SmolStr::new("p")),
                T::Symbol(Symbol::Dot),
                T::Ident(SmolStr::new("x")),
                T::Int(7),
                T::Symbol(Symbol::Dot),
            ]
        );
    }

    #[test]
    fn test_literals_and_comments() {
        use TokenKind as T;
        assert_eq!(
            kinds("// line\n'a' /* block\n comment */ \"hi\\n\" '\\n'"),
            vec![
                T::Char('a'),
                T::Str(SmolStr::new("hi\n")),
                T::Char('\n'),
            ]
        );
    }

    #[test]
    fn test_compound_operators_are_single_chars() {
        use Symbol as S;
        use TokenKind as T;
        assert_eq!(
            kinds("a<=b&&c"),
            vec![
                T::Ident(SmolStr::new("a")),
                T::Symbol(S::Less),
                T::Symbol(S::Eq),
                T::Ident(SmolStr::new("b")),
                T::Symbol(S::Amp),
                T::Symbol(S::Amp),
                T::Ident(SmolStr::new("c")),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("void\n  main");
        let void = lexer.next_token().unwrap();
        assert_eq!((void.span.line, void.span.column), (1, 1));
        assert_eq!((void.span.start, void.span.end), (0, 4));

        let main = lexer.next_token().unwrap();
        assert_eq!((main.span.line, main.span.column), (2, 3));
        assert_eq!(main.span.fragment(lexer.source_code()), "main");

        let end = lexer.next_token().unwrap();
        assert!(end.is_end());
    }

    #[test]
    fn test_errors() {
        let mut lexer = Lexer::new("x = 1 $");
        for _ in 0..3 {
            lexer.next_token().unwrap();
        }
        assert_eq!(
            lexer.next_token(),
            Err(LexError::InvalidCharacter {
                character: '$',
                line: 1,
                column: 7
            })
        );

        assert!(matches!(
            Lexer::new("\"open").next_token(),
            Err(LexError::UnterminatedString { line: 1, column: 1 })
        ));
        assert!(matches!(
            Lexer::new("/* open").next_token(),
            Err(LexError::UnterminatedComment { .. })
        ));
        assert!(matches!(
            Lexer::new("x_y").nth(1),
            Some(Err(LexError::InvalidCharacter { character: '_', .. }))
        ));
    }
}
