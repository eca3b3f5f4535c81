use crate::lex::LexError;
use smol_str::SmolStr;
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[inline]
    pub fn reserved(&self) -> Option<Reserved> {
        match self.kind {
            TokenKind::Reserved(word) => Some(word),
            _ => None,
        }
    }

    #[inline]
    pub fn symbol(&self) -> Option<Symbol> {
        match self.kind {
            TokenKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Name of an identifier token.
    #[inline]
    pub fn ident(&self) -> Option<&SmolStr> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self.kind, TokenKind::EOS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(SmolStr),
    /// Integer literal
    Int(i64),
    /// Floating point literal
    Float(f64),
    /// Character literal, without the quotes.
    Char(char),
    /// String literal, without the quotes and with escapes resolved.
    Str(SmolStr),
    /// Identifier in the set of reserved words.
    Reserved(Reserved),
    /// Punctuation and operator characters.
    Symbol(Symbol),
    /// Lexical error, terminates the token stream.
    Error(LexError),
    /// End-of-source
    EOS,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenKind as T;
        match self {
            T::Ident(name) => write!(f, "{name}"),
            T::Int(value) => write!(f, "{value}"),
            T::Float(value) => write!(f, "{value}"),
            T::Char(c) => write!(f, "'{}'", c.escape_default()),
            T::Str(text) => write!(f, "\"{}\"", text.escape_default()),
            T::Reserved(word) => write!(f, "{word}"),
            T::Symbol(symbol) => write!(f, "{symbol}"),
            T::Error(err) => write!(f, "{err}"),
            T::EOS => write!(f, "end of source"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reserved {
    Void,
    Int,
    Float,
    Boolean,
    Char,
    String,
    Struct,
    EndStruct,
    Begin,
    End,
    If,
    ElsIf,
    Else,
    EndIf,
    While,
    EndWhile,
    For,
    EndFor,
    Return,
    Not,
    True,
    False,
    Main,
    Scan,
    Print,
}

impl Reserved {
    /// Reserved words that name a type.
    #[inline]
    pub fn is_type(self) -> bool {
        use Reserved as R;
        matches!(self, R::Void | R::Int | R::Float | R::Boolean | R::Char | R::String)
    }
}

impl fmt::Display for Reserved {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Reserved as R;
        match self {
            R::Void      => write!(f, "void"),
            R::Int       => write!(f, "int"),
            R::Float     => write!(f, "float"),
            R::Boolean   => write!(f, "boolean"),
            R::Char      => write!(f, "char"),
            R::String    => write!(f, "string"),
            R::Struct    => write!(f, "struct"),
            R::EndStruct => write!(f, "endstruct"),
            R::Begin     => write!(f, "begin"),
            R::End       => write!(f, "end"),
            R::If        => write!(f, "if"),
            R::ElsIf     => write!(f, "elsif"),
            R::Else      => write!(f, "else"),
            R::EndIf     => write!(f, "endif"),
            R::While     => write!(f, "while"),
            R::EndWhile  => write!(f, "endwhile"),
            R::For       => write!(f, "for"),
            R::EndFor    => write!(f, "endfor"),
            R::Return    => write!(f, "return"),
            R::Not       => write!(f, "not"),
            R::True      => write!(f, "true"),
            R::False     => write!(f, "false"),
            R::Main      => write!(f, "main"),
            R::Scan      => write!(f, "scan"),
            R::Print     => write!(f, "print"),
        }
    }
}

impl FromStr for Reserved {
    type Err = ();

    #[rustfmt::skip]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Reserved as R;
        match s {
            "void"      => Ok(R::Void),
            "int"       => Ok(R::Int),
            "float"     => Ok(R::Float),
            "boolean"   => Ok(R::Boolean),
            "char"      => Ok(R::Char),
            "string"    => Ok(R::String),
            "struct"    => Ok(R::Struct),
            "endstruct" => Ok(R::EndStruct),
            "begin"     => Ok(R::Begin),
            "end"       => Ok(R::End),
            "if"        => Ok(R::If),
            "elsif"     => Ok(R::ElsIf),
            "else"      => Ok(R::Else),
            "endif"     => Ok(R::EndIf),
            "while"     => Ok(R::While),
            "endwhile"  => Ok(R::EndWhile),
            "for"       => Ok(R::For),
            "endfor"    => Ok(R::EndFor),
            "return"    => Ok(R::Return),
            "not"       => Ok(R::Not),
            "true"      => Ok(R::True),
            "false"     => Ok(R::False),
            "main"      => Ok(R::Main),
            "scan"      => Ok(R::Scan),
            "print"     => Ok(R::Print),
            _           => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Symbol {
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Semicolon,    // ;
    Colon,        // :
    Comma,        // ,
    Dot,          // .
    Eq,           // =
    Less,         // <
    Greater,      // >
    Bang,         // !
    Amp,          // &
    Pipe,         // |
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
}

impl fmt::Display for Symbol {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Symbol as S;
        let c = match self {
            S::LeftParen    => '(',
            S::RightParen   => ')',
            S::LeftBracket  => '[',
            S::RightBracket => ']',
            S::Semicolon    => ';',
            S::Colon        => ':',
            S::Comma        => ',',
            S::Dot          => '.',
            S::Eq           => '=',
            S::Less         => '<',
            S::Greater      => '>',
            S::Bang         => '!',
            S::Amp          => '&',
            S::Pipe         => '|',
            S::Plus         => '+',
            S::Minus        => '-',
            S::Star         => '*',
            S::Slash        => '/',
            S::Percent      => '%',
        };
        write!(f, "{c}")
    }
}

/// Chunk of source code, encoded as starting and ending positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start position of bytes in source.
    pub start: usize,
    /// End position of bytes in source, exclusive.
    pub end: usize,
    /// Line of the first character, starting at 1.
    pub line: usize,
    /// Column of the first character, starting at 1.
    pub column: usize,
}

impl Span {
    #[inline]
    pub fn fragment<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.start..self.end).unwrap_or_default()
    }

    /// The full line of source code that contains the start of this span,
    /// without the trailing line break.
    pub fn surrounding_line<'a>(&self, text: &'a str) -> &'a str {
        let start = self.start.min(text.len());
        let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line_end = text[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(text.len());

        text[line_start..line_end].trim_end_matches('\r')
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reserved_roundtrip() {
        for word in ["void", "endstruct", "elsif", "endwhile", "print"] {
            let reserved = Reserved::from_str(word).unwrap();
            assert_eq!(reserved.to_string(), word);
        }
        assert!(Reserved::from_str("Int").is_err());
        assert!(Reserved::from_str("x").is_err());
    }

    #[test]
    fn test_reserved_types() {
        assert!(Reserved::Void.is_type());
        assert!(Reserved::String.is_type());
        assert!(!Reserved::Struct.is_type());
        assert!(!Reserved::Main.is_type());
    }

    #[test]
    fn test_surrounding_line() {
        let text = "void main:\r\n  int x\nbegin";
        let span = Span {
            start: 14,
            end: 17,
            line: 2,
            column: 3,
        };
        assert_eq!(span.fragment(text), "int");
        assert_eq!(span.surrounding_line(text), "  int x");

        let last = Span {
            start: 20,
            end: 25,
            line: 3,
            column: 1,
        };
        assert_eq!(last.surrounding_line(text), "begin");
    }
}
