//! Pull based stream of tokens consumed by the compiler driver.
use crate::{
    lex::Lexer,
    tokens::{Span, Token, TokenKind},
};

/// Source of tokens, pulled one at a time.
///
/// The stream is terminated by either an end-of-source token
/// or an error token. Pulling past the terminator keeps
/// returning end-of-source.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;

    /// Original text the tokens were lexed from, if available.
    ///
    /// Used to quote the offending line in diagnostics.
    fn source_text(&self) -> Option<&str> {
        None
    }
}

/// Adapts the lexer to the token source contract.
///
/// Lexical errors are turned into error tokens, and the
/// stream is fused after the first terminator.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    /// Keep reference to the source so diagnostics can
    /// slice fragments from it.
    source: &'a str,
    done: Option<Span>,
}

impl<'a> TokenStream<'a> {
    #[inline]
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            source: lexer.source_code(),
            lexer,
            done: None,
        }
    }

    #[inline]
    pub fn fragment_span(&self, span: &Span) -> &'a str {
        span.fragment(self.source)
    }
}

impl<'a> TokenSource for TokenStream<'a> {
    fn next_token(&mut self) -> Token {
        if let Some(span) = self.done {
            return Token::new(TokenKind::EOS, span);
        }

        let token = match self.lexer.next_token() {
            Ok(token) => token,
            Err(err) => {
                let (line, column) = err.position();
                let span = Span {
                    start: self.source.len(),
                    end: self.source.len(),
                    line,
                    column,
                };
                Token::new(TokenKind::Error(err), span)
            }
        };

        if matches!(token.kind, TokenKind::EOS | TokenKind::Error(_)) {
            self.done = Some(token.span);
        }

        token
    }

    fn source_text(&self) -> Option<&str> {
        Some(self.source)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lex::LexError;

    #[test]
    fn test_stream_is_fused_after_error() {
        let mut stream = TokenStream::new(Lexer::new("a #"));
        assert!(stream.next_token().ident().is_some());
        assert!(matches!(
            stream.next_token().kind,
            TokenKind::Error(LexError::InvalidCharacter { character: '#', .. })
        ));
        assert!(stream.next_token().is_end());
        assert!(stream.next_token().is_end());
    }

    #[test]
    fn test_fragment() {
        let mut stream = TokenStream::new(Lexer::new("begin  end"));
        stream.next_token();
        let end = stream.next_token();
        assert_eq!(stream.fragment_span(&end.span), "end");
        assert_eq!(stream.source_text(), Some("begin  end"));
    }
}
