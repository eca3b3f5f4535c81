//! Pushdown driver composing the sub-automata.
use crate::{
    automata::{AutomatonId, Directive},
    codegen::CodeGen,
    error::{CompileError, CompileResult, SyntaxError, SyntaxErrorKind},
    semantic::Semantics,
    symbol::SymbolRef,
    token_stream::TokenSource,
    tokens::{Token, TokenKind},
};
use log::{info, trace};

/// Return point of a sub-automaton invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    state: usize,
    automaton: AutomatonId,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    /// Tokens consumed.
    pub tokens: usize,
    /// Table lookups.
    pub steps: usize,
    /// Largest number of pending sub-automaton invocations.
    pub peak_depth: usize,
}

/// Single pass compiler.
///
/// Pulls tokens from `S` on demand and drives the semantic actions,
/// which emit through `G`.
pub struct Compiler<S, G> {
    source: S,
    semantics: Semantics<G>,
    frames: Vec<Frame>,
    automaton: AutomatonId,
    state: usize,
    /// Token that has been fetched but not consumed, with its interned row.
    lookahead: Option<(Token, Option<SymbolRef>)>,
    /// Automata called since the last consumed token.
    entered: u16,
    strict: bool,
    stats: Stats,
}

impl<S: TokenSource, G: CodeGen> Compiler<S, G> {
    pub fn new(source: S, gen: G) -> Self {
        Self {
            source,
            semantics: Semantics::new(gen),
            frames: vec![],
            automaton: AutomatonId::Program,
            state: 0,
            lookahead: None,
            entered: 0,
            strict: false,
            stats: Stats::default(),
        }
    }

    /// Fail on the first semantic warning.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[inline]
    pub fn semantics(&self) -> &Semantics<G> {
        &self.semantics
    }

    #[inline]
    pub fn into_semantics(self) -> Semantics<G> {
        self.semantics
    }

    /// Current number of pending invocations.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Runs until the program is accepted or an error stops it.
    pub fn run(&mut self) -> CompileResult<()> {
        loop {
            let (token, symbol) = match self.lookahead.take() {
                Some(lookahead) => lookahead,
                None => self.fetch()?,
            };

            self.stats.steps += 1;
            let step = self.automaton.step(self.state, &token);
            let Some(cell) = step.cell else {
                let kind = if token.is_end() {
                    SyntaxErrorKind::UnexpectedEnd
                } else {
                    SyntaxErrorKind::UnexpectedToken
                };
                return Err(self.syntax_error(kind, &token).into());
            };
            trace!(
                "{} {} {:?} -> {} {:?} depth {}",
                self.automaton,
                self.state,
                step.terminal,
                cell.next,
                cell.directive,
                self.frames.len()
            );

            match cell.directive {
                Directive::None => {
                    if token.is_end() {
                        return Err(self.syntax_error(SyntaxErrorKind::UnexpectedEnd, &token).into());
                    }
                    self.semantics
                        .on_consume(self.automaton, self.state, step.terminal, &token, symbol);
                    self.check_strict()?;

                    self.state = cell.next;
                    self.entered = 0;
                    self.stats.tokens += 1;
                    continue;
                }
                Directive::Call(target) => {
                    if self.entered & target.bit() != 0 {
                        let kind = SyntaxErrorKind::NoProgress(target);
                        return Err(self.syntax_error(kind, &token).into());
                    }
                    self.entered |= target.bit();

                    self.frames.push(Frame {
                        state: cell.next,
                        automaton: self.automaton,
                    });
                    self.stats.peak_depth = self.stats.peak_depth.max(self.frames.len());
                    self.automaton = target;
                    self.state = 0;
                }
                Directive::Final => match self.frames.pop() {
                    Some(frame) => {
                        self.semantics
                            .on_return(self.automaton, self.state, frame.automaton, frame.state);
                        self.check_strict()?;
                        self.automaton = frame.automaton;
                        self.state = frame.state;
                    }
                    None if token.is_end() => {
                        info!(
                            "accepted {} tokens in {} steps, peak depth {}",
                            self.stats.tokens, self.stats.steps, self.stats.peak_depth
                        );
                        return Ok(());
                    }
                    None => {
                        return Err(self.syntax_error(SyntaxErrorKind::TrailingInput, &token).into());
                    }
                },
            }

            // Not consumed
            self.lookahead = Some((token, symbol));
        }
    }

    fn fetch(&mut self) -> CompileResult<(Token, Option<SymbolRef>)> {
        let token = self.source.next_token();
        if let TokenKind::Error(err) = &token.kind {
            return Err(CompileError::Lex(err.clone()));
        }
        let symbol = token.ident().map(|name| self.semantics.intern(name));
        Ok((token, symbol))
    }

    fn check_strict(&self) -> CompileResult<()> {
        match self.semantics.diagnostics().warnings().first() {
            Some(warning) if self.strict => Err(CompileError::Semantic(warning.clone())),
            _ => Ok(()),
        }
    }

    fn syntax_error(&self, kind: SyntaxErrorKind, token: &Token) -> SyntaxError {
        SyntaxError {
            kind,
            automaton: self.automaton,
            state: self.state,
            token: token.kind.to_string(),
            line: token.span.line,
            column: token.span.column,
            excerpt: self
                .source
                .source_text()
                .map(|text| token.span.surrounding_line(text).to_string()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{codegen::Recorder, lex::Lexer, token_stream::TokenStream};

    fn run(source: &str) -> (CompileResult<()>, Compiler<TokenStream, Recorder>) {
        let mut compiler = Compiler::new(TokenStream::new(Lexer::new(source)), Recorder::new());
        let result = compiler.run();
        (result, compiler)
    }

    fn syntax_kind(source: &str) -> SyntaxErrorKind {
        match run(source).0 {
            Err(CompileError::Syntax(err)) => err.kind,
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_minimal_program() {
        let (result, compiler) = run("void main: begin end");
        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(compiler.depth(), 0);
        assert_eq!(compiler.stats().tokens, 5);
        assert!(compiler.semantics().engine().is_empty());
    }

    #[test]
    fn test_stacks_drained_after_program() {
        let sources = [
            "void main: int x begin x = 1 + 2; print(x); end",
            include_str!("../tests/programs/fib.crystal"),
        ];
        for source in sources {
            let (result, compiler) = run(source);
            assert!(result.is_ok(), "{:?}", result);
            assert_eq!(compiler.depth(), 0);
            assert!(compiler.semantics().engine().is_empty());
            assert!(!compiler.semantics().gen().emissions.is_empty());
        }
    }

    #[test]
    fn test_frame_depth_tracks_nesting() {
        let flat = run("void main: int x begin x = 1 + 2; end").1;
        let deep = run("void main: int x begin x = ((1 + 2)); end").1;

        // Each group adds an atom frame and an expression frame.
        assert_eq!(deep.stats().peak_depth - flat.stats().peak_depth, 4);
    }

    #[test]
    fn test_unexpected_token() {
        let (result, _) = run("void main begin end");
        let err = match result {
            Err(CompileError::Syntax(err)) => err,
            other => panic!("expected syntax error, got {:?}", other),
        };
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedToken);
        assert_eq!(err.automaton, AutomatonId::Program);
        assert_eq!(err.state, 5);
        assert_eq!((err.line, err.column), (1, 11));
        assert_eq!(err.excerpt.as_deref(), Some("void main begin end"));
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(syntax_kind("void main: begin"), SyntaxErrorKind::UnexpectedEnd);
        assert_eq!(syntax_kind(""), SyntaxErrorKind::UnexpectedEnd);
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(syntax_kind("void main: begin end x"), SyntaxErrorKind::TrailingInput);
    }

    #[test]
    fn test_call_without_arguments_makes_no_progress() {
        let source = "void f(): begin end void main: begin f(); end";
        assert_eq!(
            syntax_kind(source),
            SyntaxErrorKind::NoProgress(AutomatonId::Expression)
        );
    }

    #[test]
    fn test_lex_error_stops_compilation() {
        let (result, _) = run("void main: begin x = \"abc");
        assert!(matches!(result, Err(CompileError::Lex(_))));
    }

    #[test]
    fn test_strict_mode() {
        let source = "void main: begin y = 1; end";

        let (result, compiler) = run(source);
        assert!(result.is_ok());
        assert_eq!(compiler.semantics().diagnostics().warnings().len(), 2);

        let mut compiler = Compiler::new(TokenStream::new(Lexer::new(source)), Recorder::new());
        compiler.set_strict(true);
        match compiler.run() {
            Err(CompileError::Semantic(warning)) => assert_eq!((warning.line, warning.column), (1, 18)),
            other => panic!("expected semantic error, got {:?}", other),
        }
    }
}
