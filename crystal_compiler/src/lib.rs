pub mod automata;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod expr;
pub mod layout;
pub mod lex;
pub mod semantic;
pub mod symbol;
pub mod token_stream;
pub mod tokens;

use self::{
    codegen::{Mvn, MvnConf, Recorder},
    driver::{Compiler, Stats},
    error::{CompileResult, Warning},
    lex::Lexer,
    symbol::SymbolTables,
    token_stream::TokenStream,
};

pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compiler configuration parameters.
#[derive(Debug, Default, Clone)]
pub struct CompileConf {
    /// Fail on the first semantic warning instead of collecting it.
    pub strict: bool,
    /// Start the output with a comment naming the compiler.
    pub header_comment: bool,
    /// Extra words reserved for the call stack after the main frame.
    pub stack_reserve: usize,
}

/// Output of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    /// MVN assembly text.
    pub assembly: String,
    pub warnings: Vec<Warning>,
    pub stats: Stats,
}

pub fn compile_str(source: &str) -> CompileResult<Compilation> {
    compile_with(source, CompileConf::default())
}

pub fn compile_with(source: &str, conf: CompileConf) -> CompileResult<Compilation> {
    let gen = Mvn::with_conf(MvnConf {
        header: conf
            .header_comment
            .then(|| format!("Generated by crystal v{}", IMPL_VERSION)),
        stack_reserve: conf.stack_reserve,
    });

    let stream = TokenStream::new(Lexer::new(source));
    let mut compiler = Compiler::new(stream, gen);
    compiler.set_strict(conf.strict);
    compiler.run()?;

    let stats = compiler.stats().clone();
    let (gen, _, warnings) = compiler.into_semantics().into_parts();

    Ok(Compilation {
        assembly: gen.finish()?,
        warnings,
        stats,
    })
}

/// Compiles into a [`Recorder`], keeping the symbol tables for inspection.
pub fn compile_recorded(source: &str) -> CompileResult<(Recorder, SymbolTables, Vec<Warning>)> {
    let stream = TokenStream::new(Lexer::new(source));
    let mut compiler = Compiler::new(stream, Recorder::new());
    compiler.run()?;
    Ok(compiler.into_semantics().into_parts())
}

pub mod prelude {
    pub use super::{
        codegen::{CodeGen, Mvn, Recorder},
        compile_recorded, compile_str, compile_with,
        driver::{Compiler, Stats},
        error::{CompileError, CompileResult, SemanticError, SyntaxError, Warning},
        symbol::{Category, SymbolTables, Type},
        token_stream::{TokenSource, TokenStream},
        Compilation, CompileConf,
    };
}
