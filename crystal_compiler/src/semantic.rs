//! Semantic actions attached to table transitions.
//!
//! The driver calls [`Semantics::on_consume`] for every consumed token
//! and [`Semantics::on_return`] whenever a sub-automaton finishes. Cells
//! without an action are ignored.
use crate::{
    automata::{
        ArrayTerminal, AtomTerminal, AttrTerminal, AutomatonId, CommandTerminal, DeclTerminal,
        ExprTerminal, IfTerminal, ListTerminal, ProgramTerminal, Terminal, TypeTerminal,
    },
    codegen::{CodeGen, Label},
    error::{Diagnostics, SemanticError, Warning},
    expr::{Arith, Eval, ExprEngine, Logic, Operand, Operator, Relation, Unary},
    layout,
    symbol::{Category, SymbolRef, SymbolTables, Type, GLOBAL},
    tokens::{Token, TokenKind},
};
use log::{debug, trace};
use smol_str::SmolStr;

/// Words at the start of every activation record that are not
/// available to parameters and locals.
pub const FRAME_HEADER: usize = 2;

/// Declaration being collected by the grammar.
#[derive(Debug)]
struct Declaration {
    /// Type named by the most recent type specifier.
    ty: Type,
    /// Row waiting for its dimensions.
    symbol: Option<SymbolRef>,
    dims: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct WhileLoop {
    head: Label,
    end: Label,
}

#[derive(Debug, Clone, Copy)]
struct ForLoop {
    test: Label,
    step: Label,
    body: Label,
    end: Label,
}

/// One `if` or `elsif` branch.
#[derive(Debug, Clone, Copy)]
struct Branch {
    /// Start of the next branch, or the end when there is none.
    next: Label,
    end: Label,
    next_placed: bool,
}

pub struct Semantics<G> {
    symbols: SymbolTables,
    /// Table that identifiers are interned into and resolved from.
    scope: usize,
    engine: ExprEngine,
    gen: G,
    diagnostics: Diagnostics,
    decl: Declaration,
    /// Next free offset in the activation record or struct instance
    /// being declared.
    next_address: usize,
    in_parameters: bool,
    /// Function or struct whose declaration is open.
    owner: Option<SymbolRef>,
    routines: usize,
    labels: usize,
    /// A `.` was seen in a scan target list.
    field_pending: bool,
    whiles: Vec<WhileLoop>,
    fors: Vec<ForLoop>,
    branches: Vec<Branch>,
}

impl<G: CodeGen> Semantics<G> {
    pub fn new(gen: G) -> Self {
        Self {
            symbols: SymbolTables::new(),
            scope: GLOBAL,
            engine: ExprEngine::new(),
            gen,
            diagnostics: Diagnostics::new(),
            decl: Declaration {
                ty: Type::Int,
                symbol: None,
                dims: vec![],
            },
            next_address: 0,
            in_parameters: false,
            owner: None,
            routines: 0,
            labels: 0,
            field_pending: false,
            whiles: vec![],
            fors: vec![],
            branches: vec![],
        }
    }

    #[inline]
    pub fn symbols(&self) -> &SymbolTables {
        &self.symbols
    }

    #[inline]
    pub fn engine(&self) -> &ExprEngine {
        &self.engine
    }

    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[inline]
    pub fn gen(&self) -> &G {
        &self.gen
    }

    /// Current scope.
    #[inline]
    pub fn scope(&self) -> usize {
        self.scope
    }

    pub fn into_parts(self) -> (G, SymbolTables, Vec<Warning>) {
        (self.gen, self.symbols, self.diagnostics.into_warnings())
    }

    /// Records a mention of `name` in the current scope.
    #[inline]
    pub fn intern(&mut self, name: &str) -> SymbolRef {
        self.symbols.add_if_absent(self.scope, name)
    }

    /// Action for a token consumed by `automaton` in `state`.
    ///
    /// `symbol` is the row the token was interned as, for identifiers.
    pub fn on_consume(
        &mut self,
        automaton: AutomatonId,
        state: usize,
        terminal: Terminal,
        token: &Token,
        symbol: Option<SymbolRef>,
    ) {
        trace!("action {} {} {:?}", automaton, state, terminal);
        self.diagnostics.locate(token.span.line, token.span.column);

        match terminal {
            Terminal::Program(t) => self.program(state, t, token, symbol),
            Terminal::Declarations(t) => self.declarations(state, t, token, symbol),
            Terminal::Commands(t) => self.commands(state, t, token),
            Terminal::Attribution(t) => self.attribution(state, t, token),
            Terminal::ArrayLiteral(t) => self.array_literal(state, t),
            Terminal::IfBody(t) => self.if_body(state, t),
            Terminal::ExpressionList(t) => self.expression_list(state, t, token),
            Terminal::Expression(t) => self.expression(state, t),
            Terminal::Atom(t) => self.atom(state, t, token),
            Terminal::Type(t) => self.type_name(state, t, token),
        }
    }

    /// Action for `from` finishing in `from_state` and control going back
    /// to `to` at `to_state`.
    pub fn on_return(&mut self, from: AutomatonId, from_state: usize, to: AutomatonId, to_state: usize) {
        trace!("return {} {} -> {} {}", from, from_state, to, to_state);
        match (from, to, to_state) {
            (AutomatonId::Attribution, _, _) => {
                self.end_of_expression();
                self.engine.discard_operands();
            }
            (AutomatonId::Expression, AutomatonId::Commands, 1) => self.return_value(),
            (AutomatonId::IfBody, _, _) => self.close_branch(),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Per automaton dispatch

    fn program(&mut self, state: usize, terminal: ProgramTerminal, token: &Token, symbol: Option<SymbolRef>) {
        use ProgramTerminal as P;
        match (state, terminal) {
            (0, P::Void) => self.decl.ty = Type::Void,
            (0, P::Ident) => self.decl.ty = self.struct_type(token),
            (1 | 2, P::Ident) => {
                if let Some(symbol) = symbol {
                    self.declare_function(symbol);
                }
            }
            (3, P::Ident) => {
                if let Some(symbol) = symbol {
                    self.declare_struct(symbol);
                }
            }
            (1, P::Main) => self.declare_main(),
            (4 | 13, P::OpenParen) => self.begin_parameters(),
            (14, P::Int) => {
                if let (Some(function), Some(size)) = (self.owner, Self::int_value(token)) {
                    self.symbols[function].dims.push(size);
                }
            }
            (15 | 16, P::CloseParen) => {
                self.finalize_declaration();
                self.in_parameters = false;
            }
            (7 | 9, P::Begin) => {
                self.finalize_declaration();
                self.begin_main();
            }
            (18 | 20, P::Begin) => {
                self.finalize_declaration();
                self.begin_function_body();
            }
            (10, P::End) => self.end_main(),
            (21, P::End) => self.end_function(),
            (11, P::EndStruct) => self.end_struct(),
            _ => {}
        }
    }

    fn declarations(&mut self, state: usize, terminal: DeclTerminal, token: &Token, symbol: Option<SymbolRef>) {
        use DeclTerminal as D;
        match (state, terminal) {
            (0, D::Ident) => self.decl.ty = self.struct_type(token),
            (1, D::Ident) => {
                if let Some(symbol) = symbol {
                    self.declare_value(symbol);
                }
            }
            (2, D::Comma) => self.finalize_declaration(),
            (3, D::Int) => {
                if let Some(size) = Self::int_value(token) {
                    self.decl.dims.push(size);
                }
            }
            _ => {}
        }
    }

    fn type_name(&mut self, state: usize, terminal: TypeTerminal, token: &Token) {
        if let (0, TypeTerminal::Type) = (state, terminal) {
            if let Some(ty) = token.reserved().and_then(Type::from_reserved) {
                self.decl.ty = ty;
            }
        }
    }

    fn commands(&mut self, state: usize, terminal: CommandTerminal, token: &Token) {
        use CommandTerminal as C;
        match (state, terminal) {
            (0, C::While) => {
                let head = self.new_label();
                let end = self.new_label();
                self.gen.label(head);
                self.whiles.push(WhileLoop { head, end });
            }
            (13, C::Colon) => {
                if let Some(l) = self.whiles.last().copied() {
                    self.branch_if_false(l.end);
                }
            }
            (14, C::EndWhile) => {
                if let Some(l) = self.whiles.pop() {
                    self.gen.jump(l.head);
                    self.gen.label(l.end);
                }
            }

            (0, C::For) => {
                let l = ForLoop {
                    test: self.new_label(),
                    step: self.new_label(),
                    body: self.new_label(),
                    end: self.new_label(),
                };
                self.fors.push(l);
            }
            (19, C::Semicolon) => {
                if let Some(l) = self.fors.last().copied() {
                    self.gen.label(l.test);
                }
            }
            (21, C::Semicolon) => {
                if let Some(l) = self.fors.last().copied() {
                    self.end_of_expression();
                    self.branch_if_false(l.end);
                    self.gen.jump(l.body);
                    self.gen.label(l.step);
                }
            }
            (24, C::CloseParen) => {
                if let Some(l) = self.fors.last().copied() {
                    self.gen.jump(l.test);
                    self.gen.label(l.body);
                }
            }
            (26, C::EndFor) => {
                if let Some(l) = self.fors.pop() {
                    self.gen.jump(l.step);
                    self.gen.label(l.end);
                }
            }

            (0, C::Scan) => self.operator(Operator::Scan),
            (0, C::Print) => self.operator(Operator::Print),
            (5 | 6, C::OpenParen) => self.operator(Operator::OpenParen),
            (11 | 12 | 16, C::CloseParen) => self.end_of_expression(),
            (15, C::Ident) => {
                if std::mem::take(&mut self.field_pending) {
                    self.field(token);
                } else {
                    self.identifier(token);
                }
            }
            (16, C::Dot) => self.field_pending = true,
            (16, C::Comma) => self.comma(),
            (17, C::Int) => self.index(token),

            (7, C::Semicolon) => self.gen.function_return(None),
            _ => {}
        }
    }

    fn attribution(&mut self, state: usize, terminal: AttrTerminal, token: &Token) {
        use AttrTerminal as A;
        match (state, terminal) {
            (0, A::Ident) => self.identifier(token),
            (1, A::OpenParen) => self.operator(Operator::OpenParen),
            (7, A::CloseParen) => self.end_of_expression(),
            (2, A::Int) => self.index(token),
            (3, A::Ident) => self.field(token),
            (1 | 8, A::Eq) => self.operator(Operator::Assign),
            (4, A::OpenBracket) => self.engine.begin_list(),
            (4, A::Str) => {
                if let TokenKind::Str(text) = &token.kind {
                    let id = self.gen.intern_string(text);
                    self.engine.push_operand(Operand::string(id));
                }
            }
            (11, A::CloseBracket) => {
                let (engine, mut eval) = self.split();
                engine.end_list(&mut eval);
            }
            _ => {}
        }
    }

    fn array_literal(&mut self, state: usize, terminal: ArrayTerminal) {
        // Rows are flattened, the separator only closes the previous row.
        if let (4, ArrayTerminal::Comma) = (state, terminal) {
            self.comma();
        }
    }

    fn expression_list(&mut self, state: usize, terminal: ListTerminal, token: &Token) {
        match (state, terminal) {
            (1, ListTerminal::Comma) => self.comma(),
            (0, ListTerminal::Str) => {
                if let TokenKind::Str(text) = &token.kind {
                    let operand = if text == "\n" {
                        Operand::line_break()
                    } else {
                        Operand::string(self.gen.intern_string(text))
                    };
                    self.engine.push_operand(operand);
                }
            }
            _ => {}
        }
    }

    #[rustfmt::skip]
    fn expression(&mut self, state: usize, terminal: ExprTerminal) {
        use ExprTerminal as E;
        use Operator as O;
        match (state, terminal) {
            (0, E::Not)     => self.operator(O::Unary(Unary::Not)),
            (0, E::Minus)   => self.operator(O::Unary(Unary::Minus)),
            (1, E::Plus)    => self.operator(O::Arith(Arith::Add)),
            (1, E::Minus)   => self.operator(O::Arith(Arith::Sub)),
            (1, E::Star)    => self.operator(O::Arith(Arith::Mul)),
            (1, E::Slash)   => self.operator(O::Arith(Arith::Div)),
            (1, E::Percent) => self.operator(O::Arith(Arith::Mod)),
            (1, E::Eq)      => self.operator(O::Relation(Relation::Equal)),
            (1, E::Bang)    => self.operator(O::Relation(Relation::NotEqual)),
            (1, E::Less)    => self.operator(O::Relation(Relation::Less)),
            (1, E::Greater) => self.operator(O::Relation(Relation::Greater)),
            (3, E::Amp)     => self.operator(O::Logic(Logic::And)),
            (4, E::Pipe)    => self.operator(O::Logic(Logic::Or)),
            (5 | 6, E::Eq)  => self.engine.complete_comparison(),
            _               => {}
        }
    }

    fn atom(&mut self, state: usize, terminal: AtomTerminal, token: &Token) {
        use AtomTerminal as A;
        match (state, terminal) {
            (0, A::True) => self.engine.push_operand(Operand::boolean(true)),
            (0, A::False) => self.engine.push_operand(Operand::boolean(false)),
            (0, A::Int) => {
                if let TokenKind::Int(value) = token.kind {
                    self.engine.push_operand(Operand::int(value));
                }
            }
            (0, A::Char) => {
                if let TokenKind::Char(c) = token.kind {
                    self.engine.push_operand(Operand::char(c));
                }
            }
            (0, A::Float) => {
                if let TokenKind::Float(value) = token.kind {
                    self.diagnostics.report(SemanticError::UnsupportedFloat(value));
                    self.engine.push_operand(Operand::int(value as i64));
                }
            }
            (0 | 2, A::OpenParen) => self.operator(Operator::OpenParen),
            (4, A::CloseParen) => {
                let (engine, mut eval) = self.split();
                engine.close_paren(&mut eval);
            }
            (0, A::Ident) => self.identifier(token),
            (5, A::Int) => self.index(token),
            (6, A::Ident) => self.field(token),
            _ => {}
        }
    }

    fn if_body(&mut self, state: usize, terminal: IfTerminal) {
        use IfTerminal as I;
        match (state, terminal) {
            (0, I::OpenParen) => {
                self.operator(Operator::OpenParen);
                let branch = Branch {
                    next: self.new_label(),
                    end: self.new_label(),
                    next_placed: false,
                };
                self.branches.push(branch);
            }
            (2, I::CloseParen) => self.end_of_expression(),
            (3, I::Colon) => {
                if let Some(branch) = self.branches.last().copied() {
                    self.branch_if_false(branch.next);
                }
            }
            (4, I::Else | I::ElsIf) => {
                if let Some(branch) = self.branches.last_mut() {
                    branch.next_placed = true;
                    let Branch { next, end, .. } = *branch;
                    self.gen.jump(end);
                    self.gen.label(next);
                }
            }
            (4 | 8, I::EndIf) => {
                if let Some(branch) = self.branches.last_mut() {
                    if !std::mem::replace(&mut branch.next_placed, true) {
                        let next = branch.next;
                        self.gen.label(next);
                    }
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Declarations

    fn struct_type(&mut self, token: &Token) -> Type {
        let Some(name) = token.ident() else {
            return Type::Int;
        };
        match self.symbols.resolve(self.scope, name) {
            Some(r) if self.symbols[r].category == Category::Struct => Type::Struct(r),
            _ => {
                self.diagnostics.report(SemanticError::UndeclaredType(name.clone()));
                Type::Int
            }
        }
    }

    fn check_redeclared(&mut self, symbol: SymbolRef) -> bool {
        let row = &self.symbols[symbol];
        if row.is_defined() {
            let name = row.name.clone();
            self.diagnostics.report(SemanticError::Redeclared(name));
            true
        } else {
            false
        }
    }

    fn enter(&mut self, table: usize) {
        debug!("enter scope {} from {}", table, self.scope);
        self.scope = table;
    }

    fn leave(&mut self) {
        let parent = self.symbols.parent(self.scope).unwrap_or(GLOBAL);
        debug!("leave scope {} for {}", self.scope, parent);
        self.scope = parent;
    }

    fn declare_function(&mut self, symbol: SymbolRef) {
        self.check_redeclared(symbol);

        let child = self.symbols.create_table(Some(self.scope));
        let index = self.routines;
        self.routines += 1;

        let row = &mut self.symbols[symbol];
        row.category = Category::Function;
        row.ty = self.decl.ty;
        row.child = Some(child);
        row.address = index;
        row.size = 0;
        row.params = 0;
        row.dims.clear();
        debug!("declare function {} as routine {}", row.name, index);

        self.owner = Some(symbol);
    }

    fn begin_parameters(&mut self) {
        let Some(function) = self.owner else {
            return;
        };
        let row = &self.symbols[function];
        let element = self.symbols.type_size(&row.ty);
        let child = row.child;
        let size = match layout::total_size(element, &row.dims) {
            Some(size) => size,
            None => {
                let name = row.name.clone();
                self.diagnostics.report(SemanticError::ArrayTooLarge(name));
                self.symbols[function].dims.clear();
                element
            }
        };
        self.symbols[function].size = size;

        if let Some(child) = child {
            self.enter(child);
        }
        self.next_address = FRAME_HEADER;
        self.in_parameters = true;
    }

    fn begin_function_body(&mut self) {
        let Some(function) = self.owner else {
            return;
        };
        self.engine.reset(self.next_address);
        let row = &self.symbols[function];
        self.gen.begin_function(row.address, &row.name, self.next_address);
    }

    fn end_function(&mut self) {
        if let Some(function) = self.owner.take() {
            self.gen.end_function(self.symbols[function].address);
        }
        self.leave();
    }

    fn declare_main(&mut self) {
        let table = self.symbols.create_table(Some(self.scope));
        debug!("declare main with scope {}", table);
        self.enter(table);
        self.next_address = FRAME_HEADER;
    }

    fn begin_main(&mut self) {
        self.engine.reset(self.next_address);
        self.gen.begin_main(self.next_address);
    }

    fn end_main(&mut self) {
        self.gen.end_main();
        self.leave();
    }

    fn declare_struct(&mut self, symbol: SymbolRef) {
        self.check_redeclared(symbol);

        let child = self.symbols.create_table(Some(self.scope));
        let row = &mut self.symbols[symbol];
        row.category = Category::Struct;
        row.ty = Type::Struct(symbol);
        row.child = Some(child);
        row.size = 0;
        debug!("declare struct {}", row.name);

        self.owner = Some(symbol);
        self.enter(child);
        self.next_address = 0;
    }

    fn end_struct(&mut self) {
        self.finalize_declaration();
        if let Some(decl) = self.owner.take() {
            let row = &mut self.symbols[decl];
            row.size = self.next_address;
            debug!("struct {} has size {}", row.name, row.size);
        }
        self.leave();
    }

    fn declare_value(&mut self, symbol: SymbolRef) {
        self.decl.dims.clear();
        if self.check_redeclared(symbol) {
            self.decl.symbol = None;
            return;
        }

        let row = &mut self.symbols[symbol];
        row.category = if self.in_parameters {
            Category::Parameter
        } else {
            Category::Variable
        };
        row.ty = self.decl.ty;
        self.decl.symbol = Some(symbol);
    }

    /// Lays out the pending declaration once its dimensions are known.
    fn finalize_declaration(&mut self) {
        let Some(symbol) = self.decl.symbol.take() else {
            return;
        };
        let dims = std::mem::take(&mut self.decl.dims);
        let row = &self.symbols[symbol];
        let element = self.symbols.type_size(&row.ty);
        let address = self.next_address;
        let laid_out = layout::total_size(element, &dims)
            .and_then(|size| Some((size, address.checked_add(size)?)));

        // Too large declarations are kept as a single element.
        let (dims, size, end) = match laid_out {
            Some((size, end)) => (dims, size, end),
            None => {
                let name = row.name.clone();
                self.diagnostics.report(SemanticError::ArrayTooLarge(name));
                (vec![], element, address.saturating_add(element))
            }
        };
        self.next_address = end;

        let row = &mut self.symbols[symbol];
        row.dims = dims;
        row.size = size;
        row.address = address;
        debug!("{:?} {} at {} size {}", row.category, row.name, address, size);

        if row.category == Category::Parameter {
            if let Some(function) = self.owner {
                self.symbols[function].params += 1;
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions

    fn split(&mut self) -> (&mut ExprEngine, Eval<'_>) {
        (
            &mut self.engine,
            Eval {
                symbols: &self.symbols,
                gen: &mut self.gen,
                diagnostics: &mut self.diagnostics,
            },
        )
    }

    fn operator(&mut self, op: Operator) {
        let (engine, mut eval) = self.split();
        engine.push_operator(op, &mut eval);
    }

    fn end_of_expression(&mut self) {
        let (engine, mut eval) = self.split();
        engine.end_of_expression(&mut eval);
    }

    fn comma(&mut self) {
        let (engine, mut eval) = self.split();
        engine.comma(&mut eval);
    }

    fn index(&mut self, token: &Token) {
        if let Some(index) = Self::int_value(token) {
            let (engine, mut eval) = self.split();
            engine.access_index(index, &mut eval);
        }
    }

    fn field(&mut self, token: &Token) {
        if let Some(name) = token.ident() {
            let (engine, mut eval) = self.split();
            engine.access_field(name, &mut eval);
        }
    }

    /// Pushes an identifier as a variable operand or a call operator,
    /// depending on how it was declared.
    fn identifier(&mut self, token: &Token) {
        let Some(name) = token.ident() else {
            return;
        };
        let Some(symbol) = self.symbols.resolve(self.scope, name) else {
            self.diagnostics
                .report(SemanticError::UndeclaredIdentifier(name.clone()));
            return self.engine.push_operand(Operand::int(0));
        };

        let row = &self.symbols[symbol];
        match row.category {
            Category::Function => self.operator(Operator::Call(symbol)),
            Category::Variable | Category::Parameter => {
                let operand = Operand::variable(row.address, row.ty, symbol);
                self.engine.push_operand(operand);
            }
            _ => {
                self.diagnostics.report(SemanticError::NotAValue(SmolStr::clone(name)));
                self.engine.push_operand(Operand::int(0));
            }
        }
    }

    fn return_value(&mut self) {
        self.end_of_expression();
        let value = self.engine.pop_operand();
        let size = self
            .owner
            .map(|function| &self.symbols[function])
            .filter(|row| row.category == Category::Function && row.ty != Type::Void)
            .map(|row| row.size.max(1));

        match (value, size) {
            (Some(value), Some(size)) => self.gen.function_return(Some((&value, size))),
            (None, Some(_)) => {
                self.diagnostics.report(SemanticError::MissingOperand);
                self.gen.function_return(None);
            }
            _ => self.gen.function_return(None),
        }
    }

    // ------------------------------------------------------------------
    // Control flow

    fn new_label(&mut self) -> Label {
        let label = Label(self.labels);
        self.labels += 1;
        label
    }

    fn branch_if_false(&mut self, label: Label) {
        match self.engine.pop_operand() {
            Some(condition) => self.gen.jump_if_false(&condition, label),
            None => self.diagnostics.report(SemanticError::MissingOperand),
        }
    }

    fn close_branch(&mut self) {
        if let Some(branch) = self.branches.pop() {
            if !branch.next_placed {
                self.gen.label(branch.next);
            }
            self.gen.label(branch.end);
        }
    }

    fn int_value(token: &Token) -> Option<usize> {
        match token.kind {
            TokenKind::Int(value) => usize::try_from(value).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{codegen::Emission, compile_recorded, expr::OperandKind};

    fn compile(source: &str) -> (Vec<Emission>, SymbolTables, Vec<Warning>) {
        let (rec, symbols, warnings) = compile_recorded(source).unwrap();
        (rec.emissions, symbols, warnings)
    }

    fn control_flow(emissions: &[Emission]) -> Vec<Emission> {
        emissions
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    Emission::Label(_) | Emission::Jump(_) | Emission::JumpIfFalse { .. }
                )
            })
            .map(|e| match e {
                Emission::JumpIfFalse { label, .. } => Emission::Jump(Label(1000 + label.0)),
                other => other.clone(),
            })
            .collect()
    }

    #[test]
    fn test_struct_and_parameter_layout() {
        let source = r#"
            struct Point: int x, int y endstruct
            int add(int a, Point p, int c): begin return a + c; end
            void main: begin end
        "#;
        let (emissions, symbols, warnings) = compile(source);
        assert!(warnings.is_empty(), "{:?}", warnings);

        let point = symbols.resolve(GLOBAL, "Point").unwrap();
        assert_eq!(symbols[point].category, Category::Struct);
        assert_eq!(symbols[point].size, 2);

        let add = symbols.resolve(GLOBAL, "add").unwrap();
        assert_eq!(symbols[add].params, 3);
        assert_eq!(symbols[add].size, 1);

        let body = symbols[add].child.unwrap();
        let address = |name: &str| symbols[symbols.resolve(body, name).unwrap()].address;
        assert_eq!(address("a"), 2);
        assert_eq!(address("p"), 3);
        assert_eq!(address("c"), 5);

        assert!(emissions.contains(&Emission::Return {
            value: Some((Operand::temporary(6, Type::Int), 1))
        }));
    }

    #[test]
    fn test_array_size() {
        let (_, symbols, _) = compile("void main: int arr[3][4], int n begin end");
        let main = 1;
        let arr = symbols.resolve(main, "arr").unwrap();
        assert_eq!(symbols[arr].size, 12);
        assert_eq!(symbols[arr].dims, vec![3, 4]);

        let n = symbols.resolve(main, "n").unwrap();
        assert_eq!(symbols[n].address, 14);
    }

    #[test]
    fn test_array_too_large_is_one_element() {
        let source = "void main: int a[4294967296][4294967296], int n begin end";
        let (_, symbols, warnings) = compile(source);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].error, SemanticError::ArrayTooLarge("a".into()));

        let main = 1;
        let a = symbols.resolve(main, "a").unwrap();
        assert_eq!(symbols[a].size, 1);
        assert!(symbols[a].dims.is_empty());

        let n = symbols.resolve(main, "n").unwrap();
        assert_eq!(symbols[n].address, 3);
    }

    #[test]
    fn test_index_out_of_bounds_is_reported() {
        let source = "void main: int a[2][3], int x begin x = a[9223372036854775807][0]; end";
        let (emissions, _, warnings) = compile(source);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].error,
            SemanticError::IndexOutOfBounds {
                index: 9223372036854775807,
                size: 2
            }
        );

        // Falls back to the first row.
        assert!(emissions.iter().any(|e| matches!(
            e,
            Emission::Assign { target: 8, value, size: 1 } if value.kind == OperandKind::Variable(2)
        )));
    }

    #[test]
    fn test_field_of_struct_array_element() {
        let source = r#"
            struct Point: int x, int y endstruct
            void main: Point ps[3], int v begin v = ps[1].y; end
        "#;
        let (emissions, symbols, warnings) = compile(source);
        assert!(warnings.is_empty(), "{:?}", warnings);

        let main = (0..symbols.len())
            .find(|table| symbols.find_local(*table, "ps").is_some())
            .unwrap();
        let ps = symbols.find_local(main, "ps").unwrap();
        assert_eq!(symbols[ps].address, 2);
        assert_eq!(symbols[ps].size, 6);
        let v = symbols.find_local(main, "v").unwrap();
        assert_eq!(symbols[v].address, 8);

        // ps + 1 * sizeof(Point) + offset(y)
        assert!(emissions.iter().any(|e| matches!(
            e,
            Emission::Assign { target: 8, value, size: 1 } if value.kind == OperandKind::Variable(5)
        )));
    }

    #[test]
    fn test_assign_and_print() {
        let (emissions, symbols, warnings) = compile("void main: int x begin x = 1 + 2; print(x); end");
        assert!(warnings.is_empty());

        let x = symbols.resolve(1, "x").unwrap();
        assert_eq!(emissions.first(), Some(&Emission::BeginMain { frame: 3 }));
        assert!(emissions.contains(&Emission::Assign {
            target: 2,
            value: Operand::temporary(3, Type::Int),
            size: 1
        }));
        assert!(emissions.contains(&Emission::Print(Operand::variable(2, Type::Int, x))));
        assert_eq!(emissions.last(), Some(&Emission::EndMain));

        let mut rec = crate::codegen::Recorder::new();
        rec.emissions = emissions;
        assert_eq!(rec.simulate(4)[2], 3);
    }

    #[test]
    fn test_if_elsif_else_labels() {
        let source = r#"
            void main: int x begin
                if (x < 1): x = 1;
                elsif (x < 2): x = 2;
                else: x = 3;
                endif
            end
        "#;
        let (emissions, _, _) = compile(source);

        // Conditional jumps show up as labels offset by 1000.
        assert_eq!(
            control_flow(&emissions),
            vec![
                Emission::Jump(Label(1000)),
                Emission::Jump(Label(1)),
                Emission::Label(Label(0)),
                Emission::Jump(Label(1002)),
                Emission::Jump(Label(3)),
                Emission::Label(Label(2)),
                Emission::Label(Label(3)),
                Emission::Label(Label(1)),
            ]
        );
    }

    #[test]
    fn test_while_labels() {
        let source = "void main: int i begin while (i < 3): i = i + 1; endwhile end";
        let (emissions, _, _) = compile(source);
        assert_eq!(
            control_flow(&emissions),
            vec![
                Emission::Label(Label(0)),
                Emission::Jump(Label(1001)),
                Emission::Jump(Label(0)),
                Emission::Label(Label(1)),
            ]
        );
    }

    #[test]
    fn test_for_labels() {
        let source = r#"
            void main: int i, int s begin
                for (i = 0; i < 3; i = i + 1): s = s + i; endfor
            end
        "#;
        let (emissions, _, warnings) = compile(source);
        assert!(warnings.is_empty());
        assert_eq!(
            control_flow(&emissions),
            vec![
                Emission::Label(Label(0)),
                Emission::Jump(Label(1003)),
                Emission::Jump(Label(2)),
                Emission::Label(Label(1)),
                Emission::Jump(Label(0)),
                Emission::Label(Label(2)),
                Emission::Jump(Label(1)),
                Emission::Label(Label(3)),
            ]
        );
    }

    #[test]
    fn test_call_passes_parameters() {
        let source = r#"
            int add(int a, int b): begin return a + b; end
            void main: int x begin x = add(1, 2); end
        "#;
        let (emissions, _, warnings) = compile(source);
        assert!(warnings.is_empty(), "{:?}", warnings);

        let start = emissions
            .iter()
            .position(|e| matches!(e, Emission::BeginMain { .. }))
            .unwrap();
        assert_eq!(
            &emissions[start + 1..],
            &[
                Emission::PassParameter {
                    value: Operand::int(1),
                    address: 2,
                    size: 1
                },
                Emission::PassParameter {
                    value: Operand::int(2),
                    address: 3,
                    size: 1
                },
                Emission::Temporary(3),
                Emission::Call {
                    index: 0,
                    result: Some((3, 1))
                },
                Emission::Assign {
                    target: 2,
                    value: Operand::temporary(3, Type::Int),
                    size: 1
                },
                Emission::EndMain,
            ]
        );
    }

    #[test]
    fn test_field_and_array_literal() {
        let source = r#"
            struct Point: int x, int y endstruct
            void main: Point p, int a[2][2] begin
                p.y = 5;
                a = [[1, 2], [3, 4]];
            end
        "#;
        let (emissions, _, warnings) = compile(source);
        assert!(warnings.is_empty(), "{:?}", warnings);

        let targets: Vec<(usize, OperandKind)> = emissions
            .iter()
            .filter_map(|e| match e {
                Emission::Assign { target, value, .. } => Some((*target, value.kind)),
                _ => None,
            })
            .collect();
        assert_eq!(
            targets,
            vec![
                (3, OperandKind::Int(5)),
                (4, OperandKind::Int(1)),
                (5, OperandKind::Int(2)),
                (6, OperandKind::Int(3)),
                (7, OperandKind::Int(4)),
            ]
        );
    }

    #[test]
    fn test_scan_element() {
        let (emissions, _, warnings) = compile("void main: int a[3] begin scan(a[1]); end");
        assert!(warnings.is_empty());
        assert!(emissions.contains(&Emission::Scan {
            ty: Type::Int,
            target: 3
        }));
    }

    #[test]
    fn test_warnings() {
        let (_, symbols, warnings) = compile("void main: int x, int x begin print(y); x = 1.5; end");
        let errors: Vec<&SemanticError> = warnings.iter().map(|w| &w.error).collect();
        assert_eq!(
            errors,
            vec![
                &SemanticError::Redeclared("x".into()),
                &SemanticError::UndeclaredIdentifier("y".into()),
                &SemanticError::UnsupportedFloat(1.5),
            ]
        );

        // Mentioned, but never declared.
        assert!(symbols.lookup(1, "y").is_some());
        assert!(symbols.resolve(1, "y").is_none());
    }
}
