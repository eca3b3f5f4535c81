use super::{Access, Operand, OperandKind, Operator, Relation};
use crate::{
    codegen::CodeGen,
    error::{Diagnostics, SemanticError},
    layout,
    symbol::{Category, SymbolRef, SymbolTables, Type},
};
use log::trace;
use smol_str::SmolStr;

/// Borrowed context an evaluation needs besides the stacks.
pub struct Eval<'a> {
    pub symbols: &'a SymbolTables,
    pub gen: &'a mut dyn CodeGen,
    pub diagnostics: &'a mut Diagnostics,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    op: Operator,
    /// Height of the operand stack when the operator was pushed.
    base: usize,
}

/// Operator precedence evaluator.
///
/// Operands and operators are pushed as the grammar recognizes them, and
/// operators are evaluated when one of the drain triggers fires. Each
/// evaluation is handed to the code generator immediately, and its result
/// is pushed back as a temporary.
#[derive(Debug, Default)]
pub struct ExprEngine {
    operands: Vec<Operand>,
    operators: Vec<Pending>,
    /// First frame offset available for temporaries.
    frame_base: usize,
    /// Temporaries in use.
    temps: usize,
    /// Operand stack height at the start of an array literal.
    list_base: Option<usize>,
}

impl ExprEngine {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears both stacks and places temporaries after `frame_base`.
    pub fn reset(&mut self, frame_base: usize) {
        self.operands.clear();
        self.operators.clear();
        self.frame_base = frame_base;
        self.temps = 0;
        self.list_base = None;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty() && self.operators.is_empty()
    }

    #[inline]
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Pending operators, bottom first.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.operators.iter().map(|p| p.op)
    }

    #[inline]
    pub fn push_operand(&mut self, operand: Operand) {
        trace!("operand {:?}", operand.kind);
        self.operands.push(operand);
    }

    /// Pushes an operator, first evaluating pending operators that bind
    /// tighter.
    pub fn push_operator(&mut self, op: Operator, eval: &mut Eval) {
        while let Some(top) = self.operators.last().copied() {
            if top.op.is_sentinel() || top.op.precedence() <= op.precedence() {
                break;
            }
            self.operators.pop();
            self.evaluate(top, eval);
        }

        trace!("operator {}", op);
        self.operators.push(Pending {
            op,
            base: self.operands.len(),
        });
    }

    /// Turns a pending `<`, `>`, `==` or `!=` into its two character form
    /// after the trailing `=` arrives.
    pub fn complete_comparison(&mut self) {
        if let Some(top) = self.operators.last_mut() {
            top.op = match top.op {
                Operator::Relation(Relation::Less) => Operator::Relation(Relation::LessEq),
                Operator::Relation(Relation::Greater) => Operator::Relation(Relation::GreaterEq),
                other => other,
            };
        }
    }

    /// Evaluates everything pending. Parentheses and commas are dropped.
    pub fn end_of_expression(&mut self, eval: &mut Eval) {
        while let Some(top) = self.operators.pop() {
            self.evaluate(top, eval);
        }
    }

    /// Evaluates down to the enclosing parenthesis or the previous comma,
    /// then marks the argument boundary.
    pub fn comma(&mut self, eval: &mut Eval) {
        while let Some(top) = self.operators.last().copied() {
            if top.op.is_sentinel() {
                break;
            }
            self.operators.pop();
            self.evaluate(top, eval);
        }
        self.operators.push(Pending {
            op: Operator::Comma,
            base: self.operands.len(),
        });
    }

    /// Evaluates down to the matching open parenthesis and removes it.
    pub fn close_paren(&mut self, eval: &mut Eval) {
        while let Some(top) = self.operators.last().copied() {
            match top.op {
                Operator::OpenParen => {
                    self.operators.pop();
                    break;
                }
                Operator::Assign => break,
                _ => {
                    self.operators.pop();
                    self.evaluate(top, eval);
                }
            }
        }
    }

    /// Removes the top operand, typically an expression result consumed
    /// by a control flow construct.
    pub fn pop_operand(&mut self) -> Option<Operand> {
        let operand = self.operands.pop();
        self.settle();
        operand
    }

    /// Drops all operands, such as the unused result of a call statement.
    pub fn discard_operands(&mut self) {
        self.operands.clear();
        self.settle();
    }

    /// Narrows the top operand to one of its struct fields.
    pub fn access_field(&mut self, field: &SmolStr, eval: &mut Eval) {
        let Some(top) = self.operands.last_mut() else {
            return eval.diagnostics.report(SemanticError::MissingOperand);
        };

        let (Type::Struct(decl), Some(offset)) = (top.ty, top.offset()) else {
            return eval.diagnostics.report(SemanticError::NotAStruct);
        };
        if !top.remaining_dims(eval.symbols).is_empty() {
            return eval.diagnostics.report(SemanticError::NotAStruct);
        }

        let member = eval.symbols[decl]
            .child
            .and_then(|table| eval.symbols.find_local(table, field))
            .filter(|r| eval.symbols[*r].is_defined());
        let Some(member) = member else {
            return eval.diagnostics.report(SemanticError::UnknownField(field.clone()));
        };

        let symbol = &eval.symbols[member];
        let offset = offset + symbol.address;
        top.kind = match top.kind {
            OperandKind::Temporary(_) => OperandKind::Temporary(offset),
            _ => OperandKind::Variable(offset),
        };
        top.ty = symbol.ty;
        top.access = Some(Access {
            symbol: member,
            dims_used: 0,
        });
    }

    /// Narrows the top operand to an element of its next dimension.
    pub fn access_index(&mut self, index: usize, eval: &mut Eval) {
        let Some(top) = self.operands.last_mut() else {
            return eval.diagnostics.report(SemanticError::MissingOperand);
        };
        let (Some(access), Some(offset)) = (top.access, top.offset()) else {
            return eval.diagnostics.report(SemanticError::TooManyIndices);
        };

        let remaining = eval.symbols[access.symbol]
            .dims
            .get(access.dims_used..)
            .unwrap_or_default();
        let Some(size) = remaining.first().copied() else {
            return eval.diagnostics.report(SemanticError::TooManyIndices);
        };

        // An element out of bounds addresses the first one instead.
        let element = eval.symbols.type_size(&top.ty).max(1);
        let step = match layout::offset(element, remaining, &[index]) {
            Some(step) => step,
            None => {
                eval.diagnostics
                    .report(SemanticError::IndexOutOfBounds { index, size });
                0
            }
        };
        let Some(offset) = offset.checked_add(step) else {
            return eval.diagnostics.report(SemanticError::IndexOutOfBounds { index, size });
        };
        top.kind = match top.kind {
            OperandKind::Temporary(_) => OperandKind::Temporary(offset),
            _ => OperandKind::Variable(offset),
        };
        top.access = Some(Access {
            dims_used: access.dims_used + 1,
            ..access
        });
    }

    /// Starts an array literal on the right of a pending assignment.
    pub fn begin_list(&mut self) {
        self.operators.push(Pending {
            op: Operator::OpenParen,
            base: self.operands.len(),
        });
        self.list_base = Some(self.operands.len());
    }

    /// Assigns the collected elements of an array literal to consecutive
    /// elements of the assignment target.
    pub fn end_list(&mut self, eval: &mut Eval) {
        self.close_paren(eval);

        let height = self.operands.len();
        let base = self.list_base.take().unwrap_or(height).min(height);
        let elements = self.operands.split_off(base);

        if matches!(self.operators.last(), Some(p) if p.op == Operator::Assign) {
            self.operators.pop();
        }
        let Some(target) = self.operands.pop() else {
            return eval.diagnostics.report(SemanticError::MissingOperand);
        };
        let Some(start) = target.offset().filter(|_| target.is_variable()) else {
            return eval.diagnostics.report(SemanticError::NotAssignable);
        };

        let element = eval.symbols.type_size(&target.ty).max(1);
        let capacity = target.size(eval.symbols) / element;
        for (index, value) in elements.iter().enumerate() {
            if index >= capacity {
                eval.diagnostics.report(SemanticError::IndexOutOfBounds {
                    index,
                    size: capacity,
                });
                break;
            }
            eval.gen.assign(start + index * element, value, element);
        }
        self.settle();
    }

    /// Once both stacks are empty no temporary is live any more.
    fn settle(&mut self) {
        if self.is_empty() {
            self.temps = 0;
        }
    }

    /// Frame offset for a result of `size` words. A result computed only
    /// from temporaries takes the lowest of their slots.
    fn result_slot(&mut self, inputs: &[Operand], size: usize, eval: &mut Eval) -> usize {
        let reuse = inputs
            .iter()
            .map(|o| match o.kind {
                OperandKind::Temporary(offset) => Some(offset),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .and_then(|slots| slots.into_iter().min());

        if let (Some(slot), 1) = (reuse, size) {
            return slot;
        }

        let offset = self.frame_base + self.temps;
        self.temps += size;
        for slot in offset..offset + size {
            eval.gen.temporary(slot);
        }
        offset
    }

    fn pop_pair(&mut self, eval: &mut Eval) -> Option<(Operand, Operand)> {
        match (self.operands.pop(), self.operands.pop()) {
            (Some(right), Some(left)) => Some((left, right)),
            _ => {
                eval.diagnostics.report(SemanticError::MissingOperand);
                None
            }
        }
    }

    fn evaluate(&mut self, pending: Pending, eval: &mut Eval) {
        trace!("evaluate {}", pending.op);
        match pending.op {
            Operator::OpenParen | Operator::Comma | Operator::CloseParen => {}
            Operator::Assign => {
                if let Some((target, value)) = self.pop_pair(eval) {
                    self.assign(&target, &value, eval);
                }
            }
            Operator::Unary(op) => {
                let Some(operand) = self.operands.pop() else {
                    return eval.diagnostics.report(SemanticError::MissingOperand);
                };
                let dest = self.result_slot(&[operand], 1, eval);
                eval.gen.unary(op, &operand, dest);
                let ty = match op {
                    super::Unary::Not => Type::Boolean,
                    super::Unary::Minus => Type::Int,
                };
                self.operands.push(Operand::temporary(dest, ty));
            }
            Operator::Arith(op) => {
                if let Some((left, right)) = self.pop_pair(eval) {
                    let dest = self.result_slot(&[left, right], 1, eval);
                    eval.gen.arithmetic(op, &left, &right, dest);
                    self.operands.push(Operand::temporary(dest, Type::Int));
                }
            }
            Operator::Relation(op) => {
                if let Some((left, right)) = self.pop_pair(eval) {
                    let dest = self.result_slot(&[left, right], 1, eval);
                    eval.gen.compare(op, &left, &right, dest);
                    self.operands.push(Operand::temporary(dest, Type::Boolean));
                }
            }
            Operator::Logic(op) => {
                if let Some((left, right)) = self.pop_pair(eval) {
                    let dest = self.result_slot(&[left, right], 1, eval);
                    eval.gen.logical(op, &left, &right, dest);
                    self.operands.push(Operand::temporary(dest, Type::Boolean));
                }
            }
            Operator::Call(function) => self.call(function, eval),
            Operator::Scan => {
                let start = pending.base.min(self.operands.len());
                for target in self.operands.split_off(start) {
                    Self::scan(&target, eval);
                }
            }
            Operator::Print => {
                let start = pending.base.min(self.operands.len());
                for value in self.operands.split_off(start) {
                    Self::print(&value, eval);
                }
            }
        }
    }

    fn assign(&mut self, target: &Operand, value: &Operand, eval: &mut Eval) {
        match target.offset().filter(|_| target.is_variable()) {
            Some(offset) => {
                let size = target.size(eval.symbols);
                eval.gen.assign(offset, value, size);
            }
            None => eval.diagnostics.report(SemanticError::NotAssignable),
        }
    }

    fn call(&mut self, function: SymbolRef, eval: &mut Eval) {
        let symbols = eval.symbols;
        let decl = &symbols[function];
        let params: Vec<SymbolRef> = decl
            .child
            .map(|table| {
                symbols
                    .rows(table)
                    .iter()
                    .filter(|s| s.category == Category::Parameter)
                    .map(|s| SymbolRef { table, row: s.id })
                    .collect()
            })
            .unwrap_or_default();

        if self.operands.len() < params.len() {
            eval.diagnostics.report(SemanticError::MissingOperand);
            self.operands.clear();
        } else {
            let start = self.operands.len() - params.len();
            let args = self.operands.split_off(start);
            for (arg, param) in args.iter().zip(&params) {
                let param = &symbols[*param];
                eval.gen.pass_parameter(arg, param.address, param.size);
            }
        }

        if decl.ty == Type::Void {
            eval.gen.call(decl.address, None);
        } else {
            let size = decl.size.max(1);
            let dest = self.result_slot(&[], size, eval);
            eval.gen.call(decl.address, Some((dest, size)));
            self.operands.push(Operand::temporary(dest, decl.ty));
        }
    }

    fn scan(target: &Operand, eval: &mut Eval) {
        let Some(offset) = target.offset().filter(|_| target.is_variable()) else {
            return eval.diagnostics.report(SemanticError::NotAssignable);
        };
        match target.ty {
            Type::Int | Type::Boolean | Type::String if target.size(eval.symbols) == 1 => {
                eval.gen.scan(target.ty, offset)
            }
            ty => eval.diagnostics.report(SemanticError::UnsupportedScan(ty)),
        }
    }

    fn print(value: &Operand, eval: &mut Eval) {
        if value.kind == OperandKind::LineBreak {
            return eval.gen.print_line_break();
        }
        match value.ty {
            Type::Int | Type::Boolean | Type::String if value.size(eval.symbols) == 1 => {
                eval.gen.print(value)
            }
            ty => eval.diagnostics.report(SemanticError::UnsupportedPrint(ty)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        codegen::{Emission, Recorder},
        expr::{Arith, Logic, Unary},
        symbol::GLOBAL,
    };

    struct Fixture {
        symbols: SymbolTables,
        rec: Recorder,
        diagnostics: Diagnostics,
        engine: ExprEngine,
    }

    impl Fixture {
        fn new() -> Self {
            let mut engine = ExprEngine::new();
            engine.reset(10);
            Self {
                symbols: SymbolTables::new(),
                rec: Recorder::new(),
                diagnostics: Diagnostics::new(),
                engine,
            }
        }

        fn variable(&mut self, name: &str, address: usize, dims: &[usize]) -> Operand {
            let r = self.symbols.add_if_absent(GLOBAL, name);
            let s = &mut self.symbols[r];
            s.category = Category::Variable;
            s.ty = Type::Int;
            s.address = address;
            s.dims = dims.to_vec();
            s.size = layout::total_size(1, dims).unwrap();
            Operand::variable(address, Type::Int, r)
        }

        fn with<T>(&mut self, f: impl FnOnce(&mut ExprEngine, &mut Eval) -> T) -> T {
            let mut eval = Eval {
                symbols: &self.symbols,
                gen: &mut self.rec,
                diagnostics: &mut self.diagnostics,
            };
            f(&mut self.engine, &mut eval)
        }

        fn ops(&self) -> Vec<Arith> {
            self.rec
                .emissions
                .iter()
                .filter_map(|e| match e {
                    Emission::Arithmetic { op, .. } => Some(*op),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn test_multiplication_before_addition() {
        // a + b * c
        let mut fx = Fixture::new();
        let (a, b, c) = (fx.variable("a", 2, &[]), fx.variable("b", 3, &[]), fx.variable("c", 4, &[]));
        fx.with(|engine, eval| {
            engine.push_operand(a);
            engine.push_operator(Operator::Arith(Arith::Add), eval);
            engine.push_operand(b);
            engine.push_operator(Operator::Arith(Arith::Mul), eval);
            engine.push_operand(c);
            engine.end_of_expression(eval);
        });

        assert_eq!(fx.ops(), vec![Arith::Mul, Arith::Add]);
        assert_eq!(
            fx.rec.emissions[1],
            Emission::Arithmetic {
                op: Arith::Mul,
                left: b,
                right: c,
                dest: 10
            }
        );
        assert_eq!(fx.engine.operands(), &[Operand::temporary(11, Type::Int)]);
    }

    #[test]
    fn test_higher_precedence_drains_on_push() {
        // a * b + c
        let mut fx = Fixture::new();
        let (a, b, c) = (fx.variable("a", 2, &[]), fx.variable("b", 3, &[]), fx.variable("c", 4, &[]));
        fx.with(|engine, eval| {
            engine.push_operand(a);
            engine.push_operator(Operator::Arith(Arith::Mul), eval);
            engine.push_operand(b);
            engine.push_operator(Operator::Arith(Arith::Add), eval);
            engine.push_operand(c);
        });
        assert_eq!(fx.ops(), vec![Arith::Mul]);
        assert_eq!(fx.engine.operators().collect::<Vec<_>>(), vec![Operator::Arith(Arith::Add)]);
    }

    #[test]
    fn test_parenthesized_group_first() {
        // (1 + 2) * 3
        let mut fx = Fixture::new();
        fx.with(|engine, eval| {
            engine.push_operator(Operator::OpenParen, eval);
            engine.push_operand(Operand::int(1));
            engine.push_operator(Operator::Arith(Arith::Add), eval);
            engine.push_operand(Operand::int(2));
            engine.close_paren(eval);
            engine.push_operator(Operator::Arith(Arith::Mul), eval);
            engine.push_operand(Operand::int(3));
            engine.end_of_expression(eval);
        });

        assert_eq!(fx.ops(), vec![Arith::Add, Arith::Mul]);
        let frame = fx.rec.simulate(12);
        assert_eq!(frame[10], 9);
    }

    #[test]
    fn test_temporaries_reuse_lowest_slot() {
        // (1 + 2) * (3 + 4)
        let mut fx = Fixture::new();
        fx.with(|engine, eval| {
            engine.push_operator(Operator::OpenParen, eval);
            engine.push_operand(Operand::int(1));
            engine.push_operator(Operator::Arith(Arith::Add), eval);
            engine.push_operand(Operand::int(2));
            engine.close_paren(eval);
            engine.push_operator(Operator::Arith(Arith::Mul), eval);
            engine.push_operator(Operator::OpenParen, eval);
            engine.push_operand(Operand::int(3));
            engine.push_operator(Operator::Arith(Arith::Add), eval);
            engine.push_operand(Operand::int(4));
            engine.close_paren(eval);
            engine.end_of_expression(eval);
        });

        assert_eq!(fx.engine.operands(), &[Operand::temporary(10, Type::Int)]);
        let slots = fx
            .rec
            .emissions
            .iter()
            .filter(|e| matches!(e, Emission::Temporary(_)))
            .count();
        assert_eq!(slots, 2);
        assert_eq!(fx.rec.simulate(12)[10], 21);

        assert!(fx.engine.pop_operand().is_some());
        assert!(fx.engine.is_empty());
    }

    #[test]
    fn test_compound_comparison() {
        let mut fx = Fixture::new();
        fx.with(|engine, eval| {
            engine.push_operand(Operand::int(1));
            engine.push_operator(Operator::Relation(Relation::Less), eval);
            engine.complete_comparison();
            engine.push_operand(Operand::int(1));
            engine.end_of_expression(eval);
        });
        assert!(matches!(
            fx.rec.emissions.last(),
            Some(Emission::Compare { op: Relation::LessEq, .. })
        ));
        assert_eq!(fx.engine.operands()[0].ty, Type::Boolean);
    }

    #[test]
    fn test_assignment_and_logic() {
        // x = not a && b
        let mut fx = Fixture::new();
        let (x, a, b) = (fx.variable("x", 2, &[]), fx.variable("a", 3, &[]), fx.variable("b", 4, &[]));
        fx.with(|engine, eval| {
            engine.push_operand(x);
            engine.push_operator(Operator::Assign, eval);
            engine.push_operator(Operator::Unary(Unary::Not), eval);
            engine.push_operand(a);
            engine.push_operator(Operator::Logic(Logic::And), eval);
            engine.push_operand(b);
            engine.end_of_expression(eval);
        });

        assert!(fx.engine.is_empty());
        assert!(matches!(fx.rec.emissions[1], Emission::Unary { op: Unary::Not, .. }));
        assert!(matches!(fx.rec.emissions[3], Emission::Logical { op: Logic::And, .. }));
        assert_eq!(
            fx.rec.emissions[4],
            Emission::Assign {
                target: 2,
                value: Operand::temporary(11, Type::Boolean),
                size: 1
            }
        );
    }

    #[test]
    fn test_print_takes_operands_since_operator() {
        let mut fx = Fixture::new();
        let a = fx.variable("a", 2, &[]);
        fx.with(|engine, eval| {
            engine.push_operator(Operator::Print, eval);
            engine.push_operator(Operator::OpenParen, eval);
            engine.push_operand(a);
            engine.comma(eval);
            engine.push_operand(Operand::line_break());
            engine.end_of_expression(eval);
        });

        assert!(fx.engine.is_empty());
        assert_eq!(fx.rec.emissions, vec![Emission::Print(a), Emission::LineBreak]);
    }

    #[test]
    fn test_index_and_field_access() {
        let mut fx = Fixture::new();
        let arr = fx.variable("arr", 2, &[3, 4]);
        fx.with(|engine, eval| {
            engine.push_operand(arr);
            engine.access_index(1, eval);
            engine.access_index(2, eval);
        });
        assert_eq!(fx.engine.operands()[0].kind, OperandKind::Variable(8));
        assert_eq!(fx.engine.operands()[0].size(&fx.symbols), 1);

        fx.with(|engine, eval| engine.access_index(0, eval));
        assert_eq!(fx.diagnostics.warnings()[0].error, SemanticError::TooManyIndices);

        fx.with(|engine, eval| engine.access_field(&SmolStr::from("x"), eval));
        assert_eq!(fx.diagnostics.warnings()[1].error, SemanticError::NotAStruct);
    }

    #[test]
    fn test_index_out_of_bounds_keeps_first_element() {
        let mut fx = Fixture::new();
        let arr = fx.variable("arr", 2, &[2, 3]);
        fx.with(|engine, eval| {
            engine.push_operand(arr);
            engine.access_index(usize::MAX, eval);
            engine.access_index(2, eval);
        });

        assert_eq!(
            fx.diagnostics.warnings()[0].error,
            SemanticError::IndexOutOfBounds {
                index: usize::MAX,
                size: 2
            }
        );
        assert_eq!(fx.diagnostics.warnings().len(), 1);
        assert_eq!(fx.engine.operands()[0].kind, OperandKind::Variable(4));
    }

    #[test]
    fn test_missing_operand_is_reported() {
        let mut fx = Fixture::new();
        fx.with(|engine, eval| {
            engine.push_operand(Operand::int(1));
            engine.push_operator(Operator::Arith(Arith::Sub), eval);
            engine.end_of_expression(eval);
        });
        assert_eq!(fx.diagnostics.warnings()[0].error, SemanticError::MissingOperand);
    }

    #[test]
    fn test_array_literal() {
        let mut fx = Fixture::new();
        let arr = fx.variable("arr", 2, &[2, 2]);
        fx.with(|engine, eval| {
            engine.push_operand(arr);
            engine.push_operator(Operator::Assign, eval);
            engine.begin_list();
            engine.push_operand(Operand::int(1));
            engine.comma(eval);
            engine.push_operand(Operand::int(2));
            engine.comma(eval);
            engine.push_operand(Operand::int(3));
            engine.end_list(eval);
            engine.end_of_expression(eval);
        });

        assert!(fx.engine.is_empty());
        let targets: Vec<usize> = fx
            .rec
            .emissions
            .iter()
            .filter_map(|e| match e {
                Emission::Assign { target, .. } => Some(*target),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec![2, 3, 4]);
    }
}
