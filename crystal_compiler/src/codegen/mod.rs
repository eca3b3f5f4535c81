//! Code generation seam.
//!
//! The semantic layer drives a [`CodeGen`] with already resolved frame
//! offsets, sizes and labels. Implementations decide how each request is
//! rendered.
mod mvn;
mod record;

pub use self::{
    mvn::{Arg, Instr, Mvn, MvnConf, Op},
    record::{Emission, Recorder},
};

use crate::{
    expr::{Arith, Logic, Operand, Relation, Unary},
    symbol::Type,
};
use std::fmt;

/// Jump target allocated by the semantic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub usize);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "l{:04}", self.0)
    }
}

/// Handle to an interned string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrId(pub usize);

pub trait CodeGen {
    /// Start of a function body. `index` is the function's routine number
    /// and `frame` the size of its parameters and locals, header included.
    fn begin_function(&mut self, index: usize, name: &str, frame: usize);
    fn end_function(&mut self, index: usize);
    fn begin_main(&mut self, frame: usize);
    fn end_main(&mut self);

    /// Reserve the frame slot at `offset` for an intermediate result.
    fn temporary(&mut self, offset: usize);

    /// Copy `size` words of `value` to the frame offset `target`.
    fn assign(&mut self, target: usize, value: &Operand, size: usize);
    fn arithmetic(&mut self, op: Arith, left: &Operand, right: &Operand, dest: usize);
    /// Store `1` in `dest` when the relation holds, `0` otherwise.
    fn compare(&mut self, op: Relation, left: &Operand, right: &Operand, dest: usize);
    fn logical(&mut self, op: Logic, left: &Operand, right: &Operand, dest: usize);
    fn unary(&mut self, op: Unary, operand: &Operand, dest: usize);

    fn label(&mut self, label: Label);
    fn jump(&mut self, label: Label);
    fn jump_if_false(&mut self, condition: &Operand, label: Label);

    /// Write an argument into the parameter slot `address` of the
    /// activation record about to be pushed.
    fn pass_parameter(&mut self, value: &Operand, address: usize, size: usize);
    /// Call a function, storing `size` words of its result at `dest`.
    fn call(&mut self, index: usize, result: Option<(usize, usize)>);
    /// Leave the current routine, optionally with a value of the given size.
    fn function_return(&mut self, value: Option<(&Operand, usize)>);

    fn scan(&mut self, ty: Type, target: usize);
    fn print(&mut self, value: &Operand);
    fn print_line_break(&mut self);
    fn intern_string(&mut self, text: &str) -> StrId;
}

impl<G: CodeGen + ?Sized> CodeGen for &mut G {
    fn begin_function(&mut self, index: usize, name: &str, frame: usize) {
        (**self).begin_function(index, name, frame)
    }

    fn end_function(&mut self, index: usize) {
        (**self).end_function(index)
    }

    fn begin_main(&mut self, frame: usize) {
        (**self).begin_main(frame)
    }

    fn end_main(&mut self) {
        (**self).end_main()
    }

    fn temporary(&mut self, offset: usize) {
        (**self).temporary(offset)
    }

    fn assign(&mut self, target: usize, value: &Operand, size: usize) {
        (**self).assign(target, value, size)
    }

    fn arithmetic(&mut self, op: Arith, left: &Operand, right: &Operand, dest: usize) {
        (**self).arithmetic(op, left, right, dest)
    }

    fn compare(&mut self, op: Relation, left: &Operand, right: &Operand, dest: usize) {
        (**self).compare(op, left, right, dest)
    }

    fn logical(&mut self, op: Logic, left: &Operand, right: &Operand, dest: usize) {
        (**self).logical(op, left, right, dest)
    }

    fn unary(&mut self, op: Unary, operand: &Operand, dest: usize) {
        (**self).unary(op, operand, dest)
    }

    fn label(&mut self, label: Label) {
        (**self).label(label)
    }

    fn jump(&mut self, label: Label) {
        (**self).jump(label)
    }

    fn jump_if_false(&mut self, condition: &Operand, label: Label) {
        (**self).jump_if_false(condition, label)
    }

    fn pass_parameter(&mut self, value: &Operand, address: usize, size: usize) {
        (**self).pass_parameter(value, address, size)
    }

    fn call(&mut self, index: usize, result: Option<(usize, usize)>) {
        (**self).call(index, result)
    }

    fn function_return(&mut self, value: Option<(&Operand, usize)>) {
        (**self).function_return(value)
    }

    fn scan(&mut self, ty: Type, target: usize) {
        (**self).scan(ty, target)
    }

    fn print(&mut self, value: &Operand) {
        (**self).print(value)
    }

    fn print_line_break(&mut self) {
        (**self).print_line_break()
    }

    fn intern_string(&mut self, text: &str) -> StrId {
        (**self).intern_string(text)
    }
}
