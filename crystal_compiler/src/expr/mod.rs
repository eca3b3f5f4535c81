//! Expression evaluation with an operand stack and an operator stack.
mod engine;
mod operand;
mod operator;

pub use self::{
    engine::{Eval, ExprEngine},
    operand::{Access, Operand, OperandKind},
    operator::{Arith, Logic, Operator, Relation, Unary},
};
