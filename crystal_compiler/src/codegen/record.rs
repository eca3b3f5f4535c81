use super::{CodeGen, Label, StrId};
use crate::{
    expr::{Arith, Logic, Operand, OperandKind, Relation, Unary},
    symbol::Type,
};
use smol_str::SmolStr;

/// A single code generation request, as received.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    BeginFunction { index: usize, name: SmolStr, frame: usize },
    EndFunction { index: usize },
    BeginMain { frame: usize },
    EndMain,
    Temporary(usize),
    Assign { target: usize, value: Operand, size: usize },
    Arithmetic { op: Arith, left: Operand, right: Operand, dest: usize },
    Compare { op: Relation, left: Operand, right: Operand, dest: usize },
    Logical { op: Logic, left: Operand, right: Operand, dest: usize },
    Unary { op: Unary, operand: Operand, dest: usize },
    Label(Label),
    Jump(Label),
    JumpIfFalse { condition: Operand, label: Label },
    PassParameter { value: Operand, address: usize, size: usize },
    Call { index: usize, result: Option<(usize, usize)> },
    Return { value: Option<(Operand, usize)> },
    Scan { ty: Type, target: usize },
    Print(Operand),
    LineBreak,
    Intern { text: SmolStr, id: StrId },
}

/// Code generator that keeps the requests instead of rendering them.
///
/// Used to inspect what the compiler asked for, and to evaluate
/// straight-line code without a virtual machine.
#[derive(Debug, Default)]
pub struct Recorder {
    pub emissions: Vec<Emission>,
    strings: Vec<SmolStr>,
}

impl Recorder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of an interned string.
    pub fn string(&self, id: StrId) -> Option<&str> {
        self.strings.get(id.0).map(SmolStr::as_str)
    }

    /// Runs the recorded straight-line arithmetic, assignments and
    /// comparisons over a zeroed frame of `size` words.
    ///
    /// Jumps, calls and I/O are ignored.
    pub fn simulate(&self, size: usize) -> Vec<i64> {
        let mut frame = vec![0_i64; size];

        fn value(frame: &[i64], operand: &Operand) -> i64 {
            match operand.kind {
                OperandKind::Variable(offset) | OperandKind::Temporary(offset) => {
                    frame.get(offset).copied().unwrap_or_default()
                }
                OperandKind::Int(value) => value,
                OperandKind::Char(c) => c as i64,
                OperandKind::Bool(b) => b as i64,
                OperandKind::Str(id) => id.0 as i64,
                OperandKind::LineBreak => 0,
            }
        }

        for emission in &self.emissions {
            let (dest, result) = match emission {
                Emission::Assign { target, value: v, .. } => (*target, value(&frame, v)),
                Emission::Arithmetic { op, left, right, dest } => {
                    let (a, b) = (value(&frame, left), value(&frame, right));
                    let result = match op {
                        Arith::Add => a + b,
                        Arith::Sub => a - b,
                        Arith::Mul => a * b,
                        Arith::Div => a.checked_div(b).unwrap_or_default(),
                        Arith::Mod => a.checked_rem(b).unwrap_or_default(),
                    };
                    (*dest, result)
                }
                Emission::Compare { op, left, right, dest } => {
                    let (a, b) = (value(&frame, left), value(&frame, right));
                    let holds = match op {
                        Relation::Less => a < b,
                        Relation::LessEq => a <= b,
                        Relation::Greater => a > b,
                        Relation::GreaterEq => a >= b,
                        Relation::Equal => a == b,
                        Relation::NotEqual => a != b,
                    };
                    (*dest, holds as i64)
                }
                Emission::Logical { op, left, right, dest } => {
                    let (a, b) = (value(&frame, left) != 0, value(&frame, right) != 0);
                    let result = match op {
                        Logic::And => a && b,
                        Logic::Or => a || b,
                    };
                    (*dest, result as i64)
                }
                Emission::Unary { op, operand, dest } => {
                    let a = value(&frame, operand);
                    let result = match op {
                        Unary::Not => (a == 0) as i64,
                        Unary::Minus => -a,
                    };
                    (*dest, result)
                }
                _ => continue,
            };

            if let Some(slot) = frame.get_mut(dest) {
                *slot = result;
            }
        }

        frame
    }
}

impl CodeGen for Recorder {
    fn begin_function(&mut self, index: usize, name: &str, frame: usize) {
        self.emissions.push(Emission::BeginFunction {
            index,
            name: SmolStr::from(name),
            frame,
        });
    }

    fn end_function(&mut self, index: usize) {
        self.emissions.push(Emission::EndFunction { index });
    }

    fn begin_main(&mut self, frame: usize) {
        self.emissions.push(Emission::BeginMain { frame });
    }

    fn end_main(&mut self) {
        self.emissions.push(Emission::EndMain);
    }

    fn temporary(&mut self, offset: usize) {
        self.emissions.push(Emission::Temporary(offset));
    }

    fn assign(&mut self, target: usize, value: &Operand, size: usize) {
        self.emissions.push(Emission::Assign {
            target,
            value: *value,
            size,
        });
    }

    fn arithmetic(&mut self, op: Arith, left: &Operand, right: &Operand, dest: usize) {
        self.emissions.push(Emission::Arithmetic {
            op,
            left: *left,
            right: *right,
            dest,
        });
    }

    fn compare(&mut self, op: Relation, left: &Operand, right: &Operand, dest: usize) {
        self.emissions.push(Emission::Compare {
            op,
            left: *left,
            right: *right,
            dest,
        });
    }

    fn logical(&mut self, op: Logic, left: &Operand, right: &Operand, dest: usize) {
        self.emissions.push(Emission::Logical {
            op,
            left: *left,
            right: *right,
            dest,
        });
    }

    fn unary(&mut self, op: Unary, operand: &Operand, dest: usize) {
        self.emissions.push(Emission::Unary {
            op,
            operand: *operand,
            dest,
        });
    }

    fn label(&mut self, label: Label) {
        self.emissions.push(Emission::Label(label));
    }

    fn jump(&mut self, label: Label) {
        self.emissions.push(Emission::Jump(label));
    }

    fn jump_if_false(&mut self, condition: &Operand, label: Label) {
        self.emissions.push(Emission::JumpIfFalse {
            condition: *condition,
            label,
        });
    }

    fn pass_parameter(&mut self, value: &Operand, address: usize, size: usize) {
        self.emissions.push(Emission::PassParameter {
            value: *value,
            address,
            size,
        });
    }

    fn call(&mut self, index: usize, result: Option<(usize, usize)>) {
        self.emissions.push(Emission::Call { index, result });
    }

    fn function_return(&mut self, value: Option<(&Operand, usize)>) {
        self.emissions.push(Emission::Return {
            value: value.map(|(operand, size)| (*operand, size)),
        });
    }

    fn scan(&mut self, ty: Type, target: usize) {
        self.emissions.push(Emission::Scan { ty, target });
    }

    fn print(&mut self, value: &Operand) {
        self.emissions.push(Emission::Print(*value));
    }

    fn print_line_break(&mut self) {
        self.emissions.push(Emission::LineBreak);
    }

    fn intern_string(&mut self, text: &str) -> StrId {
        let id = StrId(self.strings.len());
        let text = SmolStr::from(text);
        self.strings.push(text.clone());
        self.emissions.push(Emission::Intern { text, id });
        id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_simulate_straight_line() {
        let mut rec = Recorder::new();
        rec.arithmetic(Arith::Add, &Operand::int(1), &Operand::int(2), 3);
        rec.arithmetic(Arith::Mul, &Operand::temporary(3, Type::Int), &Operand::int(3), 3);
        rec.compare(Relation::Greater, &Operand::temporary(3, Type::Int), &Operand::int(8), 4);
        rec.jump(Label(0));
        rec.assign(2, &Operand::temporary(3, Type::Int), 1);

        let frame = rec.simulate(5);
        assert_eq!(frame, vec![0, 0, 9, 9, 1]);
    }

    #[test]
    fn test_intern() {
        let mut rec = Recorder::new();
        let a = rec.intern_string("hello");
        let b = rec.intern_string("world");
        assert_ne!(a, b);
        assert_eq!(rec.string(b), Some("world"));
        assert_eq!(rec.string(StrId(9)), None);
    }
}
