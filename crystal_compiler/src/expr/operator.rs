use crate::symbol::SymbolRef;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unary {
    Not,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arith {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Assign,
    OpenParen,
    Comma,
    CloseParen,
    /// Call of the function declared at the row.
    Call(SymbolRef),
    Scan,
    Print,
    Unary(Unary),
    Arith(Arith),
    Relation(Relation),
    Logic(Logic),
}

impl Operator {
    #[rustfmt::skip]
    pub fn precedence(&self) -> i32 {
        use Operator as O;
        match self {
            O::Assign | O::OpenParen              => i32::MAX,
            O::Call(_) | O::Scan | O::Print       => 10,
            O::Unary(_)                           => 9,
            O::Arith(Arith::Mod)                  => 8,
            O::Arith(Arith::Div)                  => 7,
            O::Arith(Arith::Mul)                  => 6,
            O::Arith(Arith::Add | Arith::Sub)     => 5,
            O::Relation(Relation::Equal)
            | O::Relation(Relation::NotEqual)     => 3,
            O::Relation(_)                        => 4,
            O::Logic(Logic::And)                  => 2,
            O::Logic(Logic::Or)                   => 1,
            O::Comma                              => 0,
            O::CloseParen                         => -1,
        }
    }

    /// Operators that bound a sub-expression on the operator stack.
    ///
    /// Draining for precedence stops at these.
    #[inline]
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Operator::OpenParen | Operator::Comma | Operator::Assign)
    }
}

impl fmt::Display for Operator {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Operator as O;
        match self {
            O::Assign                       => write!(f, "="),
            O::OpenParen                    => write!(f, "("),
            O::Comma                        => write!(f, ","),
            O::CloseParen                   => write!(f, ")"),
            O::Call(r)                      => write!(f, "call {}:{}", r.table, r.row),
            O::Scan                         => write!(f, "scan"),
            O::Print                        => write!(f, "print"),
            O::Unary(Unary::Not)            => write!(f, "not"),
            O::Unary(Unary::Minus)          => write!(f, "neg"),
            O::Arith(Arith::Add)            => write!(f, "+"),
            O::Arith(Arith::Sub)            => write!(f, "-"),
            O::Arith(Arith::Mul)            => write!(f, "*"),
            O::Arith(Arith::Div)            => write!(f, "/"),
            O::Arith(Arith::Mod)            => write!(f, "%"),
            O::Relation(Relation::Less)     => write!(f, "<"),
            O::Relation(Relation::LessEq)   => write!(f, "<="),
            O::Relation(Relation::Greater)  => write!(f, ">"),
            O::Relation(Relation::GreaterEq)=> write!(f, ">="),
            O::Relation(Relation::Equal)    => write!(f, "=="),
            O::Relation(Relation::NotEqual) => write!(f, "!="),
            O::Logic(Logic::And)            => write!(f, "&&"),
            O::Logic(Logic::Or)             => write!(f, "||"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_precedence_order() {
        use Operator as O;
        let ordered = [
            O::Scan,
            O::Unary(Unary::Minus),
            O::Arith(Arith::Mod),
            O::Arith(Arith::Div),
            O::Arith(Arith::Mul),
            O::Arith(Arith::Add),
            O::Relation(Relation::LessEq),
            O::Relation(Relation::NotEqual),
            O::Logic(Logic::And),
            O::Logic(Logic::Or),
            O::Comma,
            O::CloseParen,
        ];
        for pair in ordered.windows(2) {
            assert!(
                pair[0].precedence() > pair[1].precedence(),
                "{} should bind tighter than {}",
                pair[0],
                pair[1]
            );
        }
        assert_eq!(O::Assign.precedence(), i32::MAX);
        assert_eq!(O::Arith(Arith::Sub).precedence(), 5);
        assert_eq!(O::Relation(Relation::Greater).precedence(), 4);
    }

    #[test]
    fn test_sentinels() {
        assert!(Operator::OpenParen.is_sentinel());
        assert!(Operator::Comma.is_sentinel());
        assert!(Operator::Assign.is_sentinel());
        assert!(!Operator::Print.is_sentinel());
        assert!(!Operator::CloseParen.is_sentinel());
    }
}
