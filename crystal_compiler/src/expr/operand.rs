use crate::{
    codegen::StrId,
    layout,
    symbol::{SymbolRef, SymbolTables, Type},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Declared variable, by offset in the activation record.
    Variable(usize),
    /// Intermediate result, by offset in the activation record.
    Temporary(usize),
    Int(i64),
    Char(char),
    Bool(bool),
    /// Interned string literal.
    Str(StrId),
    /// The `"\n"` literal in a print list.
    LineBreak,
}

/// How much of a variable's declared shape has been consumed by
/// field and index accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    /// Declaration that describes the shape. Changes to the field's
    /// row when a field is accessed.
    pub symbol: SymbolRef,
    /// Number of leading dimensions already indexed.
    pub dims_used: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub kind: OperandKind,
    pub ty: Type,
    pub access: Option<Access>,
}

impl Operand {
    #[inline]
    pub fn int(value: i64) -> Self {
        Self::literal(OperandKind::Int(value), Type::Int)
    }

    #[inline]
    pub fn boolean(value: bool) -> Self {
        Self::literal(OperandKind::Bool(value), Type::Boolean)
    }

    #[inline]
    pub fn char(value: char) -> Self {
        Self::literal(OperandKind::Char(value), Type::Char)
    }

    #[inline]
    pub fn string(id: StrId) -> Self {
        Self::literal(OperandKind::Str(id), Type::String)
    }

    #[inline]
    pub fn line_break() -> Self {
        Self::literal(OperandKind::LineBreak, Type::String)
    }

    #[inline]
    pub fn temporary(offset: usize, ty: Type) -> Self {
        Self::literal(OperandKind::Temporary(offset), ty)
    }

    /// Reference to a declared variable or parameter.
    #[inline]
    pub fn variable(offset: usize, ty: Type, symbol: SymbolRef) -> Self {
        Self {
            kind: OperandKind::Variable(offset),
            ty,
            access: Some(Access { symbol, dims_used: 0 }),
        }
    }

    #[inline]
    fn literal(kind: OperandKind, ty: Type) -> Self {
        Self { kind, ty, access: None }
    }

    /// Frame offset for operands that live in the activation record.
    #[inline]
    pub fn offset(&self) -> Option<usize> {
        match self.kind {
            OperandKind::Variable(offset) | OperandKind::Temporary(offset) => Some(offset),
            _ => None,
        }
    }

    #[inline]
    pub fn is_temporary(&self) -> bool {
        matches!(self.kind, OperandKind::Temporary(_))
    }

    #[inline]
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, OperandKind::Variable(_))
    }

    /// Dimensions that have not been indexed yet.
    pub fn remaining_dims<'a>(&self, symbols: &'a SymbolTables) -> &'a [usize] {
        match self.access {
            Some(access) => symbols
                .get(access.symbol)
                .and_then(|s| s.dims.get(access.dims_used..))
                .unwrap_or_default(),
            None => &[],
        }
    }

    /// Size in words of the value the operand refers to.
    pub fn size(&self, symbols: &SymbolTables) -> usize {
        let element = symbols.type_size(&self.ty).max(1);
        layout::total_size(element, self.remaining_dims(symbols)).unwrap_or(element)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::symbol::{Category, GLOBAL};

    #[test]
    fn test_size_follows_indexing() {
        let mut symbols = SymbolTables::new();
        let arr = symbols.add_if_absent(GLOBAL, "arr");
        symbols[arr].category = Category::Variable;
        symbols[arr].ty = Type::Int;
        symbols[arr].dims = vec![3, 4];

        let mut operand = Operand::variable(2, Type::Int, arr);
        assert_eq!(operand.size(&symbols), 12);
        assert_eq!(operand.remaining_dims(&symbols), &[3, 4]);

        operand.access = Some(Access { symbol: arr, dims_used: 1 });
        assert_eq!(operand.size(&symbols), 4);

        operand.access = Some(Access { symbol: arr, dims_used: 2 });
        assert_eq!(operand.size(&symbols), 1);
    }

    #[test]
    fn test_literals() {
        assert_eq!(Operand::int(4).offset(), None);
        assert_eq!(Operand::temporary(5, Type::Int).offset(), Some(5));
        assert!(Operand::temporary(5, Type::Int).is_temporary());
        assert_eq!(Operand::line_break().ty, Type::String);
        assert_eq!(Operand::int(1).size(&SymbolTables::new()), 1);
    }
}
