//! Nested, scoped symbol tables.
//!
//! Tables live in an arena and refer to each other by index. Table `0` is
//! the global scope and has no parent.
use crate::tokens::Reserved;
use smol_str::SmolStr;
use std::{
    collections::BTreeMap,
    fmt,
    ops::{Index, IndexMut},
};

/// Identifier of the global table.
pub const GLOBAL: usize = 0;

/// Reference to a row, by table id and ordinal within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolRef {
    pub table: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Mentioned, but not declared yet.
    Undefined,
    Function,
    Parameter,
    Variable,
    Struct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Void,
    Int,
    Float,
    Boolean,
    Char,
    String,
    /// Instance of the struct declared at the given row.
    Struct(SymbolRef),
}

impl Type {
    /// Primitive type named by a reserved word.
    #[rustfmt::skip]
    pub fn from_reserved(word: Reserved) -> Option<Type> {
        match word {
            Reserved::Void    => Some(Type::Void),
            Reserved::Int     => Some(Type::Int),
            Reserved::Float   => Some(Type::Float),
            Reserved::Boolean => Some(Type::Boolean),
            Reserved::Char    => Some(Type::Char),
            Reserved::String  => Some(Type::String),
            _                 => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Boolean => write!(f, "boolean"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "string"),
            Type::Struct(r) => write!(f, "struct#{}:{}", r.table, r.row),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    /// Ordinal within the owning table.
    pub id: usize,
    pub name: SmolStr,
    pub category: Category,
    pub ty: Type,
    /// Owning table.
    pub table: usize,
    /// Scope opened by a function or struct declaration.
    pub child: Option<usize>,
    /// Offset in the activation record for variables and parameters,
    /// offset in the instance for struct fields, and the routine index
    /// for functions.
    pub address: usize,
    /// Size in words. For functions this is the size of the return value.
    pub size: usize,
    /// Declared dimension sizes, outermost first.
    pub dims: Vec<usize>,
    /// Number of parameters of a function.
    pub params: usize,
}

impl Symbol {
    fn new(id: usize, table: usize, name: SmolStr) -> Self {
        Self {
            id,
            name,
            category: Category::Undefined,
            ty: Type::Void,
            table,
            child: None,
            address: 0,
            size: 0,
            dims: vec![],
            params: 0,
        }
    }

    #[inline]
    pub fn is_defined(&self) -> bool {
        self.category != Category::Undefined
    }
}

pub struct SymbolTable {
    pub id: usize,
    parent: Option<usize>,
    rows: Vec<Symbol>,
    index: BTreeMap<SmolStr, usize>,
}

impl SymbolTable {
    fn new(id: usize, parent: Option<usize>) -> Self {
        Self {
            id,
            parent,
            rows: vec![],
            index: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    pub fn rows(&self) -> &[Symbol] {
        &self.rows
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|row| &self.rows[*row])
    }
}

/// Arena of symbol tables.
pub struct SymbolTables {
    tables: Vec<SymbolTable>,
}

impl SymbolTables {
    /// Creates the arena with an empty global table.
    pub fn new() -> Self {
        Self {
            tables: vec![SymbolTable::new(GLOBAL, None)],
        }
    }

    pub fn create_table(&mut self, parent: Option<usize>) -> usize {
        let id = self.tables.len();
        self.tables.push(SymbolTable::new(id, parent));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    #[inline]
    pub fn parent(&self, table: usize) -> Option<usize> {
        self.tables.get(table).and_then(|t| t.parent)
    }

    pub fn set_parent(&mut self, table: usize, parent: Option<usize>) {
        if let Some(t) = self.tables.get_mut(table) {
            t.parent = parent;
        }
    }

    /// Adds an undefined row for `name` unless the table already has one.
    ///
    /// Deduplication is local to the table, so the same name may have
    /// rows in several scopes.
    pub fn add_if_absent(&mut self, table: usize, name: &str) -> SymbolRef {
        let t = &mut self.tables[table];
        if let Some(row) = t.index.get(name) {
            return SymbolRef { table, row: *row };
        }

        let row = t.rows.len();
        let name = SmolStr::from(name);
        t.rows.push(Symbol::new(row, table, name.clone()));
        t.index.insert(name, row);
        SymbolRef { table, row }
    }

    #[inline]
    pub fn get(&self, symbol: SymbolRef) -> Option<&Symbol> {
        self.tables.get(symbol.table)?.rows.get(symbol.row)
    }

    /// Row of a table by ordinal.
    #[inline]
    pub fn by_index(&self, table: usize, row: usize) -> Option<&Symbol> {
        self.get(SymbolRef { table, row })
    }

    /// Rows of a table in declaration order.
    pub fn rows(&self, table: usize) -> &[Symbol] {
        self.tables.get(table).map(|t| t.rows()).unwrap_or_default()
    }

    /// Row for `name` in `table` only.
    pub fn find_local(&self, table: usize, name: &str) -> Option<SymbolRef> {
        let row = *self.tables.get(table)?.index.get(name)?;
        Some(SymbolRef { table, row })
    }

    /// Searches the table and then its ancestors, returning the first row
    /// with the name whether it is declared or not.
    pub fn lookup(&self, table: usize, name: &str) -> Option<SymbolRef> {
        let mut current = Some(table);
        while let Some(id) = current {
            if let Some(found) = self.find_local(id, name) {
                return Some(found);
            }
            current = self.parent(id);
        }
        None
    }

    /// Like [`lookup`](Self::lookup), but skips rows that were only
    /// mentioned and never declared.
    pub fn resolve(&self, table: usize, name: &str) -> Option<SymbolRef> {
        let mut current = Some(table);
        while let Some(id) = current {
            if let Some(found) = self.find_local(id, name) {
                if self[found].is_defined() {
                    return Some(found);
                }
            }
            current = self.parent(id);
        }
        None
    }

    /// Size in words of one value of the type.
    pub fn type_size(&self, ty: &Type) -> usize {
        match ty {
            Type::Void => 0,
            Type::Struct(r) => self.get(*r).map(|s| s.size).unwrap_or(0),
            _ => 1,
        }
    }
}

impl Default for SymbolTables {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<SymbolRef> for SymbolTables {
    type Output = Symbol;

    fn index(&self, symbol: SymbolRef) -> &Symbol {
        &self.tables[symbol.table].rows[symbol.row]
    }
}

impl IndexMut<SymbolRef> for SymbolTables {
    fn index_mut(&mut self, symbol: SymbolRef) -> &mut Symbol {
        &mut self.tables[symbol.table].rows[symbol.row]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_add_if_absent_dedups_per_table() {
        let mut symbols = SymbolTables::new();
        let a = symbols.add_if_absent(GLOBAL, "a");
        let b = symbols.add_if_absent(GLOBAL, "b");
        assert_eq!(symbols.add_if_absent(GLOBAL, "a"), a);
        assert_eq!(a.row, 0);
        assert_eq!(b.row, 1);
        assert_eq!(symbols[a].category, Category::Undefined);

        let local = symbols.create_table(Some(GLOBAL));
        let inner = symbols.add_if_absent(local, "a");
        assert_ne!(inner, a);
        assert_eq!(inner, SymbolRef { table: local, row: 0 });
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut symbols = SymbolTables::new();
        let outer = symbols.add_if_absent(GLOBAL, "x");
        let func = symbols.create_table(Some(GLOBAL));
        let block = symbols.create_table(Some(func));

        assert_eq!(symbols.lookup(block, "x"), Some(outer));
        assert_eq!(symbols.lookup(block, "y"), None);
        assert_eq!(symbols.lookup(GLOBAL, "y"), None);
        assert_eq!(symbols.parent(block), Some(func));
        assert_eq!(symbols.parent(GLOBAL), None);

        symbols.set_parent(block, Some(GLOBAL));
        assert_eq!(symbols.parent(block), Some(GLOBAL));
    }

    #[test]
    fn test_resolve_skips_mentions() {
        let mut symbols = SymbolTables::new();
        let f = symbols.add_if_absent(GLOBAL, "f");
        symbols[f].category = Category::Function;

        let body = symbols.create_table(Some(GLOBAL));
        let mention = symbols.add_if_absent(body, "f");

        assert_eq!(symbols.lookup(body, "f"), Some(mention));
        assert_eq!(symbols.resolve(body, "f"), Some(f));

        symbols.add_if_absent(body, "ghost");
        assert_eq!(symbols.resolve(body, "ghost"), None);
    }

    #[test]
    fn test_by_index_bounds() {
        let mut symbols = SymbolTables::new();
        symbols.add_if_absent(GLOBAL, "a");
        assert_eq!(symbols.by_index(GLOBAL, 0).map(|s| s.name.as_str()), Some("a"));
        assert!(symbols.by_index(GLOBAL, 1).is_none());
        assert!(symbols.by_index(7, 0).is_none());
    }

    #[test]
    fn test_type_size() {
        let mut symbols = SymbolTables::new();
        let p = symbols.add_if_absent(GLOBAL, "P");
        symbols[p].category = Category::Struct;
        symbols[p].size = 3;

        assert_eq!(symbols.type_size(&Type::Int), 1);
        assert_eq!(symbols.type_size(&Type::Void), 0);
        assert_eq!(symbols.type_size(&Type::Struct(p)), 3);
    }
}
