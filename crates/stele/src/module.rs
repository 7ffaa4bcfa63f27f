//! Module-level declarations and the [`Module`] container.
//!
//! A module is built incrementally by one builder, then treated as
//! read-only by the renderer and any later compiler stage. Dropping the
//! module releases everything at once, including the arena backing all
//! of its expression trees.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;

use anyhow::{bail, ensure, Result};

use crate::arena::{ExprArena, ExprId};
use crate::expr::Expr;
use crate::types::{BasicType, Var};

/// A named function signature.
///
/// Equality is nominal: the name participates, so two signatures with
/// identical result and parameter types but different names are not
/// equal.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub name: String,
    pub result: BasicType,
    /// Parameter types, in declaration order.
    pub params: Vec<BasicType>,
}

/// A function definition. Owned by its [`Module`]; `body` is the root
/// of one expression tree in the module's arena.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub result: BasicType,
    /// Named parameter slots, in declaration order.
    pub params: Vec<(String, BasicType)>,
    /// Named local slots, after the parameters.
    pub locals: Vec<(String, BasicType)>,
    pub body: ExprId,
}

/// An imported function, addressed as `module.base` and bound locally
/// as `name`.
#[derive(Debug, Clone)]
pub struct Import {
    /// The module-local alias. Unique within a module.
    pub name: String,
    pub module: String,
    pub base: String,
    pub ty: FunctionType,
}

/// An exported entity. `value` references the exported function.
#[derive(Debug, Clone)]
pub struct Export {
    pub name: String,
    pub value: Var,
}

/// The indirect-call table: the entry index is the call-site selector.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub entries: Vec<Var>,
}

/// What a bound identifier denotes, as an index into the owning
/// module's declaration lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Type(usize),
    Import(usize),
    Function(usize),
}

/// A complete module: all declarations plus the arena owning every
/// expression node.
///
/// Declarations of every kind render and enumerate in insertion order;
/// imports additionally get a name-keyed uniqueness index for lookup.
#[derive(Debug)]
pub struct Module {
    arena: ExprArena,
    function_types: Vec<FunctionType>,
    imports: Vec<Import>,
    import_index: HashMap<String, usize>,
    exports: Vec<Export>,
    table: Table,
    functions: Vec<Function>,

    // internals
    /// Identifier map: which entity a bound `Var` denotes.
    entities: HashMap<Var, Entity>,
    /// Next numeric identifier to mint. Starts at 1; 0 is the absent Var.
    next_var: u32,
}

impl Module {
    pub fn new() -> Self {
        Module {
            arena: ExprArena::new(),
            function_types: Vec::new(),
            imports: Vec::new(),
            import_index: HashMap::new(),
            exports: Vec::new(),
            table: Table::default(),
            functions: Vec::new(),
            entities: HashMap::new(),
            next_var: 1,
        }
    }

    // ─── Construction interface ────────────────────────────────────────────

    /// Allocate an expression node in this module's arena.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.arena.alloc(expr)
    }

    /// Append a function type and return its index.
    pub fn add_function_type(&mut self, ty: FunctionType) -> usize {
        let idx = self.function_types.len();
        self.function_types.push(ty);
        idx
    }

    /// Insert an import. Import names are unique within a module;
    /// a duplicate name is rejected, not silently dropped.
    pub fn add_import(&mut self, import: Import) -> Result<usize> {
        if self.import_index.contains_key(&import.name) {
            bail!("duplicate import name: {}", import.name);
        }
        let idx = self.imports.len();
        self.import_index.insert(import.name.clone(), idx);
        self.imports.push(import);
        Ok(idx)
    }

    /// Append an export and return its index.
    pub fn add_export(&mut self, export: Export) -> usize {
        let idx = self.exports.len();
        self.exports.push(export);
        idx
    }

    /// Append a function and return its index.
    pub fn add_function(&mut self, function: Function) -> usize {
        let idx = self.functions.len();
        self.functions.push(function);
        idx
    }

    /// Append an entry to the indirect-call table. The entry must
    /// reference something; `Var::None` is rejected.
    pub fn push_table_entry(&mut self, var: Var) -> Result<usize> {
        ensure!(var.is_set(), "table entries must reference a function");
        let idx = self.table.entries.len();
        self.table.entries.push(var);
        Ok(idx)
    }

    /// Bind an identifier to the entity it denotes. Rebinding an
    /// already-bound identifier is rejected.
    pub fn bind(&mut self, var: Var, entity: Entity) -> Result<()> {
        ensure!(var.is_set(), "cannot bind the absent Var");
        if self.entities.contains_key(&var) {
            bail!("identifier {} is already bound", var);
        }
        self.entities.insert(var, entity);
        Ok(())
    }

    /// Mint a fresh numeric identifier. Monotonic within a module,
    /// starting at 1.
    pub fn fresh_var(&mut self) -> Var {
        let id = self.next_var;
        self.next_var += 1;
        match NonZeroU32::new(id) {
            Some(n) => Var::Index(n),
            None => unreachable!("the fresh-var counter starts at 1"),
        }
    }

    // ─── Query interface ───────────────────────────────────────────────────

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut ExprArena {
        &mut self.arena
    }

    /// Function types, in insertion order.
    pub fn function_types(&self) -> &[FunctionType] {
        &self.function_types
    }

    /// Imports, in insertion order.
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Keyed import lookup by module-local alias.
    pub fn import_by_name(&self, name: &str) -> Option<&Import> {
        self.import_index.get(name).map(|&idx| &self.imports[idx])
    }

    /// Exports, in insertion order.
    pub fn exports(&self) -> &[Export] {
        &self.exports
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Functions, in insertion order.
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Resolve a bound identifier to the entity it denotes.
    pub fn resolve(&self, var: &Var) -> Option<Entity> {
        self.entities.get(var).copied()
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::print::module_to_string(self))
    }
}
