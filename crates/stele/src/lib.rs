//! stele: in-memory IR for a stack-machine instruction set.
//!
//! This crate is the data model shared by every stage of a compilation
//! pipeline targeting a WebAssembly-like stack machine: a typed
//! expression tree, module-level declarations (function signatures,
//! imports, exports, an indirect-call table, function bodies), and a
//! renderer that walks the tree depth-first and emits deterministic,
//! indented S-expression text.
//!
//! Ownership is arena-based: every expression node lives in an
//! [`ExprArena`] and is referenced by opaque [`ExprId`]s, so a whole
//! module's trees are released in one step when the [`Module`] that
//! owns the arena is dropped. Construction is single-threaded and
//! build-then-freeze: one builder populates a `Module` to completion,
//! after which readers (the renderer, later stages) treat it as
//! immutable.
//!
//! Parsing source text, validating well-formedness, optimizing, and
//! encoding to a binary format are collaborator concerns built on top
//! of this crate's public shape; none of them live here.
//!
//! # Example
//!
//! ```
//! use stele::{BasicType, Expr, Function, FunctionType, Literal, Module};
//!
//! let mut module = Module::new();
//! module.add_function_type(FunctionType {
//!     name: "v".to_string(),
//!     result: BasicType::I32,
//!     params: vec![],
//! });
//! let body = module.alloc_expr(Expr::Const {
//!     value: Literal::I32(5),
//! });
//! module.add_function(Function {
//!     name: "f".to_string(),
//!     result: BasicType::I32,
//!     params: vec![],
//!     locals: vec![],
//!     body,
//! });
//!
//! let text = module.to_string();
//! assert!(text.contains("(func f (result i32)"));
//! assert!(text.contains("(literal 5)"));
//! ```

pub mod arena;
pub mod expr;
pub mod module;
pub mod ops;
pub mod print;
pub mod types;

// Re-export key types for convenience
pub use anyhow::{Context, Result};
pub use arena::{ExprArena, ExprId};
pub use expr::{Expr, SwitchCase};
pub use module::{Entity, Export, Function, FunctionType, Import, Module, Table};
pub use ops::{BinaryOp, ConvertOp, HostOp, RelationalOp, UnaryOp};
pub use print::{expr_to_string, function_to_string, module_to_string};
pub use types::{BasicType, Literal, Var};
