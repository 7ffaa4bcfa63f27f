//! The expression node taxonomy.
//!
//! A function body is a strict tree of [`Expr`] nodes: no shared
//! subtrees, no cycles, every non-root node referenced by exactly one
//! parent slot. The arena owns all node storage; the [`ExprId`] fields
//! here are non-owning structural references, valid for as long as the
//! arena that minted them. Keeping the tree a tree is the builder's
//! responsibility; this layer does not police it.

use crate::arena::ExprId;
use crate::ops::{BinaryOp, ConvertOp, HostOp, RelationalOp, UnaryOp};
use crate::types::{Literal, Var};

/// One arm of a [`Expr::Switch`].
#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// The value this case matches on.
    pub value: Literal,
    pub body: ExprId,
    /// Whether control continues into the next case instead of leaving
    /// the switch.
    pub fallthrough: bool,
}

/// An executable expression node.
///
/// The set of kinds is closed on purpose: every consumer (the renderer
/// here, validators and optimizers elsewhere) matches exhaustively, so
/// adding a kind fails to compile until every consumer handles it.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Does nothing.
    Nop,

    /// Sequence of child expressions, optionally labeled as an exit
    /// target.
    Block { label: Var, body: Vec<ExprId> },

    /// Conditional. `if_false` is absent for one-armed ifs.
    If {
        condition: ExprId,
        if_true: ExprId,
        if_false: Option<ExprId>,
    },

    /// Loop header. `out_label` is the exit target, `in_label` the
    /// continue target; either may be absent, and `in_label` is only
    /// meaningful when `out_label` is present.
    Loop {
        out_label: Var,
        in_label: Var,
        body: ExprId,
    },

    /// Standalone label marker.
    Label { label: Var },

    /// Exit to an enclosing label, optionally conditional, optionally
    /// carrying a value. The target is mandatory.
    Break {
        target: Var,
        condition: Option<ExprId>,
        value: Option<ExprId>,
    },

    /// Multi-way branch over `scrutinee`; `label` is the switch's own
    /// exit target.
    Switch {
        label: Var,
        scrutinee: ExprId,
        cases: Vec<SwitchCase>,
        default: ExprId,
    },

    /// Direct call to a function in this module.
    Call { target: Var, operands: Vec<ExprId> },

    /// Direct call to an imported function.
    CallImport { target: Var, operands: Vec<ExprId> },

    /// Call through the indirect table; the target selector is itself
    /// computed.
    CallIndirect {
        target: ExprId,
        operands: Vec<ExprId>,
    },

    /// Read a local or parameter slot.
    GetLocal { local: Var },

    /// Write a local or parameter slot.
    SetLocal { local: Var, value: ExprId },

    /// Memory read.
    Load {
        /// Access width in bytes.
        bytes: u32,
        /// Sign-extend a sub-width read.
        signed: bool,
        /// Constant byte offset added to the address.
        offset: u32,
        align: u32,
        ptr: ExprId,
    },

    /// Memory write.
    Store {
        bytes: u32,
        offset: u32,
        align: u32,
        ptr: ExprId,
        value: ExprId,
    },

    /// Immediate value.
    Const { value: Literal },

    Unary { op: UnaryOp, operand: ExprId },

    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// Relational operation; produces a boolean-as-integer result.
    Compare {
        op: RelationalOp,
        left: ExprId,
        right: ExprId,
    },

    Convert { op: ConvertOp, operand: ExprId },

    /// Host environment query.
    Host { op: HostOp, operands: Vec<ExprId> },
}

impl Expr {
    /// Visit the direct children of this node, in the order the
    /// renderer walks them.
    ///
    /// The match is exhaustive on purpose: a new node kind does not
    /// compile until it declares its children here.
    pub fn for_each_child(&self, mut f: impl FnMut(ExprId)) {
        match self {
            Expr::Nop | Expr::Label { .. } | Expr::GetLocal { .. } | Expr::Const { .. } => {}
            Expr::Block { body, .. } => {
                for &child in body {
                    f(child);
                }
            }
            Expr::If {
                condition,
                if_true,
                if_false,
            } => {
                f(*condition);
                f(*if_true);
                if let Some(e) = if_false {
                    f(*e);
                }
            }
            Expr::Loop { body, .. } => f(*body),
            Expr::Break {
                condition, value, ..
            } => {
                if let Some(c) = condition {
                    f(*c);
                }
                if let Some(v) = value {
                    f(*v);
                }
            }
            Expr::Switch {
                scrutinee,
                cases,
                default,
                ..
            } => {
                f(*scrutinee);
                for case in cases {
                    f(case.body);
                }
                f(*default);
            }
            Expr::Call { operands, .. } | Expr::CallImport { operands, .. } => {
                for &operand in operands {
                    f(operand);
                }
            }
            Expr::CallIndirect { target, operands } => {
                f(*target);
                for &operand in operands {
                    f(operand);
                }
            }
            Expr::SetLocal { value, .. } => f(*value),
            Expr::Load { ptr, .. } => f(*ptr),
            Expr::Store { ptr, value, .. } => {
                f(*ptr);
                f(*value);
            }
            Expr::Unary { operand, .. } | Expr::Convert { operand, .. } => f(*operand),
            Expr::Binary { left, right, .. } | Expr::Compare { left, right, .. } => {
                f(*left);
                f(*right);
            }
            Expr::Host { operands, .. } => {
                for &operand in operands {
                    f(operand);
                }
            }
        }
    }
}
