//! S-expression rendering of expressions, declarations, and modules.
//!
//! Rendering is a read-only, depth-first, pre-order walk. Each node
//! first emits its opening tag and scalar fields, then its child
//! expressions in a fixed per-kind order, each as a full line one
//! indent level deeper, then its closing parenthesis back at the
//! opening level. The indent level is threaded explicitly through
//! every call, so the printed nesting depth always equals the tree's
//! structural depth.
//!
//! The per-kind dispatch is a single exhaustive match: a node kind
//! without a rendering rule does not compile.

use std::fmt;

use crate::arena::{ExprArena, ExprId};
use crate::expr::Expr;
use crate::module::{Export, Function, FunctionType, Import, Module, Table};
use crate::types::BasicType;

/// Two spaces per indent level.
const INDENT: &str = "  ";

/// Render a single expression tree, rooted at indent level zero.
pub fn expr_to_string(arena: &ExprArena, id: ExprId) -> String {
    let mut printer = Printer::new(arena);
    printer.expr(id, 0);
    printer.finish()
}

/// Render a function declaration, rooted at indent level zero.
pub fn function_to_string(arena: &ExprArena, func: &Function) -> String {
    let mut printer = Printer::new(arena);
    printer.function(func, 0);
    printer.finish()
}

/// Render a whole module. Declarations appear in canonical order:
/// function types, imports, exports, the table, then functions, each
/// list in insertion order.
pub fn module_to_string(module: &Module) -> String {
    let mut printer = Printer::new(module.arena());
    printer.module(module);
    printer.finish()
}

fn pad(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}

fn write_params_and_result(out: &mut String, params: &[(String, BasicType)], result: BasicType) {
    for (name, ty) in params {
        out.push_str(&format!("(param {} {}) ", name, ty));
    }
    out.push_str(&format!("(result {})", result));
}

fn write_function_type(out: &mut String, ty: &FunctionType, indent: usize) {
    out.push_str(&format!("(type {}\n", ty.name));
    pad(out, indent + 1);
    for param in &ty.params {
        out.push_str(&format!("(param {}) ", param));
    }
    out.push_str(&format!("(result {})\n", ty.result));
    pad(out, indent);
    out.push(')');
}

fn write_import(out: &mut String, import: &Import, indent: usize) {
    out.push_str(&format!(
        "(import {} \"{}\" \"{}\" ",
        import.name, import.module, import.base
    ));
    write_function_type(out, &import.ty, indent);
    out.push(')');
}

fn write_export(out: &mut String, export: &Export) {
    out.push_str(&format!("(export \"{}\" {})", export.name, export.value));
}

fn write_table(out: &mut String, table: &Table) {
    out.push_str("(table");
    for var in &table.entries {
        out.push_str(&format!(" {}", var));
    }
    out.push(')');
}

struct Printer<'a> {
    arena: &'a ExprArena,
    out: String,
}

impl<'a> Printer<'a> {
    fn new(arena: &'a ExprArena) -> Self {
        Printer {
            arena,
            out: String::new(),
        }
    }

    fn finish(self) -> String {
        self.out
    }

    /// A child expression as a full line: indent, node, newline.
    fn line(&mut self, id: ExprId, indent: usize) {
        pad(&mut self.out, indent);
        self.expr(id, indent);
        self.out.push('\n');
    }

    /// Closing parenthesis back at the opening level.
    fn close(&mut self, indent: usize) {
        pad(&mut self.out, indent);
        self.out.push(')');
    }

    fn expr(&mut self, id: ExprId, indent: usize) {
        let arena = self.arena;
        match &arena[id] {
            Expr::Nop => self.out.push_str("nop"),

            Expr::Block { label, body } => {
                self.out.push_str("(block");
                if label.is_set() {
                    self.out.push_str(&format!(" {}", label));
                }
                self.out.push('\n');
                for &child in body {
                    self.line(child, indent + 1);
                }
                self.close(indent);
            }

            Expr::If {
                condition,
                if_true,
                if_false,
            } => {
                self.out.push_str("(if\n");
                self.line(*condition, indent + 1);
                self.line(*if_true, indent + 1);
                if let Some(if_false) = if_false {
                    self.line(*if_false, indent + 1);
                }
                self.close(indent);
            }

            Expr::Loop {
                out_label,
                in_label,
                body,
            } => {
                self.out.push_str("(loop");
                if out_label.is_set() {
                    self.out.push_str(&format!(" {}", out_label));
                    if in_label.is_set() {
                        self.out.push_str(&format!(" {}", in_label));
                    }
                }
                self.out.push('\n');
                self.line(*body, indent + 1);
                self.close(indent);
            }

            Expr::Label { label } => self.out.push_str(&format!("(label {})", label)),

            Expr::Break {
                target,
                condition,
                value,
            } => {
                self.out.push_str(&format!("(break {}\n", target));
                if let Some(condition) = condition {
                    self.line(*condition, indent + 1);
                }
                if let Some(value) = value {
                    self.line(*value, indent + 1);
                }
                self.close(indent);
            }

            Expr::Switch {
                label,
                scrutinee,
                cases,
                default,
            } => {
                self.out.push_str(&format!("(switch {}\n", label));
                self.line(*scrutinee, indent + 1);
                for case in cases {
                    pad(&mut self.out, indent + 1);
                    self.out.push_str(&format!("(case {}", case.value));
                    if case.fallthrough {
                        self.out.push_str(" fallthru");
                    }
                    self.out.push('\n');
                    self.line(case.body, indent + 2);
                    self.close(indent + 1);
                    self.out.push('\n');
                }
                pad(&mut self.out, indent + 1);
                self.out.push_str("(default\n");
                self.line(*default, indent + 2);
                self.close(indent + 1);
                self.out.push('\n');
                self.close(indent);
            }

            Expr::Call { target, operands } => {
                self.out.push_str(&format!("(call {}\n", target));
                for &operand in operands {
                    self.line(operand, indent + 1);
                }
                self.close(indent);
            }

            Expr::CallImport { target, operands } => {
                self.out.push_str(&format!("(callimport {}\n", target));
                for &operand in operands {
                    self.line(operand, indent + 1);
                }
                self.close(indent);
            }

            Expr::CallIndirect { target, operands } => {
                self.out.push_str("(callindirect\n");
                self.line(*target, indent + 1);
                for &operand in operands {
                    self.line(operand, indent + 1);
                }
                self.close(indent);
            }

            Expr::GetLocal { local } => self.out.push_str(&format!("(getlocal {})", local)),

            Expr::SetLocal { local, value } => {
                self.out.push_str(&format!("(setlocal {}\n", local));
                self.line(*value, indent + 1);
                self.close(indent);
            }

            Expr::Load {
                bytes,
                signed,
                offset,
                align,
                ptr,
            } => {
                self.out.push_str(&format!(
                    "(load {} {} {} {}\n",
                    bytes,
                    u8::from(*signed),
                    offset,
                    align
                ));
                self.line(*ptr, indent + 1);
                self.close(indent);
            }

            Expr::Store {
                bytes,
                offset,
                align,
                ptr,
                value,
            } => {
                self.out
                    .push_str(&format!("(store {} {} {}\n", bytes, offset, align));
                self.line(*ptr, indent + 1);
                self.line(*value, indent + 1);
                self.close(indent);
            }

            Expr::Const { value } => self.out.push_str(&format!("(literal {})", value)),

            Expr::Unary { op, operand } => {
                self.out.push_str(&format!("(unary {}\n", op));
                self.line(*operand, indent + 1);
                self.close(indent);
            }

            Expr::Binary { op, left, right } => {
                self.out.push_str(&format!("(binary {}\n", op));
                self.line(*left, indent + 1);
                self.line(*right, indent + 1);
                self.close(indent);
            }

            Expr::Compare { op, left, right } => {
                self.out.push_str(&format!("(compare {}\n", op));
                self.line(*left, indent + 1);
                self.line(*right, indent + 1);
                self.close(indent);
            }

            Expr::Convert { op, operand } => {
                self.out.push_str(&format!("(convert {}\n", op));
                self.line(*operand, indent + 1);
                self.close(indent);
            }

            Expr::Host { op, operands } => {
                self.out.push_str(&format!("(host {}\n", op));
                for &operand in operands {
                    self.line(operand, indent + 1);
                }
                self.close(indent);
            }
        }
    }

    fn function(&mut self, func: &Function, indent: usize) {
        self.out.push_str(&format!("(func {} ", func.name));
        write_params_and_result(&mut self.out, &func.params, func.result);
        self.out.push('\n');
        for (name, ty) in &func.locals {
            pad(&mut self.out, indent + 1);
            self.out.push_str(&format!("(local {} {})\n", name, ty));
        }
        self.line(func.body, indent + 1);
        self.close(indent);
    }

    fn module(&mut self, module: &Module) {
        self.out.push_str("(module\n");
        for ty in module.function_types() {
            pad(&mut self.out, 1);
            write_function_type(&mut self.out, ty, 1);
            self.out.push('\n');
        }
        for import in module.imports() {
            pad(&mut self.out, 1);
            write_import(&mut self.out, import, 1);
            self.out.push('\n');
        }
        for export in module.exports() {
            pad(&mut self.out, 1);
            write_export(&mut self.out, export);
            self.out.push('\n');
        }
        pad(&mut self.out, 1);
        write_table(&mut self.out, module.table());
        self.out.push('\n');
        for func in module.functions() {
            pad(&mut self.out, 1);
            self.function(func, 1);
            self.out.push('\n');
        }
        self.close(0);
        self.out.push('\n');
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_function_type(&mut out, self, 0);
        f.write_str(&out)
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_import(&mut out, self, 0);
        f.write_str(&out)
    }
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_export(&mut out, self);
        f.write_str(&out)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_table(&mut out, self);
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::SwitchCase;
    use crate::ops::{BinaryOp, ConvertOp, HostOp, RelationalOp, UnaryOp};
    use crate::types::{Literal, Var};

    fn balanced(text: &str) -> bool {
        let mut depth: i64 = 0;
        for c in text.chars() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    #[test]
    fn atoms_render_on_one_line() {
        let mut arena = ExprArena::new();
        let nop = arena.alloc(Expr::Nop);
        let get = arena.alloc(Expr::GetLocal {
            local: Var::name("x"),
        });
        let konst = arena.alloc(Expr::Const {
            value: Literal::I32(5),
        });
        let label = arena.alloc(Expr::Label {
            label: Var::name("top"),
        });

        assert_eq!(expr_to_string(&arena, nop), "nop");
        assert_eq!(expr_to_string(&arena, get), "(getlocal x)");
        assert_eq!(expr_to_string(&arena, konst), "(literal 5)");
        assert_eq!(expr_to_string(&arena, label), "(label top)");
    }

    #[test]
    fn block_children_one_level_deeper() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Nop);
        let b = arena.alloc(Expr::Nop);
        let block = arena.alloc(Expr::Block {
            label: Var::name("l"),
            body: vec![a, b],
        });

        assert_eq!(expr_to_string(&arena, block), "(block l\n  nop\n  nop\n)");
    }

    #[test]
    fn unlabeled_block_omits_label() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Nop);
        let block = arena.alloc(Expr::Block {
            label: Var::None,
            body: vec![a],
        });

        assert_eq!(expr_to_string(&arena, block), "(block\n  nop\n)");
    }

    #[test]
    fn if_prints_condition_then_arms() {
        let mut arena = ExprArena::new();
        let cond = arena.alloc(Expr::GetLocal {
            local: Var::name("c"),
        });
        let then = arena.alloc(Expr::Const {
            value: Literal::I32(1),
        });
        let els = arena.alloc(Expr::Const {
            value: Literal::I32(2),
        });
        let one_armed = arena.alloc(Expr::If {
            condition: cond,
            if_true: then,
            if_false: None,
        });
        let two_armed = arena.alloc(Expr::If {
            condition: cond,
            if_true: then,
            if_false: Some(els),
        });

        assert_eq!(
            expr_to_string(&arena, one_armed),
            "(if\n  (getlocal c)\n  (literal 1)\n)"
        );
        assert_eq!(
            expr_to_string(&arena, two_armed),
            "(if\n  (getlocal c)\n  (literal 1)\n  (literal 2)\n)"
        );
    }

    #[test]
    fn loop_labels_nest() {
        let mut arena = ExprArena::new();
        let body = arena.alloc(Expr::Nop);

        let bare = arena.alloc(Expr::Loop {
            out_label: Var::None,
            in_label: Var::None,
            body,
        });
        assert_eq!(expr_to_string(&arena, bare), "(loop\n  nop\n)");

        let both = arena.alloc(Expr::Loop {
            out_label: Var::name("out"),
            in_label: Var::name("in"),
            body,
        });
        assert_eq!(expr_to_string(&arena, both), "(loop out in\n  nop\n)");

        // The continue label only renders when the exit label is present.
        let in_only = arena.alloc(Expr::Loop {
            out_label: Var::None,
            in_label: Var::name("in"),
            body,
        });
        assert_eq!(expr_to_string(&arena, in_only), "(loop\n  nop\n)");
    }

    #[test]
    fn break_renders_optional_children() {
        let mut arena = ExprArena::new();
        let cond = arena.alloc(Expr::GetLocal {
            local: Var::name("c"),
        });
        let value = arena.alloc(Expr::Const {
            value: Literal::I32(3),
        });

        let plain = arena.alloc(Expr::Break {
            target: Var::index(1).unwrap(),
            condition: None,
            value: None,
        });
        assert_eq!(expr_to_string(&arena, plain), "(break 1\n)");

        let full = arena.alloc(Expr::Break {
            target: Var::name("exit"),
            condition: Some(cond),
            value: Some(value),
        });
        assert_eq!(
            expr_to_string(&arena, full),
            "(break exit\n  (getlocal c)\n  (literal 3)\n)"
        );
    }

    #[test]
    fn switch_renders_cases_and_default() {
        let mut arena = ExprArena::new();
        let scrutinee = arena.alloc(Expr::GetLocal {
            local: Var::name("x"),
        });
        let case_body = arena.alloc(Expr::Nop);
        let default = arena.alloc(Expr::Nop);
        let switch = arena.alloc(Expr::Switch {
            label: Var::name("s"),
            scrutinee,
            cases: vec![
                SwitchCase {
                    value: Literal::I32(0),
                    body: case_body,
                    fallthrough: true,
                },
                SwitchCase {
                    value: Literal::I32(1),
                    body: case_body,
                    fallthrough: false,
                },
            ],
            default,
        });

        let text = expr_to_string(&arena, switch);
        assert_eq!(
            text,
            "(switch s\n  (getlocal x)\n  (case 0 fallthru\n    nop\n  )\n  (case 1\n    nop\n  )\n  (default\n    nop\n  )\n)"
        );
        assert!(balanced(&text));
    }

    #[test]
    fn calls_render_their_operands() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Const {
            value: Literal::I32(1),
        });
        let b = arena.alloc(Expr::Const {
            value: Literal::I32(2),
        });

        let call = arena.alloc(Expr::Call {
            target: Var::name("f"),
            operands: vec![a, b],
        });
        assert_eq!(
            expr_to_string(&arena, call),
            "(call f\n  (literal 1)\n  (literal 2)\n)"
        );

        let import_call = arena.alloc(Expr::CallImport {
            target: Var::name("imp"),
            operands: vec![a],
        });
        assert_eq!(
            expr_to_string(&arena, import_call),
            "(callimport imp\n  (literal 1)\n)"
        );

        let selector = arena.alloc(Expr::GetLocal {
            local: Var::name("i"),
        });
        let indirect = arena.alloc(Expr::CallIndirect {
            target: selector,
            operands: vec![a],
        });
        assert_eq!(
            expr_to_string(&arena, indirect),
            "(callindirect\n  (getlocal i)\n  (literal 1)\n)"
        );
    }

    #[test]
    fn set_local_wraps_its_value() {
        let mut arena = ExprArena::new();
        let value = arena.alloc(Expr::Const {
            value: Literal::I32(7),
        });
        let set = arena.alloc(Expr::SetLocal {
            local: Var::name("x"),
            value,
        });
        assert_eq!(
            expr_to_string(&arena, set),
            "(setlocal x\n  (literal 7)\n)"
        );
    }

    #[test]
    fn load_and_store_scalar_fields() {
        let mut arena = ExprArena::new();
        let addr = arena.alloc(Expr::GetLocal {
            local: Var::name("p"),
        });
        let value = arena.alloc(Expr::Const {
            value: Literal::I32(9),
        });

        let load = arena.alloc(Expr::Load {
            bytes: 4,
            signed: true,
            offset: 8,
            align: 4,
            ptr: addr,
        });
        assert_eq!(
            expr_to_string(&arena, load),
            "(load 4 1 8 4\n  (getlocal p)\n)"
        );

        let unsigned_load = arena.alloc(Expr::Load {
            bytes: 1,
            signed: false,
            offset: 0,
            align: 1,
            ptr: addr,
        });
        assert_eq!(
            expr_to_string(&arena, unsigned_load),
            "(load 1 0 0 1\n  (getlocal p)\n)"
        );

        let store = arena.alloc(Expr::Store {
            bytes: 4,
            offset: 0,
            align: 4,
            ptr: addr,
            value,
        });
        assert_eq!(
            expr_to_string(&arena, store),
            "(store 4 0 4\n  (getlocal p)\n  (literal 9)\n)"
        );
    }

    #[test]
    fn operator_forms_use_mnemonics() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Const {
            value: Literal::I32(1),
        });
        let b = arena.alloc(Expr::Const {
            value: Literal::I32(2),
        });

        let neg = arena.alloc(Expr::Unary {
            op: UnaryOp::Neg,
            operand: a,
        });
        assert_eq!(expr_to_string(&arena, neg), "(unary neg\n  (literal 1)\n)");

        let add = arena.alloc(Expr::Binary {
            op: BinaryOp::Add,
            left: a,
            right: b,
        });
        assert_eq!(
            expr_to_string(&arena, add),
            "(binary add\n  (literal 1)\n  (literal 2)\n)"
        );

        let cmp = arena.alloc(Expr::Compare {
            op: RelationalOp::LtS,
            left: a,
            right: b,
        });
        assert_eq!(
            expr_to_string(&arena, cmp),
            "(compare lts\n  (literal 1)\n  (literal 2)\n)"
        );

        let cvt = arena.alloc(Expr::Convert {
            op: ConvertOp::WrapInt64,
            operand: a,
        });
        assert_eq!(
            expr_to_string(&arena, cvt),
            "(convert wrapint64\n  (literal 1)\n)"
        );

        let host = arena.alloc(Expr::Host {
            op: HostOp::PageSize,
            operands: vec![],
        });
        assert_eq!(expr_to_string(&arena, host), "(host pagesize\n)");
    }

    #[test]
    fn printed_depth_equals_structural_depth() {
        // Blocks nested k deep put their innermost line k indent units in.
        let mut arena = ExprArena::new();
        let mut node = arena.alloc(Expr::Nop);
        let depth = 6;
        for _ in 0..depth {
            node = arena.alloc(Expr::Block {
                label: Var::None,
                body: vec![node],
            });
        }

        let text = expr_to_string(&arena, node);
        let max_indent = text
            .lines()
            .map(|line| {
                let spaces = line.len() - line.trim_start_matches(' ').len();
                spaces / INDENT.len()
            })
            .max()
            .unwrap();
        assert_eq!(max_indent, depth);
        assert!(balanced(&text));
    }

    #[test]
    fn every_compound_form_is_balanced() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::Const {
            value: Literal::I32(1),
        });
        let set = arena.alloc(Expr::SetLocal {
            local: Var::name("x"),
            value: a,
        });
        let cond = arena.alloc(Expr::GetLocal {
            local: Var::name("x"),
        });
        let brk = arena.alloc(Expr::Break {
            target: Var::name("done"),
            condition: Some(cond),
            value: None,
        });
        let body = arena.alloc(Expr::Block {
            label: Var::name("done"),
            body: vec![set, brk],
        });
        let looped = arena.alloc(Expr::Loop {
            out_label: Var::name("out"),
            in_label: Var::name("in"),
            body,
        });

        assert!(balanced(&expr_to_string(&arena, looped)));
    }

    #[test]
    fn function_type_text() {
        let ty = FunctionType {
            name: "v".to_string(),
            result: BasicType::I32,
            params: vec![BasicType::I32, BasicType::F64],
        };
        assert_eq!(
            ty.to_string(),
            "(type v\n  (param i32) (param f64) (result i32)\n)"
        );

        let nullary = FunctionType {
            name: "n".to_string(),
            result: BasicType::None,
            params: vec![],
        };
        assert_eq!(nullary.to_string(), "(type n\n  (result none)\n)");
    }

    #[test]
    fn import_and_export_text() {
        let import = Import {
            name: "imp".to_string(),
            module: "env".to_string(),
            base: "foo".to_string(),
            ty: FunctionType {
                name: "t".to_string(),
                result: BasicType::None,
                params: vec![BasicType::I32],
            },
        };
        assert_eq!(
            import.to_string(),
            "(import imp \"env\" \"foo\" (type t\n  (param i32) (result none)\n))"
        );

        let export = Export {
            name: "run".to_string(),
            value: Var::name("f"),
        };
        assert_eq!(export.to_string(), "(export \"run\" f)");
    }

    #[test]
    fn table_text() {
        assert_eq!(Table::default().to_string(), "(table)");

        let table = Table {
            entries: vec![
                Var::index(1).unwrap(),
                Var::index(2).unwrap(),
                Var::name("f"),
            ],
        };
        assert_eq!(table.to_string(), "(table 1 2 f)");
    }

    #[test]
    fn function_locals_precede_body() {
        let mut module = Module::new();
        let body = module.alloc_expr(Expr::GetLocal {
            local: Var::name("y"),
        });
        let func = Function {
            name: "f".to_string(),
            result: BasicType::I64,
            params: vec![("x".to_string(), BasicType::I32)],
            locals: vec![("y".to_string(), BasicType::I64)],
            body,
        };
        assert_eq!(
            function_to_string(module.arena(), &func),
            "(func f (param x i32) (result i64)\n  (local y i64)\n  (getlocal y)\n)"
        );
    }
}
