//! Operator codes for unary, binary, relational, conversion, and host
//! operations, with their textual mnemonics.
//!
//! Every mnemonic table is one exhaustive match over its enum: adding
//! an operator without extending the table is a compile error rather
//! than a runtime abort, so the node-construction layer and the
//! renderer cannot drift apart.

use std::fmt;

/// Unary arithmetic and bit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    // int
    Clz,
    Ctz,
    Popcnt,
    // float
    Neg,
    Abs,
    Ceil,
    Floor,
    Trunc,
    Nearest,
    Sqrt,
}

impl UnaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            UnaryOp::Clz => "clz",
            UnaryOp::Ctz => "ctz",
            UnaryOp::Popcnt => "popcnt",
            UnaryOp::Neg => "neg",
            UnaryOp::Abs => "abs",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Floor => "floor",
            UnaryOp::Trunc => "trunc",
            UnaryOp::Nearest => "nearest",
            UnaryOp::Sqrt => "sqrt",
        }
    }
}

/// Binary arithmetic and bit operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // int or float
    Add,
    Sub,
    Mul,
    // int
    DivS,
    DivU,
    RemS,
    RemU,
    And,
    Or,
    Xor,
    Shl,
    ShrU,
    ShrS,
    // float
    Div,
    CopySign,
    Min,
    Max,
}

impl BinaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::DivS => "divs",
            BinaryOp::DivU => "divu",
            BinaryOp::RemS => "rems",
            BinaryOp::RemU => "remu",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::ShrU => "shru",
            BinaryOp::ShrS => "shrs",
            BinaryOp::Div => "div",
            BinaryOp::CopySign => "copysign",
            BinaryOp::Min => "min",
            BinaryOp::Max => "max",
        }
    }
}

/// Relational operations. All of them produce a boolean-as-integer
/// result regardless of operand type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOp {
    // int or float
    Eq,
    Ne,
    // int
    LtS,
    LtU,
    LeS,
    LeU,
    GtS,
    GtU,
    GeS,
    GeU,
    // float
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelationalOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            RelationalOp::Eq => "eq",
            RelationalOp::Ne => "ne",
            RelationalOp::LtS => "lts",
            RelationalOp::LtU => "ltu",
            RelationalOp::LeS => "les",
            RelationalOp::LeU => "leu",
            RelationalOp::GtS => "gts",
            RelationalOp::GtU => "gtu",
            RelationalOp::GeS => "ges",
            RelationalOp::GeU => "geu",
            RelationalOp::Lt => "lt",
            RelationalOp::Le => "le",
            RelationalOp::Gt => "gt",
            RelationalOp::Ge => "ge",
        }
    }
}

/// Numeric conversions between the four value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvertOp {
    // produce int
    ExtendSInt32,
    ExtendUInt32,
    WrapInt64,
    TruncSFloat32,
    TruncUFloat32,
    TruncSFloat64,
    TruncUFloat64,
    ReinterpretFloat,
    // produce float
    ConvertSInt32,
    ConvertUInt32,
    ConvertSInt64,
    ConvertUInt64,
    PromoteFloat32,
    DemoteFloat64,
    ReinterpretInt,
}

impl ConvertOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            ConvertOp::ExtendSInt32 => "extendsint32",
            ConvertOp::ExtendUInt32 => "extenduint32",
            ConvertOp::WrapInt64 => "wrapint64",
            ConvertOp::TruncSFloat32 => "truncsfloat32",
            ConvertOp::TruncUFloat32 => "truncufloat32",
            ConvertOp::TruncSFloat64 => "truncsfloat64",
            ConvertOp::TruncUFloat64 => "truncufloat64",
            ConvertOp::ReinterpretFloat => "reinterpretfloat",
            ConvertOp::ConvertSInt32 => "convertsint32",
            ConvertOp::ConvertUInt32 => "convertuint32",
            ConvertOp::ConvertSInt64 => "convertsint64",
            ConvertOp::ConvertUInt64 => "convertuint64",
            ConvertOp::PromoteFloat32 => "promotefloat32",
            ConvertOp::DemoteFloat64 => "demotefloat64",
            ConvertOp::ReinterpretInt => "reinterpretint",
        }
    }
}

/// Queries against the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOp {
    PageSize,
    MemorySize,
    GrowMemory,
    HasFeature,
}

impl HostOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            HostOp::PageSize => "pagesize",
            HostOp::MemorySize => "memorysize",
            HostOp::GrowMemory => "growmemory",
            HostOp::HasFeature => "hasfeature",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for RelationalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for ConvertOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl fmt::Display for HostOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
