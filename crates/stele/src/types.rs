//! Scalar encodings used throughout the IR: value types, typed literals,
//! and identifiers.
//!
//! These are pure value types. The only heap allocation is the string
//! backing a symbolic [`Var`].

use std::fmt;
use std::num::NonZeroU32;

use anyhow::{bail, Result};

/// The primitive value types of the instruction set, plus `None` for
/// contexts that produce no value (void results).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    None,
    I32,
    I64,
    F32,
    F64,
}

impl BasicType {
    /// Byte width of a value of this type (i32/f32 = 4, i64/f64 = 8).
    ///
    /// # Panics
    ///
    /// `BasicType::None` has no width; asking for one is a bug in the
    /// caller, not a recoverable condition.
    pub fn byte_size(self) -> u32 {
        match self {
            BasicType::None => panic!("BasicType::None has no byte width"),
            BasicType::I32 | BasicType::F32 => 4,
            BasicType::I64 | BasicType::F64 => 8,
        }
    }

    /// Whether this type denotes an actual value (everything but `None`).
    pub fn is_value(self) -> bool {
        !matches!(self, BasicType::None)
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BasicType::None => "none",
            BasicType::I32 => "i32",
            BasicType::I64 => "i64",
            BasicType::F32 => "f32",
            BasicType::F64 => "f64",
        };
        f.write_str(s)
    }
}

/// A typed immediate value.
///
/// The tag and the payload are one and the same: constructing a variant
/// fixes both, so a literal can never claim one type while carrying
/// another. Contexts with no literal at hand use `Option<Literal>`
/// rather than a "none-typed" literal, so there is nothing unprintable
/// to guard against at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Literal {
    /// The value type of this literal. Never returns `BasicType::None`.
    pub fn ty(self) -> BasicType {
        match self {
            Literal::I32(_) => BasicType::I32,
            Literal::I64(_) => BasicType::I64,
            Literal::F32(_) => BasicType::F32,
            Literal::F64(_) => BasicType::F64,
        }
    }

    /// Read back as i32. `None` unless the literal actually is one.
    pub fn as_i32(self) -> Option<i32> {
        match self {
            Literal::I32(v) => Some(v),
            _ => None,
        }
    }

    /// Read back as i64. `None` unless the literal actually is one.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Literal::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Read back as f32. `None` unless the literal actually is one.
    pub fn as_f32(self) -> Option<f32> {
        match self {
            Literal::F32(v) => Some(v),
            _ => None,
        }
    }

    /// Read back as f64. `None` unless the literal actually is one.
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Literal::F64(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::I32(v) => write!(f, "{}", v),
            Literal::I64(v) => write!(f, "{}", v),
            Literal::F32(v) => write!(f, "{}", v),
            Literal::F64(v) => write!(f, "{}", v),
        }
    }
}

/// An identifier: either a positive numeric index into one of a
/// module's ordered lists (functions, locals, types), or a symbolic
/// name. `Var::None` is the distinguished "absent" value used for
/// optional labels.
///
/// Index and name are mutually exclusive by construction; numeric
/// identifiers start at 1, with 0 reserved to mean absent (hence
/// `NonZeroU32`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Var {
    #[default]
    None,
    Index(NonZeroU32),
    Name(String),
}

impl Var {
    /// A numeric identifier. Rejects 0, which is reserved for `Var::None`.
    pub fn index(idx: u32) -> Result<Var> {
        match NonZeroU32::new(idx) {
            Some(n) => Ok(Var::Index(n)),
            None => bail!("numeric identifiers start at 1; 0 is reserved for the absent Var"),
        }
    }

    /// A symbolic identifier.
    pub fn name(name: impl Into<String>) -> Var {
        Var::Name(name.into())
    }

    /// True for any index or name; false only for the absent sentinel.
    pub fn is_set(&self) -> bool {
        !matches!(self, Var::None)
    }
}

impl fmt::Display for Var {
    /// # Panics
    ///
    /// `Var::None` marks absence and has no textual form. Reaching a
    /// print site with it means the tree was wired inconsistently by
    /// the builder; optional identifiers are guarded with [`Var::is_set`]
    /// before printing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::None => panic!("attempted to print an absent Var"),
            Var::Index(n) => write!(f, "{}", n),
            Var::Name(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_type_display() {
        assert_eq!(BasicType::None.to_string(), "none");
        assert_eq!(BasicType::I32.to_string(), "i32");
        assert_eq!(BasicType::I64.to_string(), "i64");
        assert_eq!(BasicType::F32.to_string(), "f32");
        assert_eq!(BasicType::F64.to_string(), "f64");
    }

    #[test]
    fn basic_type_byte_size() {
        assert_eq!(BasicType::I32.byte_size(), 4);
        assert_eq!(BasicType::F32.byte_size(), 4);
        assert_eq!(BasicType::I64.byte_size(), 8);
        assert_eq!(BasicType::F64.byte_size(), 8);
    }

    #[test]
    #[should_panic(expected = "no byte width")]
    fn basic_type_none_has_no_byte_size() {
        let _ = BasicType::None.byte_size();
    }

    #[test]
    fn basic_type_is_value() {
        assert!(!BasicType::None.is_value());
        assert!(BasicType::I32.is_value());
        assert!(BasicType::F64.is_value());
    }

    #[test]
    fn literal_tag_matches_payload() {
        assert_eq!(Literal::I32(5).ty(), BasicType::I32);
        assert_eq!(Literal::I64(-9).ty(), BasicType::I64);
        assert_eq!(Literal::F32(1.5).ty(), BasicType::F32);
        assert_eq!(Literal::F64(2.25).ty(), BasicType::F64);
    }

    #[test]
    fn literal_typed_accessors_round_trip() {
        assert_eq!(Literal::I32(42).as_i32(), Some(42));
        assert_eq!(Literal::I64(i64::MIN).as_i64(), Some(i64::MIN));
        assert_eq!(Literal::F32(1.5).as_f32(), Some(1.5));
        assert_eq!(Literal::F64(-0.25).as_f64(), Some(-0.25));
    }

    #[test]
    fn literal_cross_tag_reads_rejected() {
        assert_eq!(Literal::I32(42).as_i64(), None);
        assert_eq!(Literal::I32(42).as_f32(), None);
        assert_eq!(Literal::I64(1).as_i32(), None);
        assert_eq!(Literal::F32(1.0).as_f64(), None);
        assert_eq!(Literal::F64(1.0).as_f32(), None);
    }

    #[test]
    fn literal_display() {
        assert_eq!(Literal::I32(5).to_string(), "5");
        assert_eq!(Literal::I32(-7).to_string(), "-7");
        assert_eq!(Literal::I64(1000).to_string(), "1000");
        assert_eq!(Literal::F32(1.5).to_string(), "1.5");
        assert_eq!(Literal::F64(2.25).to_string(), "2.25");
    }

    #[test]
    fn var_is_set() {
        assert!(!Var::None.is_set());
        assert!(Var::index(1).unwrap().is_set());
        assert!(Var::name("loop_top").is_set());
    }

    #[test]
    fn var_index_rejects_zero() {
        assert!(Var::index(0).is_err());
        assert!(Var::index(1).is_ok());
        assert!(Var::index(u32::MAX).is_ok());
    }

    #[test]
    fn var_display() {
        assert_eq!(Var::index(7).unwrap().to_string(), "7");
        assert_eq!(Var::name("start").to_string(), "start");
    }

    #[test]
    #[should_panic(expected = "absent Var")]
    fn var_none_does_not_print() {
        let _ = Var::None.to_string();
    }

    #[test]
    fn var_default_is_absent() {
        assert_eq!(Var::default(), Var::None);
    }
}
