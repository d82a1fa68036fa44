use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use core::time::Duration;

use crate::error::{AccessError, AccessResult};

// -----------------------------------------------------------------------------
// PrimitiveKind

/// Value types with a dedicated typed call on [`ValueWriter`] and
/// [`ValueReader`].
///
/// Members whose exposed type is one of these can take the direct path,
/// bypassing the generic value-interface dispatch.
///
/// There is no decimal or date-time kind. 128-bit integers carry exact
/// decimal values and [`Duration`](core::time::Duration) carries spans;
/// calendar types go through a [`ValueInterface`](crate::value::ValueInterface),
/// usually as strings.
///
/// [`ValueWriter`]: crate::value::ValueWriter
/// [`ValueReader`]: crate::value::ValueReader
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    Char,
    Str,
    Duration,
}

impl PrimitiveKind {
    /// The Rust name of the kind, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::Str => "string",
            Self::Duration => "duration",
        }
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// One primitive value, as passed through a value sink or source.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive<'a> {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Char(char),
    Str(Cow<'a, str>),
    Duration(Duration),
}

enum Integer {
    Signed(i128),
    Unsigned(u128),
}

impl Primitive<'_> {
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::I128(_) => PrimitiveKind::I128,
            Self::Isize(_) => PrimitiveKind::Isize,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::U128(_) => PrimitiveKind::U128,
            Self::Usize(_) => PrimitiveKind::Usize,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            Self::Char(_) => PrimitiveKind::Char,
            Self::Str(_) => PrimitiveKind::Str,
            Self::Duration(_) => PrimitiveKind::Duration,
        }
    }

    /// Detaches the value from any borrowed string.
    pub fn into_owned(self) -> Primitive<'static> {
        match self {
            Self::Bool(v) => Primitive::Bool(v),
            Self::I8(v) => Primitive::I8(v),
            Self::I16(v) => Primitive::I16(v),
            Self::I32(v) => Primitive::I32(v),
            Self::I64(v) => Primitive::I64(v),
            Self::I128(v) => Primitive::I128(v),
            Self::Isize(v) => Primitive::Isize(v),
            Self::U8(v) => Primitive::U8(v),
            Self::U16(v) => Primitive::U16(v),
            Self::U32(v) => Primitive::U32(v),
            Self::U64(v) => Primitive::U64(v),
            Self::U128(v) => Primitive::U128(v),
            Self::Usize(v) => Primitive::Usize(v),
            Self::F32(v) => Primitive::F32(v),
            Self::F64(v) => Primitive::F64(v),
            Self::Char(v) => Primitive::Char(v),
            Self::Str(v) => Primitive::Str(Cow::Owned(v.into_owned())),
            Self::Duration(v) => Primitive::Duration(v),
        }
    }

    fn integer(&self) -> Option<Integer> {
        Some(match *self {
            Self::I8(v) => Integer::Signed(v.into()),
            Self::I16(v) => Integer::Signed(v.into()),
            Self::I32(v) => Integer::Signed(v.into()),
            Self::I64(v) => Integer::Signed(v.into()),
            Self::I128(v) => Integer::Signed(v),
            Self::Isize(v) => Integer::Signed(v as i128),
            Self::U8(v) => Integer::Unsigned(v.into()),
            Self::U16(v) => Integer::Unsigned(v.into()),
            Self::U32(v) => Integer::Unsigned(v.into()),
            Self::U64(v) => Integer::Unsigned(v.into()),
            Self::U128(v) => Integer::Unsigned(v),
            Self::Usize(v) => Integer::Unsigned(v as u128),
            _ => return None,
        })
    }

    fn float(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v.into()),
            Self::F64(v) => Some(v),
            _ => match self.integer()? {
                Integer::Signed(v) => Some(v as f64),
                Integer::Unsigned(v) => Some(v as f64),
            },
        }
    }

    fn mismatch(&self, expected: PrimitiveKind) -> AccessError {
        AccessError::TypeMismatch {
            expected: expected.name(),
            found: self.kind().name(),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

/// Integers convert between widths when the value fits, and never from
/// floats or strings.
macro_rules! impl_integer_conversion {
    ($($ty:ident => $kind:ident;)*) => {$(
        impl TryFrom<Primitive<'_>> for $ty {
            type Error = AccessError;

            fn try_from(value: Primitive<'_>) -> AccessResult<Self> {
                if let Primitive::$kind(v) = value {
                    return Ok(v);
                }
                let out_of_range = |v: &dyn ToString| AccessError::OutOfRange {
                    value: v.to_string(),
                    target: PrimitiveKind::$kind.name(),
                };
                match value.integer() {
                    Some(Integer::Signed(v)) => <$ty>::try_from(v).map_err(|_| out_of_range(&v)),
                    Some(Integer::Unsigned(v)) => <$ty>::try_from(v).map_err(|_| out_of_range(&v)),
                    None => Err(value.mismatch(PrimitiveKind::$kind)),
                }
            }
        }
    )*};
}

impl_integer_conversion! {
    i8 => I8;
    i16 => I16;
    i32 => I32;
    i64 => I64;
    i128 => I128;
    isize => Isize;
    u8 => U8;
    u16 => U16;
    u32 => U32;
    u64 => U64;
    u128 => U128;
    usize => Usize;
}

impl TryFrom<Primitive<'_>> for f64 {
    type Error = AccessError;

    fn try_from(value: Primitive<'_>) -> AccessResult<Self> {
        value.float().ok_or_else(|| value.mismatch(PrimitiveKind::F64))
    }
}

impl TryFrom<Primitive<'_>> for f32 {
    type Error = AccessError;

    fn try_from(value: Primitive<'_>) -> AccessResult<Self> {
        match value {
            Primitive::F32(v) => Ok(v),
            other => other
                .float()
                .map(|v| v as f32)
                .ok_or_else(|| other.mismatch(PrimitiveKind::F32)),
        }
    }
}

impl TryFrom<Primitive<'_>> for bool {
    type Error = AccessError;

    fn try_from(value: Primitive<'_>) -> AccessResult<Self> {
        match value {
            Primitive::Bool(v) => Ok(v),
            other => Err(other.mismatch(PrimitiveKind::Bool)),
        }
    }
}

impl TryFrom<Primitive<'_>> for char {
    type Error = AccessError;

    fn try_from(value: Primitive<'_>) -> AccessResult<Self> {
        match value {
            Primitive::Char(v) => Ok(v),
            Primitive::Str(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(AccessError::TypeMismatch {
                        expected: "char",
                        found: "string",
                    }),
                }
            }
            other => Err(other.mismatch(PrimitiveKind::Char)),
        }
    }
}

impl TryFrom<Primitive<'_>> for String {
    type Error = AccessError;

    fn try_from(value: Primitive<'_>) -> AccessResult<Self> {
        match value {
            Primitive::Str(s) => Ok(s.into_owned()),
            Primitive::Char(c) => Ok(c.to_string()),
            other => Err(other.mismatch(PrimitiveKind::Str)),
        }
    }
}

impl TryFrom<Primitive<'_>> for Duration {
    type Error = AccessError;

    fn try_from(value: Primitive<'_>) -> AccessResult<Self> {
        match value {
            Primitive::Duration(v) => Ok(v),
            other => Err(other.mismatch(PrimitiveKind::Duration)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
