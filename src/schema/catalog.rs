//! Column type catalog
//!
//! The catalog is closed and static. Supported types:
//! - uint8 .. uint256, int8 .. int256 (multiples of 8 bits)
//! - bool
//! - address (20 bytes)
//! - bytes1 .. bytes32
//! - bytes, string (variable width)
//! - `<element>[]` homogeneous arrays of any non-array type
//!
//! Only fixed-width scalars are key-eligible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte width of an `address` column.
pub const ADDRESS_BYTES: u8 = 20;

/// Largest fixed-size byte vector (`bytes32`).
pub const MAX_FIXED_BYTES: u8 = 32;

/// Largest integer width in bits (`uint256`, `int256`).
pub const MAX_INT_BITS: u16 = 256;

/// Scalar column kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "size", rename_all = "snake_case")]
pub enum ScalarKind {
    /// Unsigned integer with the given bit width
    Uint(u16),
    /// Signed integer with the given bit width
    Int(u16),
    /// Boolean
    Bool,
    /// 20-byte account identifier
    Address,
    /// Fixed-size byte vector of the given length
    FixedBytes(u8),
    /// Opaque variable-length byte string
    Bytes,
    /// UTF-8 string
    String,
}

impl ScalarKind {
    /// Byte width of the scalar, `None` for variable-width kinds.
    pub fn static_byte_length(&self) -> Option<usize> {
        match self {
            ScalarKind::Uint(bits) | ScalarKind::Int(bits) => Some(*bits as usize / 8),
            ScalarKind::Bool => Some(1),
            ScalarKind::Address => Some(ADDRESS_BYTES as usize),
            ScalarKind::FixedBytes(len) => Some(*len as usize),
            ScalarKind::Bytes | ScalarKind::String => None,
        }
    }

    fn resolve(name: &str) -> Option<Self> {
        match name {
            "bool" => return Some(ScalarKind::Bool),
            "address" => return Some(ScalarKind::Address),
            "bytes" => return Some(ScalarKind::Bytes),
            "string" => return Some(ScalarKind::String),
            _ => {}
        }

        if let Some(bits) = name.strip_prefix("uint") {
            return parse_int_bits(bits).map(ScalarKind::Uint);
        }
        if let Some(bits) = name.strip_prefix("int") {
            return parse_int_bits(bits).map(ScalarKind::Int);
        }
        if let Some(len) = name.strip_prefix("bytes") {
            let len = parse_decimal(len)?;
            if (1..=MAX_FIXED_BYTES as u32).contains(&len) {
                return Some(ScalarKind::FixedBytes(len as u8));
            }
        }

        None
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Uint(bits) => write!(f, "uint{}", bits),
            ScalarKind::Int(bits) => write!(f, "int{}", bits),
            ScalarKind::Bool => write!(f, "bool"),
            ScalarKind::Address => write!(f, "address"),
            ScalarKind::FixedBytes(len) => write!(f, "bytes{}", len),
            ScalarKind::Bytes => write!(f, "bytes"),
            ScalarKind::String => write!(f, "string"),
        }
    }
}

/// A resolved column type.
///
/// Arrays are single-level: the element is always a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "shape", content = "element", rename_all = "snake_case")]
pub enum CatalogType {
    Scalar(ScalarKind),
    Array(ScalarKind),
}

impl CatalogType {
    /// Resolves a declared type name against the catalog.
    pub fn resolve(name: &str) -> Result<Self, UnknownType> {
        let resolved = match name.strip_suffix("[]") {
            Some(element) => ScalarKind::resolve(element).map(CatalogType::Array),
            None => ScalarKind::resolve(name).map(CatalogType::Scalar),
        };
        resolved.ok_or_else(|| UnknownType {
            name: name.to_string(),
        })
    }

    /// Whether the type may appear in a primary key.
    pub fn is_key_eligible(&self) -> bool {
        !self.is_variable_width()
    }

    /// Whether values of this type have no fixed byte width.
    pub fn is_variable_width(&self) -> bool {
        self.static_byte_length().is_none()
    }

    /// Byte width for fixed-width types.
    pub fn static_byte_length(&self) -> Option<usize> {
        match self {
            CatalogType::Scalar(kind) => kind.static_byte_length(),
            CatalogType::Array(_) => None,
        }
    }

    /// Canonical declared name; `resolve(t.type_name())` yields `t`.
    pub fn type_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CatalogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogType::Scalar(kind) => write!(f, "{}", kind),
            CatalogType::Array(kind) => write!(f, "{}[]", kind),
        }
    }
}

/// Free-function form of [`CatalogType::resolve`].
pub fn resolve(name: &str) -> Result<CatalogType, UnknownType> {
    CatalogType::resolve(name)
}

/// Free-function form of [`CatalogType::is_key_eligible`].
pub fn is_key_eligible(ty: &CatalogType) -> bool {
    ty.is_key_eligible()
}

/// Free-function form of [`CatalogType::is_variable_width`].
pub fn is_variable_width(ty: &CatalogType) -> bool {
    ty.is_variable_width()
}

/// Every scalar kind in the catalog, in canonical order.
pub fn scalar_kinds() -> impl Iterator<Item = ScalarKind> {
    let uints = (1..=MAX_INT_BITS / 8).map(|n| ScalarKind::Uint(n * 8));
    let ints = (1..=MAX_INT_BITS / 8).map(|n| ScalarKind::Int(n * 8));
    let fixed = (1..=MAX_FIXED_BYTES).map(ScalarKind::FixedBytes);
    uints
        .chain(ints)
        .chain([ScalarKind::Bool, ScalarKind::Address])
        .chain(fixed)
        .chain([ScalarKind::Bytes, ScalarKind::String])
}

/// A type name that does not exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type '{name}'")]
pub struct UnknownType {
    pub name: String,
}

fn parse_int_bits(digits: &str) -> Option<u16> {
    let bits = parse_decimal(digits)?;
    if bits > 0 && bits <= MAX_INT_BITS as u32 && bits % 8 == 0 {
        Some(bits as u16)
    } else {
        None
    }
}

/// Strict decimal: no sign, no leading zero, at most three digits.
fn parse_decimal(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.len() > 3 || digits.starts_with('0') {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
