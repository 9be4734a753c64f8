//! The eight PLY scalar types and conversions between them.
//!
//! Every property value in a PLY file has one of eight fixed-width numeric
//! storage types. The file declares which one is used (the *file type*),
//! while the program reading or writing the file chooses which type it wants
//! to work with (the *program type*). [`convert`] maps a value from one to
//! the other.
//!
//! Conversions behave exactly like Rust's `as` casts: integers are truncated
//! or wrapped, floats are truncated towards zero (saturating at the bounds of
//! the target type). No conversion ever fails.

use std::{
    fmt,
    str::FromStr,
};

use num_traits::AsPrimitive;


/// One of the eight scalar types a PLY property can be stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl ScalarType {
    /// All scalar types, in the order of the PLY type table.
    pub const ALL: [ScalarType; 8] = [
        ScalarType::Int8,
        ScalarType::Int16,
        ScalarType::Int32,
        ScalarType::Uint8,
        ScalarType::Uint16,
        ScalarType::Uint32,
        ScalarType::Float32,
        ScalarType::Float64,
    ];

    /// Returns the number of bytes this type occupies in binary files.
    pub fn byte_size(&self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::Uint8 => 1,
            ScalarType::Int16 | ScalarType::Uint16 => 2,
            ScalarType::Int32 | ScalarType::Uint32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }

    /// Returns the type name written to headers (e.g. `short` for `Int16`).
    pub fn ply_type_name(&self) -> &'static str {
        match self {
            ScalarType::Int8 => "char",
            ScalarType::Uint8 => "uchar",
            ScalarType::Int16 => "short",
            ScalarType::Uint16 => "ushort",
            ScalarType::Int32 => "int",
            ScalarType::Uint32 => "uint",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
        }
    }

    /// Returns `true` if and only if the type is either `float` or `double`.
    pub fn is_floating_point(&self) -> bool {
        matches!(self, ScalarType::Float32 | ScalarType::Float64)
    }

    /// Returns `true` for all six integer types.
    pub fn is_integer(&self) -> bool {
        !self.is_floating_point()
    }

    pub fn is_signed(&self) -> bool {
        !matches!(self, ScalarType::Uint8 | ScalarType::Uint16 | ScalarType::Uint32)
    }

    /// The longest list whose length can be stored in this type, or `None`
    /// for floating point types, which can't be used as list count type.
    pub fn max_list_len(&self) -> Option<u64> {
        match self {
            ScalarType::Int8 => Some(i8::max_value() as u64),
            ScalarType::Uint8 => Some(u8::max_value().into()),
            ScalarType::Int16 => Some(i16::max_value() as u64),
            ScalarType::Uint16 => Some(u16::max_value().into()),
            ScalarType::Int32 => Some(i32::max_value() as u64),
            ScalarType::Uint32 => Some(u32::max_value().into()),
            ScalarType::Float32 | ScalarType::Float64 => None,
        }
    }
}

/// Returns the number of bytes a value of type `ty` occupies in binary files.
pub fn byte_size(ty: ScalarType) -> usize {
    ty.byte_size()
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.ply_type_name().fmt(f)
    }
}

/// The error emitted when the `FromStr` implementation for `ScalarType` cannot
/// parse the given string.
#[derive(Clone, PartialEq, Eq)]
pub struct ScalarTypeParseError(pub String);

impl fmt::Display for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\"{}\" is not a valid PLY scalar type", self.0)
    }
}

impl fmt::Debug for ScalarTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for ScalarType {
    type Err = ScalarTypeParseError;

    /// Accepts both the historic names (`char`, `uchar`, `short`, ...) and
    /// the sized names (`int8`, `uint8`, `int16`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "char" | "int8" => Ok(ScalarType::Int8),
            "uchar" | "uint8" => Ok(ScalarType::Uint8),
            "short" | "int16" => Ok(ScalarType::Int16),
            "ushort" | "uint16" => Ok(ScalarType::Uint16),
            "int" | "int32" => Ok(ScalarType::Int32),
            "uint" | "uint32" => Ok(ScalarType::Uint32),
            "float" | "float32" => Ok(ScalarType::Float32),
            "double" | "float64" => Ok(ScalarType::Float64),
            other => Err(ScalarTypeParseError(other.to_string())),
        }
    }
}


// ===========================================================================
// ===== Tagged scalar values
// ===========================================================================

/// A single numeric value together with its scalar type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Float32(f32),
    Float64(f64),
}

impl Scalar {
    /// Returns the type of this value.
    pub fn ty(&self) -> ScalarType {
        match self {
            Scalar::Int8(_) => ScalarType::Int8,
            Scalar::Uint8(_) => ScalarType::Uint8,
            Scalar::Int16(_) => ScalarType::Int16,
            Scalar::Uint16(_) => ScalarType::Uint16,
            Scalar::Int32(_) => ScalarType::Int32,
            Scalar::Uint32(_) => ScalarType::Uint32,
            Scalar::Float32(_) => ScalarType::Float32,
            Scalar::Float64(_) => ScalarType::Float64,
        }
    }

    /// Converts this value into the given type, with the semantics of an `as`
    /// cast. Converting into the value's own type is the identity.
    pub fn convert(self, to: ScalarType) -> Scalar {
        match to {
            ScalarType::Int8 => Scalar::Int8(i8::from_scalar(self)),
            ScalarType::Uint8 => Scalar::Uint8(u8::from_scalar(self)),
            ScalarType::Int16 => Scalar::Int16(i16::from_scalar(self)),
            ScalarType::Uint16 => Scalar::Uint16(u16::from_scalar(self)),
            ScalarType::Int32 => Scalar::Int32(i32::from_scalar(self)),
            ScalarType::Uint32 => Scalar::Uint32(u32::from_scalar(self)),
            ScalarType::Float32 => Scalar::Float32(f32::from_scalar(self)),
            ScalarType::Float64 => Scalar::Float64(f64::from_scalar(self)),
        }
    }

    /// Returns the value cast to the primitive type `P`.
    pub fn cast<P: PlyScalar>(self) -> P {
        P::from_scalar(self)
    }

    /// Returns the value as integer, or `None` if this is a floating point
    /// value.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Scalar::Int8(v) => Some(v.into()),
            Scalar::Uint8(v) => Some(v.into()),
            Scalar::Int16(v) => Some(v.into()),
            Scalar::Uint16(v) => Some(v.into()),
            Scalar::Int32(v) => Some(v.into()),
            Scalar::Uint32(v) => Some(v.into()),
            Scalar::Float32(_) | Scalar::Float64(_) => None,
        }
    }
}

/// Converts `value` from its own type into `to`. See [`Scalar::convert`].
pub fn convert(value: Scalar, to: ScalarType) -> Scalar {
    value.convert(to)
}

impl fmt::Display for Scalar {
    /// Formats the value the way it's written to ASCII files: integers in
    /// decimal, floats with the shortest representation that parses back to
    /// the same value.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Int8(v) => v.fmt(f),
            Scalar::Uint8(v) => v.fmt(f),
            Scalar::Int16(v) => v.fmt(f),
            Scalar::Uint16(v) => v.fmt(f),
            Scalar::Int32(v) => v.fmt(f),
            Scalar::Uint32(v) => v.fmt(f),
            Scalar::Float32(v) => v.fmt(f),
            Scalar::Float64(v) => v.fmt(f),
        }
    }
}


// ===========================================================================
// ===== `PlyScalar`
// ===========================================================================

mod internal {
    pub trait Sealed {}
}

/// Abstracts over the eight Rust primitive types that correspond to a
/// [`ScalarType`].
///
/// This trait is implemented for exactly `i8`, `u8`, `i16`, `u16`, `i32`,
/// `u32`, `f32` and `f64` and can't be implemented for other types.
pub trait PlyScalar: Copy + fmt::Debug + fmt::Display + 'static + internal::Sealed {
    /// The scalar type represented by `Self`.
    const TYPE: ScalarType;

    /// Wraps the value into a tagged [`Scalar`].
    fn into_scalar(self) -> Scalar;

    /// Converts any scalar into `Self` (with `as` semantics).
    fn from_scalar(s: Scalar) -> Self;
}

macro_rules! impl_ply_scalar {
    ($ty:ident, $variant:ident) => {
        impl internal::Sealed for $ty {}
        impl PlyScalar for $ty {
            const TYPE: ScalarType = ScalarType::$variant;

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn from_scalar(s: Scalar) -> Self {
                match s {
                    Scalar::Int8(v) => AsPrimitive::<$ty>::as_(v),
                    Scalar::Uint8(v) => AsPrimitive::<$ty>::as_(v),
                    Scalar::Int16(v) => AsPrimitive::<$ty>::as_(v),
                    Scalar::Uint16(v) => AsPrimitive::<$ty>::as_(v),
                    Scalar::Int32(v) => AsPrimitive::<$ty>::as_(v),
                    Scalar::Uint32(v) => AsPrimitive::<$ty>::as_(v),
                    Scalar::Float32(v) => AsPrimitive::<$ty>::as_(v),
                    Scalar::Float64(v) => AsPrimitive::<$ty>::as_(v),
                }
            }
        }

        impl From<$ty> for Scalar {
            fn from(src: $ty) -> Self {
                Scalar::$variant(src)
            }
        }
    }
}

impl_ply_scalar!(i8,  Int8);
impl_ply_scalar!(u8,  Uint8);
impl_ply_scalar!(i16, Int16);
impl_ply_scalar!(u16, Uint16);
impl_ply_scalar!(i32, Int32);
impl_ply_scalar!(u32, Uint32);
impl_ply_scalar!(f32, Float32);
impl_ply_scalar!(f64, Float64);


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_and_aliases() {
        for &ty in &ScalarType::ALL {
            assert_eq!(ty.ply_type_name().parse::<ScalarType>(), Ok(ty));
        }

        assert_eq!("int8".parse::<ScalarType>(), Ok(ScalarType::Int8));
        assert_eq!("uint8".parse::<ScalarType>(), Ok(ScalarType::Uint8));
        assert_eq!("int16".parse::<ScalarType>(), Ok(ScalarType::Int16));
        assert_eq!("uint16".parse::<ScalarType>(), Ok(ScalarType::Uint16));
        assert_eq!("int32".parse::<ScalarType>(), Ok(ScalarType::Int32));
        assert_eq!("uint32".parse::<ScalarType>(), Ok(ScalarType::Uint32));
        assert_eq!("float32".parse::<ScalarType>(), Ok(ScalarType::Float32));
        assert_eq!("float64".parse::<ScalarType>(), Ok(ScalarType::Float64));

        assert!("long".parse::<ScalarType>().is_err());
        assert!("Float".parse::<ScalarType>().is_err());
    }

    #[test]
    fn byte_sizes() {
        assert_eq!(byte_size(ScalarType::Int8), 1);
        assert_eq!(byte_size(ScalarType::Uint8), 1);
        assert_eq!(byte_size(ScalarType::Int16), 2);
        assert_eq!(byte_size(ScalarType::Uint16), 2);
        assert_eq!(byte_size(ScalarType::Int32), 4);
        assert_eq!(byte_size(ScalarType::Uint32), 4);
        assert_eq!(byte_size(ScalarType::Float32), 4);
        assert_eq!(byte_size(ScalarType::Float64), 8);
    }

    #[test]
    fn widening_round_trip_is_identity() {
        let values = [
            Scalar::Int8(-128),
            Scalar::Int8(127),
            Scalar::Uint8(255),
            Scalar::Int16(-32768),
            Scalar::Uint16(65535),
            Scalar::Int32(i32::min_value()),
            Scalar::Uint32(u32::max_value()),
        ];
        let wide = [ScalarType::Int32, ScalarType::Float64];

        for &v in &values {
            for &to in &wide {
                // `u32` doesn't fit into `i32`
                if v.ty() == ScalarType::Uint32 && to == ScalarType::Int32 {
                    continue;
                }
                if v.ty() == ScalarType::Int32 && to == ScalarType::Int32 {
                    continue;
                }
                assert_eq!(convert(convert(v, to), v.ty()), v, "via {:?}", to);
            }
        }

        assert_eq!(convert(convert(Scalar::Uint8(200), ScalarType::Uint16), ScalarType::Uint8),
            Scalar::Uint8(200));
        assert_eq!(convert(convert(Scalar::Int16(-7), ScalarType::Int32), ScalarType::Int16),
            Scalar::Int16(-7));
        assert_eq!(convert(convert(Scalar::Float32(1.25), ScalarType::Float64), ScalarType::Float32),
            Scalar::Float32(1.25));
    }

    #[test]
    fn narrowing_truncates() {
        assert_eq!(convert(Scalar::Uint16(300), ScalarType::Uint8), Scalar::Uint8(44));
        assert_eq!(convert(Scalar::Int32(-1), ScalarType::Uint32), Scalar::Uint32(u32::max_value()));
        assert_eq!(convert(Scalar::Int16(-2), ScalarType::Uint8), Scalar::Uint8(254));
        assert_eq!(convert(Scalar::Float32(3.9), ScalarType::Int32), Scalar::Int32(3));
        assert_eq!(convert(Scalar::Float64(-3.9), ScalarType::Int16), Scalar::Int16(-3));
        assert_eq!(convert(Scalar::Float64(0.1), ScalarType::Float32), Scalar::Float32(0.1));
    }

    #[test]
    fn int_to_float() {
        assert_eq!(convert(Scalar::Int32(-17), ScalarType::Float32), Scalar::Float32(-17.0));
        assert_eq!(convert(Scalar::Uint8(255), ScalarType::Float64), Scalar::Float64(255.0));
    }

    #[test]
    fn typed_access() {
        assert_eq!(Scalar::Float64(2.5).cast::<u8>(), 2);
        assert_eq!(7u16.into_scalar(), Scalar::Uint16(7));
        assert_eq!(Scalar::from(1.5f32), Scalar::Float32(1.5));
        assert_eq!(Scalar::Uint32(9).as_integer(), Some(9));
        assert_eq!(Scalar::Float32(9.0).as_integer(), None);
    }

    #[test]
    fn list_len_limits() {
        assert_eq!(ScalarType::Uint8.max_list_len(), Some(255));
        assert_eq!(ScalarType::Int16.max_list_len(), Some(32767));
        assert_eq!(ScalarType::Float32.max_list_len(), None);
    }
}
