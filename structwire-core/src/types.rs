//! Primitive type definitions and byte order selection.
//!
//! This module maps each fixed-width primitive to its wire width, its
//! format code and its valid value domain, and provides the endianness
//! shared by every field of a record.

use std::str::FromStr;

use crate::buffer::{ByteCursor, WriteBuffer};
use crate::error::{Error, Result};
use crate::value::Value;

/// Byte order of multi-byte primitives.
///
/// One value is chosen per record and applied to every nested field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    /// Byte order of the host platform.
    Native,
    /// Big-endian byte order.
    Big,
    /// Little-endian byte order.
    Little,
    /// Network byte order (big-endian), the default.
    #[default]
    Network,
}

impl Endianness {
    /// Parses endianness from a token or a name.
    ///
    /// Accepts `=`, `>`, `<`, `!` and `native`, `big`, `little`, `network`
    /// (case-insensitive, with optional `-endian` suffix).
    ///
    /// # Errors
    /// Returns a configuration error for any other token.
    pub fn parse(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        let name = lowered
            .strip_suffix("-endian")
            .or_else(|| lowered.strip_suffix("endian"))
            .unwrap_or(&lowered);
        match name {
            "=" | "native" => Ok(Self::Native),
            ">" | "big" | "be" => Ok(Self::Big),
            "<" | "little" | "le" => Ok(Self::Little),
            "!" | "network" => Ok(Self::Network),
            _ => Err(Error::configuration(format!(
                "invalid value for endianness: '{s}'"
            ))),
        }
    }

    /// Returns the single-character token for this endianness.
    #[must_use]
    pub const fn token(&self) -> char {
        match self {
            Self::Native => '=',
            Self::Big => '>',
            Self::Little => '<',
            Self::Network => '!',
        }
    }

    /// Returns true if multi-byte values are written most significant byte first.
    #[must_use]
    pub const fn is_big_endian(&self) -> bool {
        match self {
            Self::Native => cfg!(target_endian = "big"),
            Self::Big | Self::Network => true,
            Self::Little => false,
        }
    }
}

impl FromStr for Endianness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Fixed-width primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Signed 8-bit integer.
    Byte,
    /// Unsigned 8-bit integer.
    UByte,
    /// Signed 16-bit integer.
    Short,
    /// Unsigned 16-bit integer.
    UShort,
    /// Signed 32-bit integer.
    Int,
    /// Unsigned 32-bit integer.
    UInt,
    /// Signed 64-bit integer.
    Long,
    /// Unsigned 64-bit integer.
    ULong,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Boolean stored as one byte, 0 or 1.
    Bool,
    /// Exactly one byte of character data.
    Char,
}

impl PrimitiveType {
    /// Returns the size of the primitive type in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Self::Byte | Self::UByte | Self::Bool | Self::Char => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt | Self::Float => 4,
            Self::Long | Self::ULong | Self::Double => 8,
        }
    }

    /// Returns the binary format code of this primitive.
    #[must_use]
    pub const fn format_code(&self) -> char {
        match self {
            Self::Byte => 'b',
            Self::UByte => 'B',
            Self::Short => 'h',
            Self::UShort => 'H',
            Self::Int => 'i',
            Self::UInt => 'I',
            Self::Long => 'q',
            Self::ULong => 'Q',
            Self::Float => 'f',
            Self::Double => 'd',
            Self::Bool => '?',
            Self::Char => 'c',
        }
    }

    /// Parses a primitive type from its format code.
    #[must_use]
    pub const fn from_format_code(code: char) -> Option<Self> {
        match code {
            'b' => Some(Self::Byte),
            'B' => Some(Self::UByte),
            'h' => Some(Self::Short),
            'H' => Some(Self::UShort),
            'i' => Some(Self::Int),
            'I' => Some(Self::UInt),
            'q' => Some(Self::Long),
            'Q' => Some(Self::ULong),
            'f' => Some(Self::Float),
            'd' => Some(Self::Double),
            '?' => Some(Self::Bool),
            'c' => Some(Self::Char),
            _ => None,
        }
    }

    /// Returns the type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::UByte => "ubyte",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bool => "bool",
            Self::Char => "char",
        }
    }

    /// Returns true if this is a signed integer type.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }

    /// Returns true if this is an unsigned integer type.
    #[must_use]
    pub const fn is_unsigned(&self) -> bool {
        matches!(self, Self::UByte | Self::UShort | Self::UInt | Self::ULong)
    }

    /// Returns true if this is a floating point type.
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Returns the closed integer range of this type, if it is an integer type.
    #[must_use]
    pub const fn integer_range(&self) -> Option<(i128, i128)> {
        match self {
            Self::Byte => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::UByte => Some((0, u8::MAX as i128)),
            Self::Short => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::UShort => Some((0, u16::MAX as i128)),
            Self::Int => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::UInt => Some((0, u32::MAX as i128)),
            Self::Long => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::ULong => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    /// Validates `value` against this type and returns its canonical form.
    ///
    /// Integers of either sign are accepted for integer types as long as they
    /// fit; floats accept integers and either precision, with single
    /// precision narrowed to `f32`; booleans and characters require their
    /// exact variant.
    ///
    /// # Errors
    /// Returns a value-range error for out-of-range or wrongly typed values.
    pub fn check(&self, value: &Value) -> Result<Value> {
        if let Some((min, max)) = self.integer_range() {
            let v = value.as_integer().ok_or_else(|| self.type_mismatch(value))?;
            if v < min || v > max {
                return Err(Error::value_range(format!(
                    "{v} is outside the {} range [{min}, {max}]",
                    self.name()
                )));
            }
            // Range checked above.
            return Ok(if self.is_signed() {
                Value::Int(v as i64)
            } else {
                Value::UInt(v as u64)
            });
        }

        match self {
            Self::Float => {
                let v = match value {
                    Value::Float32(v) => return Ok(Value::Float32(*v)),
                    Value::Float(v) => *v,
                    other => other.as_integer().ok_or_else(|| self.type_mismatch(value))? as f64,
                };
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    return Err(Error::value_range(format!(
                        "{v} does not fit in a single-precision float"
                    )));
                }
                // Narrowed on assignment so the held value is the one written.
                Ok(Value::Float32(v as f32))
            }
            Self::Double => {
                let v = match value {
                    Value::Float(v) => *v,
                    Value::Float32(v) => f64::from(*v),
                    other => other.as_integer().ok_or_else(|| self.type_mismatch(value))? as f64,
                };
                Ok(Value::Float(v))
            }
            Self::Bool => match value {
                Value::Bool(v) => Ok(Value::Bool(*v)),
                _ => Err(self.type_mismatch(value)),
            },
            Self::Char => match value {
                Value::Bytes(v) if v.len() == 1 => Ok(value.clone()),
                Value::Bytes(v) => Err(Error::value_range(format!(
                    "char requires exactly one byte, got {}",
                    v.len()
                ))),
                _ => Err(self.type_mismatch(value)),
            },
            _ => Err(self.type_mismatch(value)),
        }
    }

    /// Reads one value of this type from the cursor.
    ///
    /// # Errors
    /// Returns `InsufficientData` if the cursor has fewer than [`Self::size`]
    /// bytes left, or a value-range error for an invalid boolean byte.
    pub fn read(&self, cursor: &mut ByteCursor<'_>, endian: Endianness) -> Result<Value> {
        let big = endian.is_big_endian();

        macro_rules! read_num {
            ($t:ty) => {{
                let bytes = cursor.read_array::<{ std::mem::size_of::<$t>() }>()?;
                if big {
                    <$t>::from_be_bytes(bytes)
                } else {
                    <$t>::from_le_bytes(bytes)
                }
            }};
        }

        let value = match self {
            Self::Byte => Value::from(read_num!(i8)),
            Self::UByte => Value::from(read_num!(u8)),
            Self::Short => Value::from(read_num!(i16)),
            Self::UShort => Value::from(read_num!(u16)),
            Self::Int => Value::from(read_num!(i32)),
            Self::UInt => Value::from(read_num!(u32)),
            Self::Long => Value::from(read_num!(i64)),
            Self::ULong => Value::from(read_num!(u64)),
            Self::Float => Value::Float32(read_num!(f32)),
            Self::Double => Value::from(read_num!(f64)),
            Self::Bool => match cursor.read_u8()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                other => {
                    return Err(Error::value_range(format!(
                        "bool byte must be 0 or 1, got {other}"
                    )));
                }
            },
            Self::Char => Value::Bytes(vec![cursor.read_u8()?]),
        };
        Ok(value)
    }

    /// Writes `value` in this type's encoding.
    ///
    /// The value is validated with [`Self::check`] first.
    ///
    /// # Errors
    /// Returns a value-range error for invalid values or a sink error.
    pub fn write<W: WriteBuffer + ?Sized>(
        &self,
        value: &Value,
        endian: Endianness,
        sink: &mut W,
    ) -> Result<()> {
        let big = endian.is_big_endian();
        let value = self.check(value)?;

        macro_rules! write_num {
            ($v:expr) => {{
                let v = $v;
                if big {
                    sink.put_bytes(&v.to_be_bytes())
                } else {
                    sink.put_bytes(&v.to_le_bytes())
                }
            }};
        }

        // `check` returned the canonical variant for each type.
        match (self, &value) {
            (Self::Byte, Value::Int(v)) => write_num!(*v as i8),
            (Self::Short, Value::Int(v)) => write_num!(*v as i16),
            (Self::Int, Value::Int(v)) => write_num!(*v as i32),
            (Self::Long, Value::Int(v)) => write_num!(*v),
            (Self::UByte, Value::UInt(v)) => write_num!(*v as u8),
            (Self::UShort, Value::UInt(v)) => write_num!(*v as u16),
            (Self::UInt, Value::UInt(v)) => write_num!(*v as u32),
            (Self::ULong, Value::UInt(v)) => write_num!(*v),
            (Self::Float, Value::Float32(v)) => write_num!(*v),
            (Self::Double, Value::Float(v)) => write_num!(*v),
            (Self::Bool, Value::Bool(v)) => sink.put_u8(u8::from(*v)),
            (Self::Char, Value::Bytes(v)) => sink.put_bytes(v),
            _ => Err(self.type_mismatch(&value)),
        }
    }

    fn type_mismatch(&self, value: &Value) -> Error {
        Error::value_range(format!(
            "{} field cannot hold a {} value",
            self.name(),
            value.kind_name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_type_size() {
        assert_eq!(PrimitiveType::Byte.size(), 1);
        assert_eq!(PrimitiveType::UByte.size(), 1);
        assert_eq!(PrimitiveType::Bool.size(), 1);
        assert_eq!(PrimitiveType::Char.size(), 1);
        assert_eq!(PrimitiveType::Short.size(), 2);
        assert_eq!(PrimitiveType::UShort.size(), 2);
        assert_eq!(PrimitiveType::Int.size(), 4);
        assert_eq!(PrimitiveType::UInt.size(), 4);
        assert_eq!(PrimitiveType::Float.size(), 4);
        assert_eq!(PrimitiveType::Long.size(), 8);
        assert_eq!(PrimitiveType::ULong.size(), 8);
        assert_eq!(PrimitiveType::Double.size(), 8);
    }

    #[test]
    fn test_format_codes() {
        for ty in [
            PrimitiveType::Byte,
            PrimitiveType::UByte,
            PrimitiveType::Short,
            PrimitiveType::UShort,
            PrimitiveType::Int,
            PrimitiveType::UInt,
            PrimitiveType::Long,
            PrimitiveType::ULong,
            PrimitiveType::Float,
            PrimitiveType::Double,
            PrimitiveType::Bool,
            PrimitiveType::Char,
        ] {
            assert_eq!(PrimitiveType::from_format_code(ty.format_code()), Some(ty));
        }
        assert_eq!(PrimitiveType::from_format_code('x'), None);
    }

    #[test]
    fn test_endianness_parse() {
        assert_eq!(Endianness::parse("!").unwrap(), Endianness::Network);
        assert_eq!(Endianness::parse("<").unwrap(), Endianness::Little);
        assert_eq!(Endianness::parse("bigEndian").unwrap(), Endianness::Big);
        assert_eq!(Endianness::parse("little-endian").unwrap(), Endianness::Little);
        assert_eq!("native".parse::<Endianness>().unwrap(), Endianness::Native);
        assert!(Endianness::parse("middle").unwrap_err().is_configuration());
    }

    #[test]
    fn test_endianness_default_is_network() {
        assert_eq!(Endianness::default(), Endianness::Network);
        assert!(Endianness::Network.is_big_endian());
        assert_eq!(
            Endianness::Native.is_big_endian(),
            cfg!(target_endian = "big")
        );
    }

    #[test]
    fn test_byte_range() {
        let ty = PrimitiveType::Byte;
        assert_eq!(ty.check(&Value::Int(-128)).unwrap(), Value::Int(-128));
        assert_eq!(ty.check(&Value::UInt(127)).unwrap(), Value::Int(127));
        assert!(ty.check(&Value::Int(-129)).unwrap_err().is_value_range());
        assert!(ty.check(&Value::Int(128)).unwrap_err().is_value_range());
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert!(
            PrimitiveType::UInt
                .check(&Value::Int(-1))
                .unwrap_err()
                .is_value_range()
        );
        assert_eq!(
            PrimitiveType::ULong.check(&Value::UInt(u64::MAX)).unwrap(),
            Value::UInt(u64::MAX)
        );
    }

    #[test]
    fn test_wrong_type_is_value_range() {
        assert!(
            PrimitiveType::Int
                .check(&Value::from(b"1"))
                .unwrap_err()
                .is_value_range()
        );
        assert!(
            PrimitiveType::Bool
                .check(&Value::Int(1))
                .unwrap_err()
                .is_value_range()
        );
    }

    #[test]
    fn test_char_requires_one_byte() {
        let ty = PrimitiveType::Char;
        assert!(ty.check(&Value::from(b"t")).is_ok());
        assert!(ty.check(&Value::from(b"")).unwrap_err().is_value_range());
        assert!(ty.check(&Value::from(b"12")).unwrap_err().is_value_range());
    }

    #[test]
    fn test_float_range() {
        assert!(PrimitiveType::Float.check(&Value::Float(1.5)).is_ok());
        assert!(PrimitiveType::Float.check(&Value::Float(f64::INFINITY)).is_ok());
        assert!(
            PrimitiveType::Float
                .check(&Value::Float(1e300))
                .unwrap_err()
                .is_value_range()
        );
        assert_eq!(
            PrimitiveType::Double.check(&Value::Int(2)).unwrap(),
            Value::Float(2.0)
        );
    }

    #[test]
    fn test_float_is_narrowed_on_check() {
        assert_eq!(
            PrimitiveType::Float.check(&Value::Float(0.1)).unwrap(),
            Value::Float32(0.1)
        );
        assert_eq!(
            PrimitiveType::Double.check(&Value::Float32(0.5)).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn test_float_signalling_nan_bits_survive() {
        let bytes = [0x7F, 0x80, 0x00, 0x01];
        let mut cursor = ByteCursor::new(&bytes);
        let value = PrimitiveType::Float
            .read(&mut cursor, Endianness::Big)
            .unwrap();

        let mut out = Vec::new();
        PrimitiveType::Float
            .write(&value, Endianness::Big, &mut out)
            .unwrap();
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_uint_network_order() {
        let mut cursor = ByteCursor::new(&[0x00, 0x00, 0x00, 0x01]);
        let value = PrimitiveType::UInt
            .read(&mut cursor, Endianness::Network)
            .unwrap();
        assert_eq!(value, Value::UInt(1));

        let mut out = Vec::new();
        PrimitiveType::UInt
            .write(&Value::UInt(1), Endianness::Network, &mut out)
            .unwrap();
        assert_eq!(out, vec![0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_little_endian_short() {
        let mut cursor = ByteCursor::new(&[0x34, 0x12]);
        let value = PrimitiveType::UShort
            .read(&mut cursor, Endianness::Little)
            .unwrap();
        assert_eq!(value, Value::UInt(0x1234));

        let mut out = Vec::new();
        PrimitiveType::Short
            .write(&Value::Int(-2), Endianness::Little, &mut out)
            .unwrap();
        assert_eq!(out, vec![0xFE, 0xFF]);
    }

    #[test]
    fn test_read_short_input() {
        let mut cursor = ByteCursor::new(&[0x01, 0x02]);
        let err = PrimitiveType::Int
            .read(&mut cursor, Endianness::Big)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientData {
                required: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn test_bool_decoding() {
        let mut cursor = ByteCursor::new(&[0x01, 0x00, 0x02]);
        assert_eq!(
            PrimitiveType::Bool.read(&mut cursor, Endianness::Big).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            PrimitiveType::Bool.read(&mut cursor, Endianness::Big).unwrap(),
            Value::Bool(false)
        );
        assert!(
            PrimitiveType::Bool
                .read(&mut cursor, Endianness::Big)
                .unwrap_err()
                .is_value_range()
        );
    }

    #[test]
    fn test_double_round_trip() {
        let mut out = Vec::new();
        PrimitiveType::Double
            .write(&Value::Float(std::f64::consts::PI), Endianness::Big, &mut out)
            .unwrap();
        let mut cursor = ByteCursor::new(&out);
        assert_eq!(
            PrimitiveType::Double.read(&mut cursor, Endianness::Big).unwrap(),
            Value::Float(std::f64::consts::PI)
        );
    }
}
