//! Numeric element kinds of a raw buffer.
//!
//! Every per-kind property (byte width, integer or float, how to read and
//! write one element) lives in the single table in [`ElementType::spec`].

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::{ConversionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endianness::Big
        } else {
            Endianness::Little
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Endianness::Little => "little",
            Endianness::Big => "big",
        }
    }
}

impl FromStr for Endianness {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "little" => Ok(Endianness::Little),
            "big" => Ok(Endianness::Big),
            _ => Err(ConversionError::InvalidEndianness(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

type ReadFn = fn(&[u8], Endianness) -> f64;
type WriteFn = fn(f64, Endianness, &mut Vec<u8>);

/// Static description of one element kind.
#[derive(Clone, Copy)]
pub struct ElementSpec {
    pub name: &'static str,
    pub size: usize,
    pub is_float: bool,
    /// Smallest and largest representable value
    pub range: (f64, f64),
    pub read: ReadFn,
    pub write: WriteFn,
}

trait Primitive: Sized {
    fn read(bytes: &[u8], endianness: Endianness) -> f64;
    fn write(value: f64, endianness: Endianness, out: &mut Vec<u8>);
}

macro_rules! impl_primitive {
    ($($ty:ty),*) => {$(
        impl Primitive for $ty {
            fn read(bytes: &[u8], endianness: Endianness) -> f64 {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                let value = match endianness {
                    Endianness::Little => <$ty>::from_le_bytes(raw),
                    Endianness::Big => <$ty>::from_be_bytes(raw),
                };
                value as f64
            }

            fn write(value: f64, endianness: Endianness, out: &mut Vec<u8>) {
                let value = value as $ty;
                match endianness {
                    Endianness::Little => out.extend_from_slice(&value.to_le_bytes()),
                    Endianness::Big => out.extend_from_slice(&value.to_be_bytes()),
                }
            }
        }
    )*};
}

impl_primitive!(u8, i8, u16, i16, u32, i32, f32, f64);

macro_rules! element_spec {
    ($name:literal, $ty:ty, $is_float:literal) => {
        ElementSpec {
            name: $name,
            size: std::mem::size_of::<$ty>(),
            is_float: $is_float,
            range: (<$ty>::MIN as f64, <$ty>::MAX as f64),
            read: <$ty as Primitive>::read,
            write: <$ty as Primitive>::write,
        }
    };
}

const U8_SPEC: ElementSpec = element_spec!("uint8", u8, false);
const I8_SPEC: ElementSpec = element_spec!("int8", i8, false);
const U16_SPEC: ElementSpec = element_spec!("uint16", u16, false);
const I16_SPEC: ElementSpec = element_spec!("int16", i16, false);
const U32_SPEC: ElementSpec = element_spec!("uint32", u32, false);
const I32_SPEC: ElementSpec = element_spec!("int32", i32, false);
const F32_SPEC: ElementSpec = element_spec!("float32", f32, true);
const F64_SPEC: ElementSpec = element_spec!("float64", f64, true);

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        ElementType::U8,
        ElementType::I8,
        ElementType::U16,
        ElementType::I16,
        ElementType::U32,
        ElementType::I32,
        ElementType::F32,
        ElementType::F64,
    ];

    pub fn spec(self) -> &'static ElementSpec {
        match self {
            ElementType::U8 => &U8_SPEC,
            ElementType::I8 => &I8_SPEC,
            ElementType::U16 => &U16_SPEC,
            ElementType::I16 => &I16_SPEC,
            ElementType::U32 => &U32_SPEC,
            ElementType::I32 => &I32_SPEC,
            ElementType::F32 => &F32_SPEC,
            ElementType::F64 => &F64_SPEC,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn size(self) -> usize {
        self.spec().size
    }

    pub fn is_float(self) -> bool {
        self.spec().is_float
    }

    /// Decodes `data` into one value per element.
    ///
    /// `data.len()` must be a multiple of [`ElementType::size`]; trailing
    /// bytes are ignored.
    pub fn read_all(self, data: &[u8], endianness: Endianness) -> Vec<f64> {
        let spec = self.spec();
        data.chunks_exact(spec.size)
            .map(|chunk| (spec.read)(chunk, endianness))
            .collect()
    }

    /// Appends `value` as one element, rejecting values the type cannot hold.
    pub fn write(self, value: f64, endianness: Endianness, out: &mut Vec<u8>) -> Result<()> {
        let spec = self.spec();
        let (min, max) = spec.range;
        let representable = if spec.is_float {
            !value.is_finite() || (value >= min && value <= max)
        } else {
            value.fract() == 0.0 && value >= min && value <= max
        };
        if !representable {
            return Err(ConversionError::SampleOutOfRange { value, element_type: self });
        }
        (spec.write)(value, endianness, out);
        Ok(())
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == wanted)
            .ok_or_else(|| ConversionError::UnsupportedElementType(s.to_string()))
    }
}
