//! Element descriptors for packed homogeneous data.
//!
//! The descriptor is a small tree of "simple primitives" (the same shape the
//! numeric array library uses for `dtype.descr`). Scalar arrays carry a bare
//! string such as `<f8`; structured arrays carry a list of `(name, type)` tuples.

use std::fmt;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackedDataError {
    #[error("unsupported element type `{0}`")]
    UnsupportedDtype(String),
    #[error("{len} bytes is not a multiple of the {size}-byte element size")]
    RaggedLength { len: usize, size: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dtype {
    None,
    Int(i64),
    Str(String),
    Tuple(Vec<Dtype>),
    List(Vec<Dtype>),
    Dict(Vec<(Dtype, Dtype)>),
}

impl Dtype {
    /// Scalar element type, if this descriptor names one.
    pub fn element(&self) -> Option<ElementType> {
        match self {
            Dtype::Str(descr) => ElementType::from_descr(descr),
            _ => None,
        }
    }

    /// Expands packed bytes into one value per element.
    pub fn unpack(&self, bytes: &[u8]) -> Result<Vec<Value>, PackedDataError> {
        let Some(element) = self.element() else {
            return Err(PackedDataError::UnsupportedDtype(self.to_string()));
        };
        let size = element.size();
        if bytes.len() % size != 0 {
            return Err(PackedDataError::RaggedLength {
                len: bytes.len(),
                size,
            });
        }
        Ok(bytes.chunks_exact(size).map(|c| element.decode(c)).collect())
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dtype::None => f.write_str("None"),
            Dtype::Int(n) => write!(f, "{n}"),
            Dtype::Str(s) => write!(f, "'{s}'"),
            Dtype::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Dtype::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Dtype::Dict(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    F64,
    F32,
    I64,
    I32,
    I16,
    I8,
    U64,
    U32,
    U16,
    U8,
    Bool,
}

impl ElementType {
    pub fn from_descr(descr: &str) -> Option<Self> {
        Some(match descr {
            "<f8" => Self::F64,
            "<f4" => Self::F32,
            "<i8" => Self::I64,
            "<i4" => Self::I32,
            "<i2" => Self::I16,
            "|i1" => Self::I8,
            "<u8" => Self::U64,
            "<u4" => Self::U32,
            "<u2" => Self::U16,
            "|u1" => Self::U8,
            "|b1" | "?" => Self::Bool,
            _ => return None,
        })
    }

    pub fn descr(self) -> &'static str {
        match self {
            Self::F64 => "<f8",
            Self::F32 => "<f4",
            Self::I64 => "<i8",
            Self::I32 => "<i4",
            Self::I16 => "<i2",
            Self::I8 => "|i1",
            Self::U64 => "<u8",
            Self::U32 => "<u4",
            Self::U16 => "<u2",
            Self::U8 => "|u1",
            Self::Bool => "|b1",
        }
    }

    pub fn size(self) -> usize {
        match self {
            Self::F64 | Self::I64 | Self::U64 => 8,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::I16 | Self::U16 => 2,
            Self::I8 | Self::U8 | Self::Bool => 1,
        }
    }

    /// Decodes one little-endian element. `chunk` must be exactly `size()` bytes.
    pub fn decode(self, chunk: &[u8]) -> Value {
        fn arr<const N: usize>(chunk: &[u8]) -> [u8; N] {
            let mut out = [0u8; N];
            out.copy_from_slice(&chunk[..N]);
            out
        }

        match self {
            Self::F64 => Value::float(f64::from_le_bytes(arr(chunk))),
            Self::F32 => Value::float(f32::from_le_bytes(arr(chunk)) as f64),
            Self::I64 => Value::int(i64::from_le_bytes(arr(chunk))),
            Self::I32 => Value::int(i32::from_le_bytes(arr(chunk)) as i64),
            Self::I16 => Value::int(i16::from_le_bytes(arr(chunk)) as i64),
            Self::I8 => Value::int(chunk[0] as i8 as i64),
            Self::U64 => {
                let raw = u64::from_le_bytes(arr(chunk));
                match i64::try_from(raw) {
                    Ok(n) => Value::int(n),
                    Err(_) => Value::long(raw.to_string()),
                }
            }
            Self::U32 => Value::int(u32::from_le_bytes(arr(chunk)) as i64),
            Self::U16 => Value::int(u16::from_le_bytes(arr(chunk)) as i64),
            Self::U8 => Value::int(chunk[0] as i64),
            Self::Bool => Value::bool(chunk[0] != 0),
        }
    }
}
