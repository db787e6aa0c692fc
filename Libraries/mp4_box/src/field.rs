use std::fmt;
use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use serde::Serialize;

/// A decoded box field value.
///
/// Integer fields stay integers (`u64` / `i64`) all the way out, so 64-bit timestamps and
/// sizes are never narrowed. `Float` is only used for derived, human-facing values such as
/// fixed-point rates or durations in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Flag(bool),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Unsigned(v) => write!(f, "{}", v),
            FieldValue::Signed(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Flag(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident, $target:ty: $($source:ty),*) => {
        $(impl From<$source> for FieldValue {
            fn from(value: $source) -> Self {
                FieldValue::$variant(value as $target)
            }
        })*
    };
}

impl_from!(Unsigned, u64: u8, u16, u32, u64);
impl_from!(Signed, i64: i8, i16, i32, i64);
impl_from!(Float, f64: f32, f64);

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// One named field of a decoded box, in payload order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxField {
    pub name: String,
    pub value: FieldValue,
}

/// Ordered collection the decoders append to.
#[derive(Debug, Default)]
pub struct Details(Vec<BoxField>);

impl Details {
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.push(BoxField { name: name.into(), value: value.into() });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<BoxField> {
        self.0
    }
}

/// Bounds-checked big-endian reader over a box payload.
///
/// Every read returns `None` when fewer bytes remain than the field needs, which lets the
/// decoders bail out with `?` at the first shortfall and keep whatever they already emitted.
pub struct FieldReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        FieldReader { cursor: Cursor::new(payload) }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn u8(&mut self) -> Option<u8> {
        self.cursor.read_u8().ok()
    }

    pub fn u16(&mut self) -> Option<u16> {
        self.cursor.read_u16::<BigEndian>().ok()
    }

    pub fn u24(&mut self) -> Option<u32> {
        self.cursor.read_u24::<BigEndian>().ok()
    }

    pub fn u32(&mut self) -> Option<u32> {
        self.cursor.read_u32::<BigEndian>().ok()
    }

    pub fn u64(&mut self) -> Option<u64> {
        self.cursor.read_u64::<BigEndian>().ok()
    }

    pub fn i16(&mut self) -> Option<i16> {
        self.cursor.read_i16::<BigEndian>().ok()
    }

    pub fn i32(&mut self) -> Option<i32> {
        self.cursor.read_i32::<BigEndian>().ok()
    }

    pub fn i64(&mut self) -> Option<i64> {
        self.cursor.read_i64::<BigEndian>().ok()
    }

    /// Reads a 64-bit field when `wide` is set and a 32-bit one otherwise, widening to `u64`.
    pub fn sized(&mut self, wide: bool) -> Option<u64> {
        if wide {
            self.u64()
        } else {
            self.u32().map(u64::from)
        }
    }

    pub fn fourcc(&mut self) -> Option<[u8; 4]> {
        let bytes = self.bytes(4)?;
        bytes.try_into().ok()
    }

    pub fn array16(&mut self) -> Option<[u8; 16]> {
        let bytes = self.bytes(16)?;
        bytes.try_into().ok()
    }

    pub fn bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let start = self.position();
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + len) as u64);
        Some(&data[start..start + len])
    }

    pub fn skip(&mut self, len: usize) -> Option<()> {
        self.bytes(len).map(|_| ())
    }

    /// Reads a NUL-terminated UTF-8 string, or the rest of the payload when no terminator exists.
    pub fn c_string(&mut self) -> Option<String> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.position();
        if start > data.len() {
            return None;
        }
        let rest = &data[start..];
        let (text, consumed) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (&rest[..nul], nul + 1),
            None => (rest, rest.len()),
        };
        self.cursor.set_position((start + consumed) as u64);
        Some(String::from_utf8_lossy(text).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reads_return_none() {
        let mut reader = FieldReader::new(&[0x00, 0x01, 0x02]);
        assert_eq!(reader.u16(), Some(1));
        assert_eq!(reader.u16(), None);
        assert!(reader.bytes(2).is_none());
    }

    #[test]
    fn sized_reads_select_width() {
        let payload = [0, 0, 0, 7, 0, 0, 0, 1, 0, 0, 0, 0];
        let mut reader = FieldReader::new(&payload);
        assert_eq!(reader.sized(false), Some(7));
        assert_eq!(reader.sized(true), Some(1u64 << 32));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn c_string_without_terminator_takes_rest() {
        let mut reader = FieldReader::new(b"VideoHandler");
        assert_eq!(reader.c_string().as_deref(), Some("VideoHandler"));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn values_display_plainly() {
        assert_eq!(FieldValue::from(42u32).to_string(), "42");
        assert_eq!(FieldValue::from(-3i32).to_string(), "-3");
        assert_eq!(FieldValue::from("avc1").to_string(), "avc1");
    }
}
