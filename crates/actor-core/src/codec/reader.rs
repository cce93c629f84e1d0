use std::collections::BTreeMap;

use rmp::decode::{self, ValueReadError};
use rmp::Marker;

use crate::codec::record::Record;
use crate::codec::value::Value;
use crate::errors::DecodeError;

/// Maximum container nesting accepted by [`Decoder`].
pub const MAX_NESTING_DEPTH: usize = 64;

/// Cursor over wire bytes.
///
/// Every read consumes exactly one wire value. Strings returned by
/// [`Decoder::read_str`] borrow from the input, not from the decoder.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    input: &'a [u8],
    rest: &'a [u8],
    depth: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            rest: input,
            depth: 0,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.input.len() - self.rest.len()
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Returns the marker of the next value without consuming it.
    pub fn peek_marker(&self) -> Result<Marker, DecodeError> {
        match self.rest.first() {
            Some(byte) => Ok(Marker::from_u8(*byte)),
            None => Err(self.truncated()),
        }
    }

    /// Reports whether the next value is the nil marker. Consumes nothing.
    pub fn is_next_nil(&self) -> Result<bool, DecodeError> {
        Ok(matches!(self.peek_marker()?, Marker::Null))
    }

    /// Consumes a nil marker.
    pub fn read_nil(&mut self) -> Result<(), DecodeError> {
        let start = self.position();
        decode::read_nil(&mut self.rest).map_err(|err| self.read_error(start, "nil", err))
    }

    /// Reads a `true`/`false` marker.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        let start = self.position();
        decode::read_bool(&mut self.rest).map_err(|err| self.read_error(start, "bool", err))
    }

    /// Reads an unsigned integer written with any marker no wider than `u8`.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.read_unsigned("u8", 8)
    }

    /// Reads an unsigned integer written with any marker no wider than `u16`.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.read_unsigned("u16", 16)
    }

    /// Reads an unsigned integer written with any marker no wider than `u32`.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_unsigned("u32", 32)
    }

    /// Reads an unsigned integer written with any unsigned marker.
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.read_unsigned("u64", 64)
    }

    /// Reads a string, borrowing its contents from the input buffer.
    pub fn read_str(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.position();
        let len = decode::read_str_len(&mut self.rest)
            .map_err(|err| self.read_error(start, "str", err))?;
        let offset = self.position();
        let bytes = self.take(len as usize)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    /// Owned variant of [`Decoder::read_str`].
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        self.read_str().map(str::to_owned)
    }

    /// Reads a binary value. A nil marker decodes as an empty vector.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        if self.consume_nil()? {
            return Ok(Vec::new());
        }
        let start = self.position();
        let len = decode::read_bin_len(&mut self.rest)
            .map_err(|err| self.read_error(start, "bin", err))?;
        Ok(self.take(len as usize)?.to_vec())
    }

    pub fn read_array_len(&mut self) -> Result<usize, DecodeError> {
        let start = self.position();
        decode::read_array_len(&mut self.rest)
            .map(|len| len as usize)
            .map_err(|err| self.read_error(start, "array", err))
    }

    pub fn read_map_len(&mut self) -> Result<usize, DecodeError> {
        let start = self.position();
        decode::read_map_len(&mut self.rest)
            .map(|len| len as usize)
            .map_err(|err| self.read_error(start, "map", err))
    }

    /// Reads a list whose elements are decoded by `item`.
    /// A nil marker decodes as an empty list.
    pub fn read_list<T, F>(&mut self, mut item: F) -> Result<Vec<T>, DecodeError>
    where
        F: FnMut(&mut Decoder<'a>) -> Result<T, DecodeError>,
    {
        if self.consume_nil()? {
            return Ok(Vec::new());
        }
        let len = self.read_array_len()?;
        self.nested(|dec| {
            let mut items = Vec::with_capacity(len.min(dec.remaining()));
            for _ in 0..len {
                items.push(item(dec)?);
            }
            Ok(items)
        })
    }

    /// Reads a string-keyed map of strings. A nil marker decodes as an empty map.
    pub fn read_string_map(&mut self) -> Result<BTreeMap<String, String>, DecodeError> {
        if self.consume_nil()? {
            return Ok(BTreeMap::new());
        }
        let len = self.read_map_len()?;
        self.nested(|dec| {
            let mut map = BTreeMap::new();
            for _ in 0..len {
                let key = dec.read_string()?;
                let value = dec.read_string()?;
                map.insert(key, value);
            }
            Ok(map)
        })
    }

    /// Presence-checked read: yields `None` for a nil marker, otherwise
    /// decodes the value with `present`.
    pub fn read_nullable<T, F>(&mut self, present: F) -> Result<Option<T>, DecodeError>
    where
        F: FnOnce(&mut Decoder<'a>) -> Result<T, DecodeError>,
    {
        if self.consume_nil()? {
            return Ok(None);
        }
        present(self).map(Some)
    }

    /// Reads a nested record. Unknown field names are skipped and absent
    /// fields keep their default value.
    pub fn read_record<T: Record>(&mut self) -> Result<T, DecodeError> {
        let count = self.read_map_len()?;
        self.nested(|dec| {
            let mut record = T::default();
            for _ in 0..count {
                let name = dec.read_str()?;
                match T::FIELDS.iter().find(|field| field.name == name) {
                    Some(field) => (field.decode)(&mut record, dec)?,
                    None => dec.skip()?,
                }
            }
            Ok(record)
        })
    }

    /// Consumes exactly one well-formed value without interpreting it.
    pub fn skip(&mut self) -> Result<(), DecodeError> {
        let (marker, tag, offset) = self.next_marker()?;
        match marker {
            Marker::FixPos(_) | Marker::FixNeg(_) | Marker::Null | Marker::True | Marker::False => {
                Ok(())
            }
            Marker::U8 | Marker::I8 => self.take(1).map(drop),
            Marker::U16 | Marker::I16 => self.take(2).map(drop),
            Marker::U32 | Marker::I32 | Marker::F32 => self.take(4).map(drop),
            Marker::U64 | Marker::I64 | Marker::F64 => self.take(8).map(drop),
            Marker::FixStr(len) => self.take(len as usize).map(drop),
            Marker::Str8 | Marker::Bin8 => {
                let len = self.read_be_u8()? as usize;
                self.take(len).map(drop)
            }
            Marker::Str16 | Marker::Bin16 => {
                let len = self.read_be_u16()? as usize;
                self.take(len).map(drop)
            }
            Marker::Str32 | Marker::Bin32 => {
                let len = self.read_be_u32()? as usize;
                self.take(len).map(drop)
            }
            Marker::FixArray(len) => self.skip_values(len as usize),
            Marker::Array16 => {
                let len = self.read_be_u16()? as usize;
                self.skip_values(len)
            }
            Marker::Array32 => {
                let len = self.read_be_u32()? as usize;
                self.skip_values(len)
            }
            Marker::FixMap(len) => self.skip_values(len as usize * 2),
            Marker::Map16 => {
                let len = self.read_be_u16()? as usize;
                self.skip_values(len * 2)
            }
            Marker::Map32 => {
                let len = self.read_be_u32()? as usize;
                self.skip_values(len.saturating_mul(2))
            }
            // Extension payloads carry a one byte type id before the data.
            Marker::FixExt1 => self.take(2).map(drop),
            Marker::FixExt2 => self.take(3).map(drop),
            Marker::FixExt4 => self.take(5).map(drop),
            Marker::FixExt8 => self.take(9).map(drop),
            Marker::FixExt16 => self.take(17).map(drop),
            Marker::Ext8 => {
                let len = self.read_be_u8()? as usize;
                self.take(len + 1).map(drop)
            }
            Marker::Ext16 => {
                let len = self.read_be_u16()? as usize;
                self.take(len + 1).map(drop)
            }
            Marker::Ext32 => {
                let len = self.read_be_u32()? as usize;
                self.take(len.saturating_add(1)).map(drop)
            }
            Marker::Reserved => Err(DecodeError::UnsupportedTag { tag, offset }),
        }
    }

    /// Reads any wire value into its dynamic representation.
    pub fn read_value(&mut self) -> Result<Value, DecodeError> {
        let (marker, tag, offset) = self.next_marker()?;
        let value = match marker {
            Marker::Null => Value::Nil,
            Marker::True => Value::Bool(true),
            Marker::False => Value::Bool(false),
            Marker::FixPos(n) => Value::Int(i64::from(n)),
            Marker::FixNeg(n) => Value::Int(i64::from(n)),
            Marker::U8 => Value::U8(self.read_be_u8()?),
            Marker::U16 => Value::U16(self.read_be_u16()?),
            Marker::U32 => Value::U32(self.read_be_u32()?),
            Marker::U64 => Value::U64(self.read_be_u64()?),
            Marker::I8 => Value::Int(i64::from(self.read_be_u8()? as i8)),
            Marker::I16 => Value::Int(i64::from(self.read_be_u16()? as i16)),
            Marker::I32 => Value::Int(i64::from(self.read_be_u32()? as i32)),
            Marker::I64 => Value::Int(self.read_be_u64()? as i64),
            Marker::F32 => Value::F32(f32::from_bits(self.read_be_u32()?)),
            Marker::F64 => Value::F64(f64::from_bits(self.read_be_u64()?)),
            Marker::FixStr(len) => self.string_value(len as usize)?,
            Marker::Str8 => {
                let len = self.read_be_u8()? as usize;
                self.string_value(len)?
            }
            Marker::Str16 => {
                let len = self.read_be_u16()? as usize;
                self.string_value(len)?
            }
            Marker::Str32 => {
                let len = self.read_be_u32()? as usize;
                self.string_value(len)?
            }
            Marker::Bin8 => {
                let len = self.read_be_u8()? as usize;
                Value::Bin(self.take(len)?.to_vec())
            }
            Marker::Bin16 => {
                let len = self.read_be_u16()? as usize;
                Value::Bin(self.take(len)?.to_vec())
            }
            Marker::Bin32 => {
                let len = self.read_be_u32()? as usize;
                Value::Bin(self.take(len)?.to_vec())
            }
            Marker::FixArray(len) => self.array_value(len as usize)?,
            Marker::Array16 => {
                let len = self.read_be_u16()? as usize;
                self.array_value(len)?
            }
            Marker::Array32 => {
                let len = self.read_be_u32()? as usize;
                self.array_value(len)?
            }
            Marker::FixMap(len) => self.map_value(len as usize)?,
            Marker::Map16 => {
                let len = self.read_be_u16()? as usize;
                self.map_value(len)?
            }
            Marker::Map32 => {
                let len = self.read_be_u32()? as usize;
                self.map_value(len)?
            }
            Marker::FixExt1 => self.ext_value(1)?,
            Marker::FixExt2 => self.ext_value(2)?,
            Marker::FixExt4 => self.ext_value(4)?,
            Marker::FixExt8 => self.ext_value(8)?,
            Marker::FixExt16 => self.ext_value(16)?,
            Marker::Ext8 => {
                let len = self.read_be_u8()? as usize;
                self.ext_value(len)?
            }
            Marker::Ext16 => {
                let len = self.read_be_u16()? as usize;
                self.ext_value(len)?
            }
            Marker::Ext32 => {
                let len = self.read_be_u32()? as usize;
                self.ext_value(len)?
            }
            Marker::Reserved => return Err(DecodeError::UnsupportedTag { tag, offset }),
        };
        Ok(value)
    }

    /// Producers write the smallest marker that holds the value, so a field
    /// accepts positive fixints and every unsigned marker up to its width.
    /// Signed markers and wider unsigned markers are type mismatches.
    fn read_unsigned<T: TryFrom<u64>>(
        &mut self,
        expected: &'static str,
        bits: u32,
    ) -> Result<T, DecodeError> {
        let (marker, found, offset) = self.next_marker()?;
        let mismatch = DecodeError::TypeMismatch {
            expected,
            found,
            offset,
        };
        let value = match marker {
            Marker::FixPos(n) => u64::from(n),
            Marker::U8 => u64::from(self.read_be_u8()?),
            Marker::U16 if bits >= 16 => u64::from(self.read_be_u16()?),
            Marker::U32 if bits >= 32 => u64::from(self.read_be_u32()?),
            Marker::U64 if bits >= 64 => self.read_be_u64()?,
            _ => return Err(mismatch),
        };
        T::try_from(value).map_err(|_| mismatch)
    }

    fn consume_nil(&mut self) -> Result<bool, DecodeError> {
        if self.is_next_nil()? {
            self.take(1)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn nested<T, F>(&mut self, body: F) -> Result<T, DecodeError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecodeError>,
    {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(DecodeError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    fn skip_values(&mut self, count: usize) -> Result<(), DecodeError> {
        self.nested(|dec| {
            for _ in 0..count {
                dec.skip()?;
            }
            Ok(())
        })
    }

    fn string_value(&mut self, len: usize) -> Result<Value, DecodeError> {
        let offset = self.position();
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(|text| Value::Str(text.to_owned()))
            .map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    fn array_value(&mut self, len: usize) -> Result<Value, DecodeError> {
        self.nested(|dec| {
            let mut items = Vec::with_capacity(len.min(dec.remaining()));
            for _ in 0..len {
                items.push(dec.read_value()?);
            }
            Ok(Value::Array(items))
        })
    }

    fn map_value(&mut self, len: usize) -> Result<Value, DecodeError> {
        self.nested(|dec| {
            let mut entries = Vec::with_capacity(len.min(dec.remaining()));
            for _ in 0..len {
                let key = dec.read_value()?;
                let value = dec.read_value()?;
                entries.push((key, value));
            }
            Ok(Value::Map(entries))
        })
    }

    fn ext_value(&mut self, len: usize) -> Result<Value, DecodeError> {
        let kind = self.read_be_u8()? as i8;
        Ok(Value::Ext(kind, self.take(len)?.to_vec()))
    }

    fn next_marker(&mut self) -> Result<(Marker, u8, usize), DecodeError> {
        let offset = self.position();
        let tag = self.read_be_u8()?;
        Ok((Marker::from_u8(tag), tag, offset))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.rest.len() < len {
            return Err(self.truncated());
        }
        let (head, tail) = self.rest.split_at(len);
        self.rest = tail;
        Ok(head)
    }

    fn read_be_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn read_be_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_be_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_be_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(raw))
    }

    fn truncated(&self) -> DecodeError {
        DecodeError::Truncated {
            offset: self.position(),
        }
    }

    fn read_error(
        &self,
        start: usize,
        expected: &'static str,
        err: ValueReadError<std::io::Error>,
    ) -> DecodeError {
        match err {
            ValueReadError::TypeMismatch(marker) => DecodeError::TypeMismatch {
                expected,
                found: marker.to_u8(),
                offset: start,
            },
            ValueReadError::InvalidMarkerRead(_) | ValueReadError::InvalidDataRead(_) => {
                self.truncated()
            }
        }
    }
}
