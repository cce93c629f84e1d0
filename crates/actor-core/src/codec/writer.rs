use std::collections::BTreeMap;
use std::io::{self, Write};

use rmp::encode::{self, ValueWriteError};

use crate::codec::record::Record;
use crate::codec::value::Value;
use crate::errors::EncodeError;

impl From<ValueWriteError<io::Error>> for EncodeError {
    fn from(err: ValueWriteError<io::Error>) -> Self {
        match err {
            ValueWriteError::InvalidMarkerWrite(err) | ValueWriteError::InvalidDataWrite(err) => {
                EncodeError::from(err)
            }
        }
    }
}

struct CountingSink<'w> {
    inner: &'w mut dyn Write,
    written: u64,
}

impl Write for CountingSink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes wire values into a byte sink.
///
/// Unsigned integers are always written at their declared width, so a `u64`
/// field occupies nine bytes even when its value is zero.
pub struct Encoder<'w> {
    sink: CountingSink<'w>,
}

impl<'w> Encoder<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self {
            sink: CountingSink {
                inner: sink,
                written: 0,
            },
        }
    }

    /// Total bytes accepted by the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.sink.written
    }

    /// Writes the nil marker, the absent form of a nullable value.
    pub fn write_nil(&mut self) -> Result<(), EncodeError> {
        encode::write_nil(&mut self.sink)?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), EncodeError> {
        encode::write_bool(&mut self.sink, value)?;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), EncodeError> {
        encode::write_u8(&mut self.sink, value)?;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), EncodeError> {
        encode::write_u16(&mut self.sink, value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), EncodeError> {
        encode::write_u32(&mut self.sink, value)?;
        Ok(())
    }

    /// Always nine bytes: the `u64` marker plus the big-endian value.
    pub fn write_u64(&mut self, value: u64) -> Result<(), EncodeError> {
        encode::write_u64(&mut self.sink, value)?;
        Ok(())
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), EncodeError> {
        wire_len(value.len())?;
        encode::write_str(&mut self.sink, value)?;
        Ok(())
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> Result<(), EncodeError> {
        wire_len(value.len())?;
        encode::write_bin(&mut self.sink, value)?;
        Ok(())
    }

    pub fn write_array_len(&mut self, len: usize) -> Result<(), EncodeError> {
        encode::write_array_len(&mut self.sink, wire_len(len)?)?;
        Ok(())
    }

    pub fn write_map_len(&mut self, len: usize) -> Result<(), EncodeError> {
        encode::write_map_len(&mut self.sink, wire_len(len)?)?;
        Ok(())
    }

    /// Writes a list, encoding each element with `item`. An empty slice is
    /// written as a zero-length array.
    pub fn write_list<T, F>(&mut self, items: &[T], mut item: F) -> Result<(), EncodeError>
    where
        F: FnMut(&mut Self, &T) -> Result<(), EncodeError>,
    {
        self.write_array_len(items.len())?;
        for value in items {
            item(self, value)?;
        }
        Ok(())
    }

    pub fn write_string_map(&mut self, map: &BTreeMap<String, String>) -> Result<(), EncodeError> {
        self.write_map_len(map.len())?;
        for (key, value) in map {
            self.write_str(key)?;
            self.write_str(value)?;
        }
        Ok(())
    }

    /// Writes the presence tag for an optional value: nil when absent,
    /// otherwise the value itself via `present`.
    pub fn write_nullable<T, F>(&mut self, value: Option<&T>, present: F) -> Result<(), EncodeError>
    where
        T: ?Sized,
        F: FnOnce(&mut Self, &T) -> Result<(), EncodeError>,
    {
        match value {
            Some(value) => present(self, value),
            None => self.write_nil(),
        }
    }

    /// Writes a record as a map of every declared field, in table order.
    pub fn write_record<T: Record>(&mut self, record: &T) -> Result<(), EncodeError> {
        self.write_map_len(T::FIELDS.len())?;
        for field in T::FIELDS {
            self.write_str(field.name)?;
            (field.encode)(record, self)?;
        }
        Ok(())
    }

    pub fn write_value(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(flag) => self.write_bool(*flag),
            Value::U8(n) => self.write_u8(*n),
            Value::U16(n) => self.write_u16(*n),
            Value::U32(n) => self.write_u32(*n),
            Value::U64(n) => self.write_u64(*n),
            Value::Int(n) => {
                encode::write_sint(&mut self.sink, *n)?;
                Ok(())
            }
            Value::F32(n) => {
                encode::write_f32(&mut self.sink, *n)?;
                Ok(())
            }
            Value::F64(n) => {
                encode::write_f64(&mut self.sink, *n)?;
                Ok(())
            }
            Value::Str(text) => self.write_str(text),
            Value::Bin(bytes) => self.write_bytes(bytes),
            Value::Array(items) => self.write_list(items, |enc, item| enc.write_value(item)),
            Value::Map(entries) => {
                self.write_map_len(entries.len())?;
                for (key, value) in entries {
                    self.write_value(key)?;
                    self.write_value(value)?;
                }
                Ok(())
            }
            Value::Ext(kind, data) => {
                encode::write_ext_meta(&mut self.sink, wire_len(data.len())?, *kind)?;
                self.sink.write_all(data)?;
                Ok(())
            }
        }
    }
}

fn wire_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::LengthOverflow { len })
}
