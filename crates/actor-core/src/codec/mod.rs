//! Self-describing binary record codec.
//!
//! Records travel as MessagePack maps keyed by field name:
//! `[fieldCount][(name, value) x fieldCount]`. Lists are
//! `[count][elements]`, string maps are `[pairs][(key, value)]` and nullable
//! values are always preceded by an explicit presence tag (nil when absent).
//!
//! Decoders look each name up in the record's [`Field`] table and skip
//! anything they do not recognise, so a schema may append fields without
//! breaking older readers.

mod reader;
mod record;
mod value;
mod writer;

use std::io::Write;

pub use reader::{Decoder, MAX_NESTING_DEPTH};
pub use record::{DecodeFn, Empty, EncodeFn, Field, Record};
pub use value::Value;
pub use writer::Encoder;

use crate::errors::{DecodeError, EncodeError};

/// Encodes `record` into `sink`, returning the number of bytes written.
pub fn encode<T: Record>(record: &T, sink: &mut dyn Write) -> Result<u64, EncodeError> {
    let mut encoder = Encoder::new(sink);
    encoder.write_record(record)?;
    Ok(encoder.bytes_written())
}

/// Encodes an optional record, writing a nil marker when absent.
pub fn encode_nullable<T: Record>(
    record: Option<&T>,
    sink: &mut dyn Write,
) -> Result<u64, EncodeError> {
    let mut encoder = Encoder::new(sink);
    encoder.write_nullable(record, |enc, record| enc.write_record(record))?;
    Ok(encoder.bytes_written())
}

/// Encodes `record` into a freshly allocated buffer.
pub fn to_bytes<T: Record>(record: &T) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    encode(record, &mut bytes)?;
    Ok(bytes)
}

/// Decodes one record from the start of `bytes`. Trailing bytes are ignored.
pub fn decode<T: Record>(bytes: &[u8]) -> Result<T, DecodeError> {
    Decoder::new(bytes).read_record()
}

/// Decodes an operation payload. A zero-length payload means "no payload"
/// and yields the record's default value.
pub fn decode_payload<T: Record>(bytes: &[u8]) -> Result<T, DecodeError> {
    if bytes.is_empty() {
        return Ok(T::default());
    }
    decode(bytes)
}

/// Decodes an optional record: a leading nil marker yields `None`.
pub fn decode_nullable<T: Record>(bytes: &[u8]) -> Result<Option<T>, DecodeError> {
    Decoder::new(bytes).read_nullable(|dec| dec.read_record())
}
