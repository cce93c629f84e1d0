use crate::codec::reader::Decoder;
use crate::codec::writer::Encoder;
use crate::errors::{DecodeError, EncodeError};

/// Reads one field's value from the wire into a record under construction.
pub type DecodeFn<T> = fn(&mut T, &mut Decoder<'_>) -> Result<(), DecodeError>;

/// Writes one field's value from a record.
pub type EncodeFn<T> = fn(&T, &mut Encoder<'_>) -> Result<(), EncodeError>;

/// Entry of a record's declarative field table.
pub struct Field<T: 'static> {
    /// Name written on the wire.
    pub name: &'static str,
    pub decode: DecodeFn<T>,
    pub encode: EncodeFn<T>,
}

/// A structured value encoded as a map of named fields.
///
/// `FIELDS` fixes both the accepted names and the encoding order. Names not
/// listed are skipped on decode, and fields missing from the wire keep their
/// `Default` value.
pub trait Record: Default + 'static {
    const FIELDS: &'static [Field<Self>];
}

impl<T: 'static> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Record with no fields, used for operations that take or return nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty;

impl Record for Empty {
    const FIELDS: &'static [Field<Self>] = &[];
}
