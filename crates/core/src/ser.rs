//! A simple trait for binary (de)Serialization using std `Read` and `Write` traits, and the
//! canonical encoding primitives it is built on.
//!
//! The canonical format is XDR-style:
//!
//! - fixed-width integers are big-endian,
//! - variable-length arrays carry a 4-byte big-endian element count,
//! - unions carry a 4-byte big-endian discriminant followed by the active arm only,
//! - opaque data is emitted verbatim and zero-padded to a multiple of 4 bytes.
//!
//! There is no total-length framing. A decoder walks the same grammar field by field.

use base64::Engine;
use std::io::{Cursor, Error as IOError, Read, Write};

use thiserror::Error;

/// Errors related to serialization of types.
#[derive(Debug, Error)]
pub enum SerError {
    /// IOError bubbled up from a `Write` passed to a `ByteFormat::write_to` implementation.
    #[error(transparent)]
    IOError(#[from] IOError),

    /// A length-bounded array or opaque exceeded its bound.
    #[error("Length {got} exceeds the maximum of {max}")]
    LengthExceeded {
        /// The maximum permitted length
        max: usize,
        /// The actual length
        got: usize,
    },

    /// Boolean and optional flags must be exactly 0 or 1.
    #[error("Expected a 0 or 1 flag. Got {0}")]
    InvalidFlag(u32),

    /// A union discriminant did not select a known arm.
    #[error("Unknown {kind} discriminant: {value}")]
    UnknownDiscriminant {
        /// The union being decoded
        kind: &'static str,
        /// The discriminant read from the stream
        value: u32,
    },

    /// Opaque padding must be zero bytes.
    #[error("Non-zero padding bytes")]
    NonZeroPadding,

    /// Bytes remained in the input after a complete document was decoded.
    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),

    /// `deserialize_hex` encountered an error on its input.
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    /// `deserialize_base64` encountered an error on its input.
    #[error(transparent)]
    Base64Error(#[from] base64::DecodeError),

    /// A string field did not contain UTF-8.
    #[error(transparent)]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// A component of a composite type failed to decode, described by the message.
    #[error("{0}")]
    ComponentError(String),
}

/// Type alias for serialization errors
pub type SerResult<T> = Result<T, SerError>;

/// Returns the number of zero bytes needed to pad `len` to a multiple of 4.
pub fn padding_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Write a big-endian u32.
pub fn write_u32<W>(writer: &mut W, number: u32) -> SerResult<usize>
where
    W: Write,
{
    writer.write_all(&number.to_be_bytes())?;
    Ok(4)
}

/// Write a big-endian u64.
pub fn write_u64<W>(writer: &mut W, number: u64) -> SerResult<usize>
where
    W: Write,
{
    writer.write_all(&number.to_be_bytes())?;
    Ok(8)
}

/// Write a big-endian, two's complement i64.
pub fn write_i64<W>(writer: &mut W, number: i64) -> SerResult<usize>
where
    W: Write,
{
    writer.write_all(&number.to_be_bytes())?;
    Ok(8)
}

/// Read a big-endian u32.
pub fn read_u32<R>(reader: &mut R) -> SerResult<u32>
where
    R: Read,
{
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Read a big-endian u64.
pub fn read_u64<R>(reader: &mut R) -> SerResult<u64>
where
    R: Read,
{
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

/// Read a big-endian i64.
pub fn read_i64<R>(reader: &mut R) -> SerResult<i64>
where
    R: Read,
{
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(i64::from_be_bytes(buf))
}

/// Write a boolean or optional-presence flag as a 4-byte 0 or 1.
pub fn write_flag<W>(writer: &mut W, flag: bool) -> SerResult<usize>
where
    W: Write,
{
    write_u32(writer, flag as u32)
}

/// Read a boolean or optional-presence flag. Anything other than 0 or 1 is an error.
pub fn read_flag<R>(reader: &mut R) -> SerResult<bool>
where
    R: Read,
{
    match read_u32(reader)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(SerError::InvalidFlag(other)),
    }
}

/// Write fixed-size opaque data verbatim, followed by zero padding to a multiple of 4.
pub fn write_fixed_opaque<W>(writer: &mut W, bytes: &[u8]) -> SerResult<usize>
where
    W: Write,
{
    let padding = padding_len(bytes.len());
    writer.write_all(bytes)?;
    writer.write_all(&[0u8; 3][..padding])?;
    Ok(bytes.len() + padding)
}

fn read_padding<R>(reader: &mut R, len: usize) -> SerResult<()>
where
    R: Read,
{
    let mut buf = [0u8; 3];
    let padding = &mut buf[..padding_len(len)];
    reader.read_exact(padding)?;
    if padding.iter().any(|b| *b != 0) {
        return Err(SerError::NonZeroPadding);
    }
    Ok(())
}

/// Read `N` bytes of fixed-size opaque data and consume its padding.
pub fn read_fixed_opaque<R, const N: usize>(reader: &mut R) -> SerResult<[u8; N]>
where
    R: Read,
{
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    read_padding(reader, N)?;
    Ok(buf)
}

/// The encoded length of a variable-length opaque of `len` bytes.
pub fn var_opaque_length(len: usize) -> usize {
    4 + len + padding_len(len)
}

/// Write variable-length opaque data: a 4-byte length, the bytes, then zero padding.
/// Errors if `bytes` is longer than `max`.
pub fn write_var_opaque<W>(writer: &mut W, bytes: &[u8], max: usize) -> SerResult<usize>
where
    W: Write,
{
    if bytes.len() > max {
        return Err(SerError::LengthExceeded {
            max,
            got: bytes.len(),
        });
    }
    let mut len = write_u32(writer, bytes.len() as u32)?;
    len += write_fixed_opaque(writer, bytes)?;
    Ok(len)
}

/// Read variable-length opaque data of at most `max` bytes.
pub fn read_var_opaque<R>(reader: &mut R, max: usize) -> SerResult<Vec<u8>>
where
    R: Read,
{
    let len = read_u32(reader)? as usize;
    if len > max {
        return Err(SerError::LengthExceeded { max, got: len });
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    read_padding(reader, len)?;
    Ok(buf)
}

/// Write a string of at most `max` bytes. Strings share the variable opaque layout.
pub fn write_string<W>(writer: &mut W, s: &str, max: usize) -> SerResult<usize>
where
    W: Write,
{
    write_var_opaque(writer, s.as_bytes(), max)
}

/// Read a UTF-8 string of at most `max` bytes.
pub fn read_string<R>(reader: &mut R, max: usize) -> SerResult<String>
where
    R: Read,
{
    Ok(String::from_utf8(read_var_opaque(reader, max)?)?)
}

/// The encoded length of a variable-length array.
pub fn array_length<T: ByteFormat>(items: &[T]) -> usize {
    4 + items.iter().map(ByteFormat::serialized_length).sum::<usize>()
}

/// Write a variable-length array: a 4-byte element count followed by each element's own
/// encoding, in order, with no padding between elements. If `max` is set, longer arrays are
/// rejected before anything is written.
pub fn write_array<W, T>(writer: &mut W, items: &[T], max: Option<usize>) -> Result<usize, T::Error>
where
    W: Write,
    T: ByteFormat,
{
    if let Some(max) = max {
        if items.len() > max {
            return Err(SerError::LengthExceeded {
                max,
                got: items.len(),
            }
            .into());
        }
    }
    let mut len = write_u32(writer, items.len() as u32)?;
    for item in items.iter() {
        len += item.write_to(writer)?;
    }
    Ok(len)
}

/// Read a variable-length array, rejecting counts above `max` before reading any element.
pub fn read_array<R, T>(reader: &mut R, max: Option<usize>) -> Result<Vec<T>, T::Error>
where
    R: Read,
    T: ByteFormat,
{
    let count = read_u32(reader)? as usize;
    if let Some(max) = max {
        if count > max {
            return Err(SerError::LengthExceeded { max, got: count }.into());
        }
    }
    // The count is untrusted. Grow as elements actually arrive.
    let mut items = vec![];
    for _ in 0..count {
        items.push(T::read_from(reader)?);
    }
    Ok(items)
}

/// A simple trait for deserializing from `std::io::Read` and serializing to `std::io::Write`.
///
/// `ByteFormat` is used for transaction encoding, hashing and decoding. We provide
/// implementations for the canonical primitives: `u32`, `u64`, `i64`, `bool`, fixed-size byte
/// arrays, `Option<T>` (an optional: presence flag then value) and `Vec<T>` (an unbounded
/// variable-length array).
pub trait ByteFormat {
    /// An associated error type
    type Error: From<SerError> + From<std::io::Error> + std::error::Error;

    /// Returns the byte-length of the serialized data structure.
    fn serialized_length(&self) -> usize;

    /// Deserializes an instance of `Self` from a `std::io::Read`.
    fn read_from<R>(reader: &mut R) -> Result<Self, Self::Error>
    where
        R: Read,
        Self: std::marker::Sized;

    /// Serializes `self` to a `std::io::Write`. Following `Write` trait conventions, its `Ok`
    /// type is a `usize` denoting the number of bytes written.
    ///
    /// ```
    /// use lumens_core::ser::ByteFormat;
    ///
    /// let mut buf: Vec<u8> = vec![];
    /// let written = 7u32.write_to(&mut buf).unwrap();
    ///
    /// assert_eq!(written, 4);
    /// assert_eq!(buf, vec![0, 0, 0, 7]);
    /// ```
    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write;

    /// Serializes `self` to a new byte vector.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        let mut v: Vec<u8> = Vec::with_capacity(self.serialized_length());
        self.write_to(&mut v)?;
        Ok(v)
    }

    /// Deserializes a complete document. Errors if any bytes remain after `Self` is read.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>
    where
        Self: std::marker::Sized,
    {
        let mut cursor = Cursor::new(bytes);
        let result = Self::read_from(&mut cursor)?;
        let remaining = bytes.len() - cursor.position() as usize;
        if remaining != 0 {
            return Err(SerError::TrailingBytes(remaining).into());
        }
        Ok(result)
    }

    /// Decodes a hex string to a `Vec<u8>`, deserializes an instance of `Self` from that vector.
    fn deserialize_hex(s: &str) -> Result<Self, Self::Error>
    where
        Self: std::marker::Sized,
    {
        let v: Vec<u8> = hex::decode(s).map_err(SerError::from)?;
        Self::from_bytes(&v)
    }

    /// Serializes `self` to a vector, returns the hex-encoded vector
    fn serialize_hex(&self) -> Result<String, Self::Error> {
        Ok(hex::encode(self.to_bytes()?))
    }

    /// Decodes a standard base64 string and deserializes an instance of `Self` from it.
    fn deserialize_base64(s: &str) -> Result<Self, Self::Error>
    where
        Self: std::marker::Sized,
    {
        let v: Vec<u8> = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(SerError::from)?;
        Self::from_bytes(&v)
    }

    /// Serializes `self` to a vector, returns the standard base64-encoded vector.
    fn serialize_base64(&self) -> Result<String, Self::Error> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.to_bytes()?))
    }
}

impl ByteFormat for u32 {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        4
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        read_u32(reader)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        write_u32(writer, *self)
    }
}

impl ByteFormat for u64 {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        8
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        read_u64(reader)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        write_u64(writer, *self)
    }
}

impl ByteFormat for i64 {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        8
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        read_i64(reader)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        write_i64(writer, *self)
    }
}

impl ByteFormat for bool {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        4
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        read_flag(reader)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        write_flag(writer, *self)
    }
}

impl<const N: usize> ByteFormat for [u8; N] {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        N + padding_len(N)
    }

    fn read_from<R>(reader: &mut R) -> SerResult<Self>
    where
        R: Read,
    {
        read_fixed_opaque(reader)
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        write_fixed_opaque(writer, self)
    }
}

impl<T: ByteFormat> ByteFormat for Option<T> {
    type Error = T::Error;

    fn serialized_length(&self) -> usize {
        4 + self.as_ref().map_or(0, ByteFormat::serialized_length)
    }

    fn read_from<R>(reader: &mut R) -> Result<Self, Self::Error>
    where
        R: Read,
    {
        if read_flag(reader)? {
            Ok(Some(T::read_from(reader)?))
        } else {
            Ok(None)
        }
    }

    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        match self {
            Some(item) => Ok(write_flag(writer, true)? + item.write_to(writer)?),
            None => Ok(write_flag(writer, false)?),
        }
    }
}

impl<T: ByteFormat> ByteFormat for Vec<T> {
    type Error = T::Error;

    fn serialized_length(&self) -> usize {
        array_length(self)
    }

    fn read_from<R>(reader: &mut R) -> Result<Self, Self::Error>
    where
        R: Read,
    {
        read_array(reader, None)
    }

    fn write_to<W>(&self, writer: &mut W) -> Result<usize, Self::Error>
    where
        W: Write,
    {
        write_array(writer, self, None)
    }
}
