//! Length-prefixed opaque fields shared by the extension and cookie codecs.
//!
//! Decoding walks slices (nom style), so the only side effect of a read is
//! the returned remainder. All failures map to [`Error::DecodeError`] which
//! the caller turns into a fatal `decode_error` alert.

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u8};

use crate::Error;

/// Read a 16-bit big-endian length prefix followed by that many bytes.
/// Returns (remainder, data).
pub fn read_bytes16(input: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    let (input, len) = be_u16::<_, nom::error::Error<&[u8]>>(input)
        .map_err(|_| Error::DecodeError("truncated 16-bit length prefix"))?;
    let (input, data) = take::<_, _, nom::error::Error<&[u8]>>(len as usize)(input)
        .map_err(|_| Error::DecodeError("declared length exceeds remaining buffer"))?;
    Ok((input, data))
}

/// Write a 16-bit big-endian length prefix followed by the raw bytes.
pub fn write_bytes16(output: &mut Vec<u8>, bytes: &[u8]) -> Result<(), Error> {
    if bytes.len() > 0xFFFF {
        return Err(Error::OversizedField(bytes.len()));
    }
    output.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    output.extend_from_slice(bytes);
    Ok(())
}

/// Read an 8-bit length prefix followed by that many bytes.
pub fn read_bytes8(input: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    let (input, len) = be_u8::<_, nom::error::Error<&[u8]>>(input)
        .map_err(|_| Error::DecodeError("truncated 8-bit length prefix"))?;
    let (input, data) = take::<_, _, nom::error::Error<&[u8]>>(len as usize)(input)
        .map_err(|_| Error::DecodeError("declared length exceeds remaining buffer"))?;
    Ok((input, data))
}

/// Write an 8-bit length prefix followed by the raw bytes.
pub fn write_bytes8(output: &mut Vec<u8>, bytes: &[u8]) -> Result<(), Error> {
    if bytes.len() > 0xFF {
        return Err(Error::OversizedField(bytes.len()));
    }
    output.push(bytes.len() as u8);
    output.extend_from_slice(bytes);
    Ok(())
}
