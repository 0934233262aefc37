//! Bounds-checked positional reads over a peer-supplied byte buffer.

use bytes::Buf;

use crate::error::DecodeError;

/// Read-only view over a buffer of known length. Every read checks its byte
/// range against the buffer first and fails instead of reading past it.
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    data: &'a [u8],
}

impl<'a> ByteView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// The `n` bytes starting at `pos`, if the whole range is inside the buffer.
    fn range(&self, pos: usize, n: usize) -> Result<&'a [u8], DecodeError> {
        let out_of_bounds = DecodeError::OutOfBounds {
            pos,
            n,
            size: self.data.len(),
        };
        match pos.checked_add(n) {
            Some(end) if end <= self.data.len() => Ok(&self.data[pos..end]),
            _ => Err(out_of_bounds),
        }
    }

    pub fn read_i8(&self, pos: usize) -> Result<i8, DecodeError> {
        Ok(self.range(pos, 1)?.get_i8())
    }

    /// Big-endian `i16` at `pos`.
    pub fn read_i16(&self, pos: usize) -> Result<i16, DecodeError> {
        Ok(self.range(pos, 2)?.get_i16())
    }

    /// Big-endian `i32` at `pos`.
    pub fn read_i32(&self, pos: usize) -> Result<i32, DecodeError> {
        Ok(self.range(pos, 4)?.get_i32())
    }

    /// Length-prefixed string at `pos`: an `i16` length followed by that many
    /// raw bytes. Returns the bytes; the string occupies `2 + len` bytes.
    pub fn read_string(&self, pos: usize) -> Result<&'a [u8], DecodeError> {
        let length = self.read_i16(pos)?;
        if length < 0 {
            return Err(DecodeError::NegativeLength { pos, length });
        }
        self.range(pos + 2, length as usize)
    }

    /// Uppercase hex, eight bytes per line.
    pub fn hex_dump(&self) -> String {
        const BYTES_PER_LINE: usize = 8;
        self.data
            .chunks(BYTES_PER_LINE)
            .map(|line| {
                line.iter()
                    .map(|b| format!("{:02X}", b))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
