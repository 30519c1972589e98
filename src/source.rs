use crate::error::{DecodeError, FormatError};
use log::trace;

/// Byte order of the 2-byte header and table words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub fn word(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Big => u16::from_be_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
        }
    }
}

/// Random-access reader over the DDB image.
///
/// Offsets are relative to the start of the DDB data, i.e. any container
/// prefix given to [`ByteSource::new`] is already skipped.
#[derive(Debug, Clone)]
pub struct ByteSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteSource<'a> {
    /// Create a source that starts `prefix` bytes into `bytes`
    pub fn new(bytes: &'a [u8], prefix: usize) -> Result<Self, FormatError> {
        if prefix > bytes.len() {
            return Err(FormatError::OffsetBeyondFile {
                offset: prefix,
                len: bytes.len(),
            });
        }
        Ok(ByteSource {
            bytes: &bytes[prefix..],
            pos: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, offset: usize) {
        self.pos = offset;
    }

    /// Move the cursor relative to where it is now
    pub fn skip(&mut self, delta: isize) {
        self.pos = self.pos.saturating_add_signed(delta);
    }

    /// Read a byte at an absolute offset without moving the cursor
    pub fn byte_at(&self, offset: usize) -> Result<u8, DecodeError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or(DecodeError::OutOfBounds {
                offset,
                len: self.bytes.len(),
            })
    }

    /// Read a 2-byte word at an absolute offset without moving the cursor
    pub fn word_at(&self, offset: usize, order: ByteOrder) -> Result<u16, DecodeError> {
        let hi = self.byte_at(offset)?;
        let lo = self.byte_at(offset + 1)?;
        Ok(order.word([hi, lo]))
    }

    pub fn peek_byte(&self) -> Result<u8, DecodeError> {
        self.byte_at(self.pos)
    }

    pub fn next_byte(&mut self) -> Result<u8, DecodeError> {
        let b = self.byte_at(self.pos)?;
        trace!("byte {:02x} at {:#06x}", b, self.pos);
        self.pos += 1;
        Ok(b)
    }

    pub fn next_word(&mut self, order: ByteOrder) -> Result<u16, DecodeError> {
        let w = self.word_at(self.pos, order)?;
        self.pos += 2;
        Ok(w)
    }
}
