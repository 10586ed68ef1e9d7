//! Fixed-offset record reading

use crate::error::ExsError;
use crate::module::Endian;

/// A view of one record inside the container, addressed by offsets relative to its start
pub(crate) struct Record<'a> {
    data: &'a [u8],
    start: usize,
    endian: Endian,
    what: &'static str,
}

impl<'a> Record<'a> {
    pub(crate) fn new(data: &'a [u8], start: usize, endian: Endian, what: &'static str) -> Self {
        Self {
            data,
            start,
            endian,
            what,
        }
    }

    /// Fail unless `len` bytes from the record start are inside the buffer
    pub(crate) fn require(&self, len: usize) -> Result<(), ExsError> {
        if self.fits(len) {
            Ok(())
        } else {
            Err(self.eof(self.data.len()))
        }
    }

    pub(crate) fn fits(&self, len: usize) -> bool {
        self.start
            .checked_add(len)
            .is_some_and(|end| end <= self.data.len())
    }

    pub(crate) fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], ExsError> {
        let at = self.start + offset;
        self.data.get(at..at + len).ok_or_else(|| self.eof(at))
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], ExsError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.bytes(offset, N)?);
        Ok(buf)
    }

    pub(crate) fn u8(&self, offset: usize) -> Result<u8, ExsError> {
        Ok(self.array::<1>(offset)?[0])
    }

    pub(crate) fn i8(&self, offset: usize) -> Result<i8, ExsError> {
        Ok(i8::from_ne_bytes(self.array::<1>(offset)?))
    }

    pub(crate) fn i16(&self, offset: usize) -> Result<i16, ExsError> {
        let buf = self.array::<2>(offset)?;
        Ok(match self.endian {
            Endian::Little => i16::from_le_bytes(buf),
            Endian::Big => i16::from_be_bytes(buf),
        })
    }

    pub(crate) fn u32(&self, offset: usize) -> Result<u32, ExsError> {
        let buf = self.array::<4>(offset)?;
        Ok(match self.endian {
            Endian::Little => u32::from_le_bytes(buf),
            Endian::Big => u32::from_be_bytes(buf),
        })
    }

    pub(crate) fn i32(&self, offset: usize) -> Result<i32, ExsError> {
        Ok(self.u32(offset)? as i32)
    }

    pub(crate) fn string(&self, offset: usize, len: usize) -> Result<String, ExsError> {
        Ok(decode_string(self.bytes(offset, len)?))
    }

    fn eof(&self, offset: usize) -> ExsError {
        ExsError::UnexpectedEof {
            what: self.what,
            offset,
        }
    }
}

/// Decode a fixed-width name field
///
/// Trailing NULs are dropped, then every remaining control character
/// (including NULs embedded before garbage) is stripped. Decoding an
/// already decoded string returns it unchanged.
pub fn decode_string(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |last| last + 1);
    String::from_utf8_lossy(&bytes[..end])
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}
