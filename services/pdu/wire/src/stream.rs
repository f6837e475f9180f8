//! Cursor-based views over fixed byte buffers.
//!
//! [`InputStream`] reads sequentially from an immutable slice and
//! [`OutputStream`] writes sequentially into a mutable one. Every access is
//! range-checked before any bytes are touched; neither type ever reads or
//! writes past the end of its slice.

use crate::error::{WireError, WireResult};
use bytes::{Buf, BufMut};
use tracing::trace;

/// Sequential reader over a borrowed buffer
#[derive(Debug, Clone)]
pub struct InputStream<'a> {
    rest: &'a [u8],
    position: usize,
}

impl<'a> InputStream<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            rest: data,
            position: 0,
        }
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.rest.len()
    }

    /// Whether any unread bytes are left
    pub fn has_remaining(&self) -> bool {
        !self.rest.is_empty()
    }

    /// Offset of the cursor from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// The unread suffix of the buffer
    pub fn pointer(&self) -> &'a [u8] {
        self.rest
    }

    /// Check that a fixed header of `size` bytes fits in what is left.
    ///
    /// Fails with `MalformedPacket` reporting the whole header size, so a
    /// node decoding several fields reports one error for its header rather
    /// than for whichever field ran short.
    pub fn require_header(&self, size: usize) -> WireResult<()> {
        let available = self.rest.len();
        if size > available {
            trace!(size, available, position = self.position, "short header");
            return Err(WireError::MalformedPacket {
                needed: size,
                available,
            });
        }
        Ok(())
    }

    /// Read exactly `n` bytes and advance past them
    pub fn read_fixed(&mut self, n: usize) -> WireResult<&'a [u8]> {
        self.ensure(n)?;
        let (head, tail) = self.rest.split_at(n);
        self.rest = tail;
        self.position += n;
        Ok(head)
    }

    /// Read a fixed-size array, bytes kept in the order they appear on the wire
    pub fn read_array<const N: usize>(&mut self) -> WireResult<[u8; N]> {
        let bytes = self.read_fixed(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> WireResult<u8> {
        self.ensure(1)?;
        self.position += 1;
        Ok(self.rest.get_u8())
    }

    /// Read a big-endian `u16`, returned in host order
    pub fn read_u16_be(&mut self) -> WireResult<u16> {
        self.ensure(2)?;
        self.position += 2;
        Ok(self.rest.get_u16())
    }

    /// Read a big-endian `u32`, returned in host order
    pub fn read_u32_be(&mut self) -> WireResult<u32> {
        self.ensure(4)?;
        self.position += 4;
        Ok(self.rest.get_u32())
    }

    /// Advance past `n` bytes without reading them
    pub fn skip(&mut self, n: usize) -> WireResult<()> {
        self.read_fixed(n).map(|_| ())
    }

    fn ensure(&self, n: usize) -> WireResult<()> {
        let available = self.rest.len();
        if n > available {
            trace!(
                requested = n,
                available,
                position = self.position,
                "short read"
            );
            return Err(WireError::InsufficientData {
                requested: n,
                available,
            });
        }
        Ok(())
    }
}

/// Sequential writer over a borrowed, fixed-capacity buffer
#[derive(Debug)]
pub struct OutputStream<'a> {
    buf: &'a mut [u8],
    position: usize,
}

impl<'a> OutputStream<'a> {
    /// Create a writer positioned at the start of `buf`
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Capacity left after the cursor
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// The unwritten suffix of the buffer
    pub fn rest_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.position..]
    }

    /// Copy `bytes` into the buffer and advance past them
    pub fn write_fixed(&mut self, bytes: &[u8]) -> WireResult<()> {
        self.ensure(bytes.len())?;
        self.rest_mut().put_slice(bytes);
        self.position += bytes.len();
        Ok(())
    }

    /// Write a single byte
    pub fn write_u8(&mut self, value: u8) -> WireResult<()> {
        self.ensure(1)?;
        self.rest_mut().put_u8(value);
        self.position += 1;
        Ok(())
    }

    /// Write a host-order `u16` as big-endian
    pub fn write_u16_be(&mut self, value: u16) -> WireResult<()> {
        self.ensure(2)?;
        self.rest_mut().put_u16(value);
        self.position += 2;
        Ok(())
    }

    /// Write a host-order `u32` as big-endian
    pub fn write_u32_be(&mut self, value: u32) -> WireResult<()> {
        self.ensure(4)?;
        self.rest_mut().put_u32(value);
        self.position += 4;
        Ok(())
    }

    /// Write `n` copies of `byte`
    pub fn fill(&mut self, n: usize, byte: u8) -> WireResult<()> {
        self.ensure(n)?;
        self.rest_mut().put_bytes(byte, n);
        self.position += n;
        Ok(())
    }

    fn ensure(&self, n: usize) -> WireResult<()> {
        let available = self.remaining();
        if n > available {
            return Err(WireError::BufferTooSmall {
                needed: n,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reader() {
        let stream = InputStream::new(&[]);
        assert!(!stream.has_remaining());
        assert_eq!(stream.remaining(), 0);
        assert_eq!(stream.position(), 0);
        assert!(stream.pointer().is_empty());
    }

    #[test]
    fn test_read_fixed_advances() {
        let data = [1u8, 2, 3, 4, 5];
        let mut stream = InputStream::new(&data);
        assert_eq!(stream.read_fixed(2).unwrap(), &[1, 2]);
        assert_eq!(stream.position(), 2);
        assert_eq!(stream.remaining(), 3);
        assert_eq!(stream.pointer(), &[3, 4, 5]);
        assert!(stream.has_remaining());
    }

    #[test]
    fn test_short_read_leaves_cursor() {
        let data = [0xAAu8];
        let mut stream = InputStream::new(&data);
        let err = stream.read_u16_be().unwrap_err();
        assert_eq!(
            err,
            WireError::InsufficientData {
                requested: 2,
                available: 1
            }
        );
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.read_u8().unwrap(), 0xAA);
    }

    #[test]
    fn test_require_header_reports_whole_header() {
        let data = [1u8, 2];
        let mut stream = InputStream::new(&data);
        assert_eq!(
            stream.require_header(3).unwrap_err(),
            WireError::MalformedPacket {
                needed: 3,
                available: 2
            }
        );
        assert_eq!(stream.position(), 0);

        stream.require_header(2).unwrap();
        stream.skip(1).unwrap();
        assert_eq!(
            stream.require_header(2).unwrap_err(),
            WireError::MalformedPacket {
                needed: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_read_integers_big_endian() {
        let data = [0x08, 0x00, 0x12, 0x34, 0x56, 0x78];
        let mut stream = InputStream::new(&data);
        assert_eq!(stream.read_u16_be().unwrap(), 0x0800);
        assert_eq!(stream.read_u32_be().unwrap(), 0x1234_5678);
        assert!(!stream.has_remaining());
    }

    #[test]
    fn test_read_array_and_skip() {
        let data = [9u8, 8, 7, 6];
        let mut stream = InputStream::new(&data);
        stream.skip(1).unwrap();
        assert_eq!(stream.read_array::<2>().unwrap(), [8, 7]);
        assert!(stream.skip(2).is_err());
        assert_eq!(stream.remaining(), 1);
    }

    #[test]
    fn test_write_fixed_and_integers() {
        let mut buf = [0u8; 7];
        let mut stream = OutputStream::new(&mut buf);
        stream.write_u16_be(0x0021).unwrap();
        stream.write_u32_be(0xDEAD_BEEF).unwrap();
        stream.write_u8(0x7F).unwrap();
        assert_eq!(stream.remaining(), 0);
        assert_eq!(stream.position(), 7);
        assert_eq!(buf, [0x00, 0x21, 0xDE, 0xAD, 0xBE, 0xEF, 0x7F]);
    }

    #[test]
    fn test_write_overflow_is_rejected() {
        let mut buf = [0u8; 3];
        let mut stream = OutputStream::new(&mut buf);
        stream.write_fixed(&[1, 2]).unwrap();
        let err = stream.write_u16_be(0xFFFF).unwrap_err();
        assert_eq!(
            err,
            WireError::BufferTooSmall {
                needed: 2,
                available: 1
            }
        );
        assert_eq!(stream.position(), 2);
        assert_eq!(buf, [1, 2, 0]);
    }

    #[test]
    fn test_fill_and_rest() {
        let mut buf = [0u8; 4];
        let mut stream = OutputStream::new(&mut buf);
        stream.fill(2, 0xEE).unwrap();
        assert_eq!(stream.rest_mut().len(), 2);
        assert!(stream.fill(3, 0).is_err());
        assert_eq!(buf, [0xEE, 0xEE, 0, 0]);
    }
}
