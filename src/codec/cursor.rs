// tree-serializer/src/codec/cursor.rs

//! Bounds-checked cursors over the flat byte buffers the codec reads and writes.
//!
//! Every advance is checked against the remaining length first, so a short
//! buffer surfaces as a `CodecError` instead of an out-of-bounds access.

use std::io::{Cursor, Write};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{CodecError, Result};

/// Writes into a caller-provided slice.
#[derive(Debug)]
pub struct NodeWriter<'a> {
    inner: Cursor<&'a mut [u8]>,
}

impl<'a> NodeWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { inner: Cursor::new(buf) }
    }

    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.inner.get_ref().len() - self.position()
    }

    /// Fails unless `n` more bytes fit.
    pub fn ensure(&self, n: usize) -> Result<()> {
        let available = self.remaining();
        if available < n {
            return Err(CodecError::BufferTooSmall { needed: n, available });
        }
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.ensure(1)?;
        self.inner.write_u8(value)?;
        Ok(())
    }

    /// Host byte order.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.ensure(4)?;
        self.inner.write_u32::<NativeEndian>(value)?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len())?;
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Overwrites a `u32` already written at `at` without moving the cursor.
    pub fn patch_u32(&mut self, at: usize, value: u32) -> Result<()> {
        let end = self.position();
        if at + 4 > end {
            return Err(CodecError::BufferTooSmall { needed: at + 4, available: end });
        }
        self.inner.set_position(at as u64);
        self.inner.write_u32::<NativeEndian>(value)?;
        self.inner.set_position(end as u64);
        Ok(())
    }
}

/// Reads from a borrowed slice. `base` is the slice's offset within the
/// outermost input, so errors report absolute positions.
#[derive(Debug, Clone)]
pub struct NodeReader<'a> {
    inner: Cursor<&'a [u8]>,
    base: usize,
}

impl<'a> NodeReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    fn with_base(buf: &'a [u8], base: usize) -> Self {
        Self { inner: Cursor::new(buf), base }
    }

    /// Bytes consumed so far from this reader's own slice.
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Absolute offset of the next byte in the outermost input.
    pub fn offset(&self) -> usize {
        self.base + self.position()
    }

    pub fn remaining(&self) -> usize {
        self.inner.get_ref().len() - self.position()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails unless `n` more bytes are available.
    pub fn ensure(&self, n: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(CodecError::Truncated {
                offset: self.offset(),
                needed: n,
                remaining,
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.inner.read_u8()?)
    }

    /// Host byte order.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.inner.read_u32::<NativeEndian>()?)
    }

    /// Borrows the next `n` bytes and advances past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let buf: &'a [u8] = *self.inner.get_ref();
        let start = self.position();
        let bytes = &buf[start..start + n];
        self.inner.set_position((start + n) as u64);
        Ok(bytes)
    }

    /// Splits off a reader over exactly the next `n` bytes and advances past them.
    pub fn sub_reader(&mut self, n: usize) -> Result<NodeReader<'a>> {
        let offset = self.offset();
        let bytes = self.read_bytes(n)?;
        Ok(NodeReader::with_base(bytes, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_refuses_to_overrun() {
        let mut buf = [0u8; 5];
        let mut writer = NodeWriter::new(&mut buf);
        writer.write_u32(0xAABB_CCDD).unwrap();
        let err = writer.write_bytes(b"xy").unwrap_err();
        assert!(matches!(err, CodecError::BufferTooSmall { needed: 2, available: 1 }));
        writer.write_u8(7).unwrap();
        assert_eq!(writer.remaining(), 0);
        assert_eq!(&buf[..4], &0xAABB_CCDDu32.to_ne_bytes());
        assert_eq!(buf[4], 7);
    }

    #[test]
    fn patch_rewrites_without_moving() {
        let mut buf = [0u8; 6];
        let mut writer = NodeWriter::new(&mut buf);
        writer.write_u32(0).unwrap();
        writer.write_u8(9).unwrap();
        writer.patch_u32(0, 42).unwrap();
        assert_eq!(writer.position(), 5);
        assert!(writer.patch_u32(2, 1).is_err());
        assert_eq!(&buf[..4], &42u32.to_ne_bytes());
    }

    #[test]
    fn reader_reports_absolute_offsets() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut reader = NodeReader::new(&data);
        assert_eq!(reader.read_u8().unwrap(), 1);
        let mut sub = reader.sub_reader(3).unwrap();
        assert_eq!(reader.offset(), 4);
        assert_eq!(sub.read_bytes(2).unwrap(), &[2, 3]);
        let err = sub.read_u32().unwrap_err();
        assert!(matches!(err, CodecError::Truncated { offset: 3, needed: 4, remaining: 1 }));
    }

    #[test]
    fn reader_reads_host_order_u32() {
        let data = 0x0102_0304u32.to_ne_bytes();
        let mut reader = NodeReader::new(&data);
        assert_eq!(reader.read_u32().unwrap(), 0x0102_0304);
        assert!(reader.is_empty());
    }
}
