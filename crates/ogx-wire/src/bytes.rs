//! Little-endian primitive encodings.
//!
//! | encoding     | layout                          |
//! | ------------ | ------------------------------- |
//! | byte / bool  | 1 byte                          |
//! | int32        | 4 bytes                         |
//! | int64 / id   | 8 bytes                         |
//! | float64      | 8 bytes, IEEE 754               |
//! | string, blob | `int32 length` + raw bytes      |
//! | idList       | `int64 count` + `count x int64` |
//! | stringTuple  | `int32 count` + `count x string`|

use std::io::{self, Read};

use ogx_core::ObjectId;

use crate::Result;
use crate::error::WireError;

/// Append-only encoding buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_byte(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    #[inline]
    pub fn add_bool(&mut self, b: bool) {
        self.buf.push(u8::from(b));
    }

    #[inline]
    pub fn add_i32(&mut self, n: i32) {
        self.buf.extend_from_slice(&n.to_le_bytes());
    }

    #[inline]
    pub fn add_i64(&mut self, n: i64) {
        self.buf.extend_from_slice(&n.to_le_bytes());
    }

    #[inline]
    pub fn add_f64(&mut self, f: f64) {
        self.buf.extend_from_slice(&f.to_le_bytes());
    }

    #[inline]
    pub fn add_id(&mut self, id: ObjectId) {
        self.add_i64(id.get());
    }

    /// Writes an `int32` length prefix.
    pub fn add_len32(&mut self, len: usize) -> Result<()> {
        let n = i32::try_from(len).map_err(|_| WireError::OutOfRange {
            offset: self.buf.len(),
            what: "length",
            value: len as i64,
        })?;
        self.add_i32(n);
        Ok(())
    }

    pub fn add_blob(&mut self, bytes: &[u8]) -> Result<()> {
        self.add_len32(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn add_string(&mut self, s: &str) -> Result<()> {
        self.add_blob(s.as_bytes())
    }

    pub fn add_id_list(&mut self, ids: &[ObjectId]) {
        self.add_i64(ids.len() as i64);
        for id in ids {
            self.add_id(*id);
        }
    }

    pub fn add_string_tuple(&mut self, items: &[String]) -> Result<()> {
        self.add_len32(items.len())?;
        for item in items {
            self.add_string(item)?;
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over an encoded stream.
///
/// Implementors supply raw byte access; the typed readers are shared.
pub trait ByteReader {
    /// Fills `buf` completely or fails with [`WireError::Truncated`].
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reads exactly `n` bytes.
    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = vec![0; n];
        self.fill(&mut out)?;
        Ok(out)
    }

    /// Bytes consumed so far.
    fn offset(&self) -> usize;

    fn read_u8(&mut self) -> Result<u8> {
        let mut b = [0u8; 1];
        self.fill(&mut b)?;
        Ok(b[0])
    }

    fn read_bool(&mut self) -> Result<bool> {
        let offset = self.offset();
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(WireError::InvalidBool { offset, byte }),
        }
    }

    fn read_i32(&mut self) -> Result<i32> {
        let mut b = [0u8; 4];
        self.fill(&mut b)?;
        Ok(i32::from_le_bytes(b))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut b = [0u8; 8];
        self.fill(&mut b)?;
        Ok(i64::from_le_bytes(b))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let mut b = [0u8; 8];
        self.fill(&mut b)?;
        Ok(f64::from_le_bytes(b))
    }

    fn read_id(&mut self) -> Result<ObjectId> {
        Ok(ObjectId::new(self.read_i64()?))
    }

    fn read_len32(&mut self) -> Result<usize> {
        let offset = self.offset();
        let n = self.read_i32()?;
        usize::try_from(n).map_err(|_| WireError::NegativeLength {
            offset,
            length: n as i64,
        })
    }

    fn read_count64(&mut self) -> Result<usize> {
        let offset = self.offset();
        let n = self.read_i64()?;
        usize::try_from(n).map_err(|_| WireError::NegativeLength { offset, length: n })
    }

    /// Reads an `int32` line number; it must fit a `u32`.
    fn read_line32(&mut self) -> Result<u32> {
        let offset = self.offset();
        let n = self.read_i32()?;
        u32::try_from(n).map_err(|_| WireError::OutOfRange {
            offset,
            what: "line",
            value: n as i64,
        })
    }

    fn read_blob(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len32()?;
        self.read_bytes(len)
    }

    fn read_string(&mut self) -> Result<String> {
        let offset = self.offset();
        let bytes = self.read_blob()?;
        String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset })
    }

    fn read_id_list(&mut self) -> Result<Vec<ObjectId>> {
        let count = self.read_count64()?;
        let mut ids = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            ids.push(self.read_id()?);
        }
        Ok(ids)
    }

    fn read_string_tuple(&mut self) -> Result<Vec<String>> {
        let count = self.read_len32()?;
        let mut items = Vec::with_capacity(count.min(4096));
        for _ in 0..count {
            items.push(self.read_string()?);
        }
        Ok(items)
    }
}

/// Reader over a fully materialized buffer (including memory-mapped files).
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(WireError::Truncated {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }
}

impl ByteReader for SliceReader<'_> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let src = self.take(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    fn offset(&self) -> usize {
        self.pos
    }
}

/// Reader over any byte source (pipe, socket, file descriptor).
///
/// Bytes are pulled on demand; nothing beyond the current field is buffered
/// here, so wrap the source in a `BufReader` when it is unbuffered.
#[derive(Debug)]
pub struct StreamReader<R> {
    inner: R,
    pos: usize,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteReader for StreamReader<R> {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(WireError::Truncated {
                        offset: self.pos + filled,
                        needed: buf.len() - filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.pos += filled;
        Ok(())
    }

    fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        // Grow with the data actually received so a corrupt length cannot
        // force a huge allocation up front.
        let mut out = Vec::new();
        (&mut self.inner).take(n as u64).read_to_end(&mut out)?;
        if out.len() < n {
            return Err(WireError::Truncated {
                offset: self.pos + out.len(),
                needed: n - out.len(),
            });
        }
        self.pos += n;
        Ok(out)
    }

    fn offset(&self) -> usize {
        self.pos
    }
}
