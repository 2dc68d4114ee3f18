//! Part reader with look-ahead, finds the end of a stream of unknown length
//! without buffering more than one part.

use bytes::{Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

// initial buffer, grows up to the part size
const READ_CAPACITY: usize = 8 * 1024 * 1024;

#[derive(Debug)]
pub struct PartReader<R> {
    inner: R,
    carry: Bytes,
    eof: bool,
}

impl<R: AsyncRead + Unpin> PartReader<R> {
    pub const fn new(inner: R) -> Self {
        Self {
            inner,
            carry: Bytes::new(),
            eof: false,
        }
    }

    /// Store bytes read ahead, they are returned first by the next read
    pub fn carry(&mut self, bytes: Bytes) {
        if self.carry.is_empty() {
            self.carry = bytes;
        } else {
            let mut joined = BytesMut::with_capacity(bytes.len() + self.carry.len());
            joined.extend_from_slice(&bytes);
            joined.extend_from_slice(&self.carry);
            self.carry = joined.freeze();
        }
    }

    /// Read up to `max_bytes`, fewer only at the end of the stream
    ///
    /// # Errors
    ///
    /// Will return `Err` if the source fails
    pub async fn read_part(&mut self, max_bytes: u64) -> io::Result<Bytes> {
        let max = usize::try_from(max_bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        if self.carry.len() >= max {
            return Ok(self.carry.split_to(max));
        }

        let mut buf = BytesMut::with_capacity(max.min(READ_CAPACITY));
        buf.extend_from_slice(&std::mem::take(&mut self.carry));

        while buf.len() < max && !self.eof {
            let remaining = max - buf.len();
            buf.reserve(remaining.min(READ_CAPACITY));
            let n = (&mut self.inner)
                .take(remaining as u64)
                .read_buf(&mut buf)
                .await?;
            if n == 0 {
                self.eof = true;
            }
        }

        Ok(buf.freeze())
    }

    /// Read one part of a stream of unknown length, `part_size + 1` bytes are
    /// requested and the extra byte is carried over. Returns the part and
    /// whether it is the last one.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the source fails
    pub async fn read_lookahead(&mut self, part_size: u64) -> io::Result<(Bytes, bool)> {
        let mut data = self.read_part(part_size + 1).await?;

        if data.len() as u64 <= part_size {
            return Ok((data, true));
        }

        let extra = data.split_off(data.len() - 1);
        self.carry(extra);

        Ok((data, false))
    }
}
