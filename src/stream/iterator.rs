use std::cmp::min;

/// Splits `size` bytes into consecutive `(number, offset, length)` ranges of at
/// most `chunk_size` bytes, numbered from 1
#[derive(Debug)]
pub struct PartIterator {
    offset: u64,
    chunk_size: u64,
    size: u64,
    number: u16,
}

impl PartIterator {
    #[must_use]
    pub const fn new(size: u64, chunk_size: u64) -> Self {
        Self {
            offset: 0,
            chunk_size,
            size,
            number: 1,
        }
    }
}

impl Iterator for PartIterator {
    type Item = (u16, u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.size || self.chunk_size == 0 {
            return None;
        }

        let chunk = min(self.chunk_size, self.size - self.offset);

        let result = Some((self.number, self.offset, chunk));

        log::debug!(
            "PartIterator::next() -> number: {}, offset: {}, chunk: {}",
            self.number,
            self.offset,
            chunk
        );

        self.offset += chunk;
        self.number += 1;

        result
    }
}
