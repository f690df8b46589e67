//! Word buffer.

use crate::{arch::word::Word, error::Error};

use core::ops::{Deref, DerefMut};

/// Buffer for Words.
///
/// A `BigInt` operation expands the destination buffer to the required
/// word count up front, then fills it in with words. Growth is fallible
/// so that allocation failure can be reported through the operation's
/// `Result` channel; exceeding a reserved capacity is a bug and panics.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct Buffer(Vec<Word>);

impl Buffer {
    /// Creates an empty `Buffer`.
    #[inline]
    pub(crate) fn new() -> Buffer {
        Buffer(Vec::new())
    }

    /// Creates a `Buffer` with at least specified capacity.
    pub(crate) fn allocate(num_words: usize) -> Result<Buffer, Error> {
        let mut buffer = Buffer::new();
        buffer.ensure_capacity(num_words)?;
        Ok(buffer)
    }

    /// Ensure there is enough capacity in the buffer for `num_words`.
    /// Will reallocate if there is not enough.
    pub(crate) fn ensure_capacity(&mut self, num_words: usize) -> Result<(), Error> {
        if num_words > self.capacity() {
            // Leave some extra space for future growth.
            let target = Buffer::default_capacity(num_words);
            self.0
                .try_reserve_exact(target - self.len())
                .map_err(|_| Error::OutOfMemory)?;
        }
        Ok(())
    }

    /// Return buffer capacity.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Append `n` zeros.
    ///
    /// # Panics
    ///
    /// Panics if there is not enough capacity.
    pub(crate) fn push_zeros(&mut self, n: usize) {
        assert!(n <= self.capacity() - self.len());
        self.0.extend(core::iter::repeat(0).take(n));
    }

    /// Default capacity for a given number of `Word`s.
    ///
    /// Provides `2 + 0.125 * num_words` extra space.
    #[inline]
    fn default_capacity(num_words: usize) -> usize {
        num_words + num_words / 8 + 2
    }
}

impl Clone for Buffer {
    /// New buffer will be sized to the current length.
    fn clone(&self) -> Buffer {
        let mut new_buffer =
            Buffer::allocate(self.len()).unwrap_or_else(|_| panic!("out of memory"));
        new_buffer.0.extend_from_slice(&self.0);
        new_buffer
    }
}

impl Deref for Buffer {
    type Target = [Word];

    #[inline]
    fn deref(&self) -> &[Word] {
        &self.0
    }
}

impl DerefMut for Buffer {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Word] {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate() {
        let buffer = Buffer::allocate(100).unwrap();
        assert_eq!(buffer.len(), 0);
        assert!(buffer.capacity() >= 100);
    }

    #[test]
    fn test_ensure_capacity() {
        let mut buffer = Buffer::allocate(2).unwrap();
        buffer.push_zeros(1);
        buffer[0] = 7;
        buffer.ensure_capacity(10).unwrap();
        assert!(buffer.capacity() >= 10);
        assert_eq!(&buffer[..], [7]);
    }

    #[test]
    fn test_push_zeros() {
        let mut buffer = Buffer::allocate(5).unwrap();
        buffer.push_zeros(3);
        assert_eq!(&buffer[..], [0, 0, 0]);
    }

    #[test]
    fn test_clone() {
        let mut buffer = Buffer::allocate(100).unwrap();
        buffer.push_zeros(2);
        buffer[0] = 7;
        buffer[1] = 8;
        let buffer2 = buffer.clone();
        assert_eq!(buffer, buffer2);
        assert!(buffer2.capacity() < buffer.capacity());
    }
}
