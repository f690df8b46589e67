//! Scratch memory for multiplication temporaries.

use crate::{arch::word::Word, error::Error};

/// Reusable scratch arena for [mul](crate::mul).
///
/// One multiplication borrows one contiguous word region; the borrow is
/// the begin/end bracket of the scratch scope. The arena grows on demand
/// and keeps its high-water allocation across calls, so a `Context` can
/// be reused to amortise allocations over many multiplications.
pub struct Context {
    buf: Vec<Word>,
}

impl Context {
    #[inline]
    pub fn new() -> Context {
        Context { buf: Vec::new() }
    }

    /// Borrow `num_words` words of zeroed scratch.
    pub(crate) fn scratch(&mut self, num_words: usize) -> Result<&mut [Word], Error> {
        if self.buf.len() < num_words {
            let additional = num_words - self.buf.len();
            self.buf
                .try_reserve_exact(additional)
                .map_err(|_| Error::OutOfMemory)?;
            self.buf.resize(num_words, 0);
        }
        let scratch = &mut self.buf[..num_words];
        scratch.fill(0);
        Ok(scratch)
    }
}

impl Default for Context {
    #[inline]
    fn default() -> Context {
        Context::new()
    }
}
