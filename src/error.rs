//! Error types.

use core::fmt::{self, Display, Formatter};

/// Errors reported by the arithmetic operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// Unsigned subtraction was called with a subtrahend larger than the
    /// minuend.
    SubtrahendTooLarge,
    /// A scratch or result buffer could not be allocated.
    OutOfMemory,
    /// A worker thread could not be spawned.
    ThreadSpawn,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Error::SubtrahendTooLarge => f.write_str("subtrahend larger than minuend"),
            Error::OutOfMemory => f.write_str("out of memory"),
            Error::ThreadSpawn => f.write_str("failed to spawn a worker thread"),
        }
    }
}

impl std::error::Error for Error {}

/// Panic used by the operator sugar, which has no error channel.
pub(crate) fn panic_on_error(error: Error) -> ! {
    panic!("parbig operation failed: {}", error)
}
