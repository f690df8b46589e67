//! Signed arbitrary-precision integer.

use crate::{
    arch::word::Word,
    buffer::Buffer,
    error::Error,
    primitive::WORD_BITS,
    sign::Sign::{self, *},
};
use core::fmt::{self, Debug, Formatter};

/// Signed arbitrary-precision integer.
///
/// The magnitude is a sequence of machine words, least significant first.
/// `top` counts the significant words; storage past `top` is scratch left
/// over from earlier operations. Normalised values have a non-zero top
/// word, and zero is always non-negative. Multiplication internally
/// produces "fixed top" intermediates whose `top` may over-report by a
/// zero word; the public entry points normalise before returning.
#[derive(Clone)]
pub struct BigInt {
    words: Buffer,
    top: usize,
    sign: Sign,
    fixed_top: bool,
}

impl BigInt {
    /// The number zero.
    #[inline]
    pub fn zero() -> BigInt {
        BigInt {
            words: Buffer::new(),
            top: 0,
            sign: Positive,
            fixed_top: false,
        }
    }

    /// Construct a non-negative value from words, least significant first.
    ///
    /// Trailing zero words are ignored.
    pub fn from_words(words: &[Word]) -> BigInt {
        let mut res = BigInt::zero();
        res.expand(words.len())
            .unwrap_or_else(|_| panic!("out of memory"));
        res.words[..words.len()].copy_from_slice(words);
        res.top = words.len();
        res.normalize();
        res
    }

    /// Sign of the number. Zero is `Positive`.
    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.top == 0
    }

    /// The significant words of the magnitude, least significant first.
    #[inline]
    pub fn as_words(&self) -> &[Word] {
        &self.words[..self.top]
    }

    /// Copy the value of `other` into `self`.
    pub fn assign(&mut self, other: &BigInt) -> Result<(), Error> {
        self.expand(other.top)?;
        self.words[..other.top].copy_from_slice(&other.words[..other.top]);
        self.top = other.top;
        self.sign = other.sign;
        self.fixed_top = other.fixed_top;
        Ok(())
    }

    /// Set the value to zero, keeping the storage.
    #[inline]
    pub fn set_zero(&mut self) {
        self.top = 0;
        self.sign = Positive;
        self.fixed_top = false;
    }

    /// Make sure at least `cap` words of storage are present, zero-filling
    /// any new space. Never changes the numeric value.
    pub(crate) fn expand(&mut self, cap: usize) -> Result<(), Error> {
        if self.words.len() < cap {
            self.words.ensure_capacity(cap)?;
            let len = self.words.len();
            self.words.push_zeros(cap - len);
        }
        Ok(())
    }

    /// All words of storage, including scratch past `top`.
    #[inline]
    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        &mut self.words
    }

    #[inline]
    pub(crate) fn set_top(&mut self, top: usize) {
        debug_assert!(top <= self.words.len());
        self.top = top;
    }

    #[inline]
    pub(crate) fn set_fixed_top(&mut self, fixed_top: bool) {
        self.fixed_top = fixed_top;
    }

    /// Set the sign; a zero value stays `Positive`.
    #[inline]
    pub(crate) fn set_sign(&mut self, sign: Sign) {
        self.sign = if self.top == 0 { Positive } else { sign };
    }

    /// Strip zero top words and restore the sign invariant of zero.
    pub(crate) fn normalize(&mut self) {
        while self.top > 0 && self.words[self.top - 1] == 0 {
            self.top -= 1;
        }
        if self.top == 0 {
            self.sign = Positive;
        }
        self.fixed_top = false;
        self.check();
    }

    /// Debug-only invariant check.
    #[inline]
    pub(crate) fn check(&self) {
        debug_assert!(self.top <= self.words.len());
        debug_assert!(self.top > 0 || self.sign == Positive);
        debug_assert!(self.fixed_top || self.top == 0 || self.words[self.top - 1] != 0);
    }
}

impl Default for BigInt {
    #[inline]
    fn default() -> BigInt {
        BigInt::zero()
    }
}

impl PartialEq for BigInt {
    #[inline]
    fn eq(&self, other: &BigInt) -> bool {
        self.sign == other.sign && self.as_words() == other.as_words()
    }
}

impl Eq for BigInt {}

impl Debug for BigInt {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.sign == Negative {
            f.write_str("-")?;
        }
        f.write_str("0x")?;
        let words = self.as_words();
        match words.split_last() {
            None => f.write_str("0"),
            Some((last, rest)) => {
                write!(f, "{:x}", last)?;
                for word in rest.iter().rev() {
                    write!(f, "{:0width$x}", word, width = (WORD_BITS / 4) as usize)?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! impl_from_unsigned {
    ($t:ty) => {
        impl From<$t> for BigInt {
            fn from(x: $t) -> BigInt {
                let mut x = x as u128;
                let mut res = BigInt::zero();
                res.expand((128 / WORD_BITS) as usize)
                    .unwrap_or_else(|_| panic!("out of memory"));
                let mut top = 0;
                while x != 0 {
                    res.words_mut()[top] = x as Word;
                    x >>= WORD_BITS;
                    top += 1;
                }
                res.top = top;
                res.check();
                res
            }
        }
    };
}

macro_rules! impl_from_signed {
    ($t:ty) => {
        impl From<$t> for BigInt {
            fn from(x: $t) -> BigInt {
                let mut res = BigInt::from(x.unsigned_abs() as u128);
                if x < 0 {
                    res.set_sign(Negative);
                }
                res
            }
        }
    };
}

impl_from_unsigned!(u8);
impl_from_unsigned!(u16);
impl_from_unsigned!(u32);
impl_from_unsigned!(u64);
impl_from_unsigned!(u128);
impl_from_unsigned!(usize);

impl_from_signed!(i8);
impl_from_signed!(i16);
impl_from_signed!(i32);
impl_from_signed!(i64);
impl_from_signed!(i128);
impl_from_signed!(isize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        let z = BigInt::zero();
        assert!(z.is_zero());
        assert_eq!(z.sign(), Positive);
        assert_eq!(z.as_words(), []);
    }

    #[test]
    fn test_from_words_normalizes() {
        let x = BigInt::from_words(&[5, 7, 0, 0]);
        assert_eq!(x.as_words(), [5, 7]);

        let z = BigInt::from_words(&[0, 0]);
        assert!(z.is_zero());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(BigInt::from(0u32), BigInt::zero());
        assert_eq!(BigInt::from(7u64).as_words(), [7]);
        let x = BigInt::from(-3i32);
        assert_eq!(x.sign(), Negative);
        assert_eq!(x.as_words(), [3]);
        assert_eq!(BigInt::from(0i64).sign(), Positive);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_from_u128() {
        let x = BigInt::from(1u128 << 64 | 9);
        assert_eq!(x.as_words(), [9, 1]);
    }

    #[test]
    fn test_expand_preserves_value() {
        let mut x = BigInt::from(13u8);
        x.expand(20).unwrap();
        assert_eq!(x, BigInt::from(13u8));
        assert_eq!(x.words_mut().len(), 20);
    }

    #[test]
    fn test_assign() {
        let x = BigInt::from(-12345i64);
        let mut y = BigInt::zero();
        y.assign(&x).unwrap();
        assert_eq!(x, y);
    }

    #[test]
    fn test_normalize_clears_sign_of_zero() {
        let mut x = BigInt::from(-1i8);
        x.words_mut()[0] = 0;
        x.normalize();
        assert!(x.is_zero());
        assert_eq!(x.sign(), Positive);
    }
}
