//! Parallel addition and subtraction.
//!
//! Unsigned addition and subtraction split the common word range into one
//! contiguous chunk per worker. Each worker runs the word kernel on its
//! chunk and reports the chunk's final carry or borrow; after the join,
//! the carries are reconciled sequentially in chunk order, which makes
//! the result independent of scheduling. The signed operations dispatch
//! on operand signs over the unsigned engines.

use crate::{
    add::{add_words, resolve_borrow, resolve_carry, sub_words},
    arch::word::Word,
    bigint::BigInt,
    cmp::ucmp,
    error::{panic_on_error, Error},
    sign::Sign::Positive,
    tuning::Tuning,
};
use core::{
    cmp::Ordering::*,
    ops::{Add, Sub},
};

/// Run the word kernel over chunks of `r`, one scoped worker per chunk,
/// and return each chunk's carry. Chunks have `r.len() / nthreads` words,
/// the last absorbing the remainder. A partition too small to split runs
/// on the calling thread; the resulting words are identical either way.
fn chunked_words(
    kernel: fn(&mut [Word], &[Word], &[Word]) -> bool,
    r: &mut [Word],
    a: &[Word],
    b: &[Word],
    nthreads: usize,
) -> Result<Vec<Word>, Error> {
    debug_assert!(r.len() == a.len() && r.len() == b.len());
    let chunk = r.len() / nthreads;
    if nthreads <= 1 || chunk == 0 {
        return Ok(vec![Word::from(kernel(r, a, b))]);
    }

    let mut carries = Vec::with_capacity(nthreads);
    crossbeam::thread::scope(|scope| -> Result<(), Error> {
        let mut handles = Vec::with_capacity(nthreads);
        let (mut r_rest, mut a_rest, mut b_rest) = (r, a, b);
        for i in 0..nthreads {
            let n = if i == nthreads - 1 { r_rest.len() } else { chunk };
            let (r_chunk, r_next) = r_rest.split_at_mut(n);
            let (a_chunk, a_next) = a_rest.split_at(n);
            let (b_chunk, b_next) = b_rest.split_at(n);
            r_rest = r_next;
            a_rest = a_next;
            b_rest = b_next;
            let handle = scope
                .builder()
                .name(format!("parbig-seg-{}", i))
                .spawn(move |_| Word::from(kernel(r_chunk, a_chunk, b_chunk)))
                .map_err(|_| Error::ThreadSpawn)?;
            handles.push(handle);
        }
        for handle in handles {
            carries.push(handle.join().map_err(|_| Error::ThreadSpawn)?);
        }
        Ok(())
    })
    .map_err(|_| Error::ThreadSpawn)??;
    Ok(carries)
}

/// Walk the chunk boundaries in increasing order, rippling each chunk's
/// carry into the next one. A ripple that runs off a chunk's end is added
/// to that chunk's own stored carry. Returns the final carry.
fn reconcile(
    resolve: fn(Word, &mut [Word]) -> Word,
    carries: &mut [Word],
    r: &mut [Word],
) -> Word {
    let k = carries.len();
    let chunk = r.len() / k;
    for i in 0..k - 1 {
        let lo = (i + 1) * chunk;
        let hi = if i + 2 == k { r.len() } else { lo + chunk };
        let leftover = resolve(carries[i], &mut r[lo..hi]);
        carries[i + 1] += leftover;
    }
    carries[k - 1]
}

impl Tuning {
    /// Unsigned addition: `r = |a| + |b|`.
    pub fn uadd(&self, r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
        a.check();
        b.check();
        // The longer operand drives the trailing words.
        let (a, b) = if a.as_words().len() < b.as_words().len() {
            (b, a)
        } else {
            (a, b)
        };
        let a_words = a.as_words();
        let b_words = b.as_words();
        let max = a_words.len();
        let min = b_words.len();
        r.expand(max + 1)?;
        let r_words = r.words_mut();

        let mut carries = chunked_words(
            add_words,
            &mut r_words[..min],
            &a_words[..min],
            b_words,
            self.add_threads.max(1),
        )?;
        let mut carry = reconcile(resolve_carry, &mut carries, &mut r_words[..min]);

        // Fold the leftover carry through the trailing words of `a`.
        for i in min..max {
            let t = a_words[i].wrapping_add(carry);
            r_words[i] = t;
            carry &= Word::from(t == 0);
        }
        r_words[max] = carry;

        r.set_top(max + carry as usize);
        r.set_sign(Positive);
        r.check();
        Ok(())
    }

    /// Unsigned subtraction: `r = |a| - |b|`; requires `|a| >= |b|`.
    ///
    /// On [Error::SubtrahendTooLarge] the result is left untouched.
    pub fn usub(&self, r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
        a.check();
        b.check();
        if ucmp(a, b) == Less {
            return Err(Error::SubtrahendTooLarge);
        }
        self.usub_unchecked(r, a, b)
    }

    /// `usub` without the magnitude precondition check.
    fn usub_unchecked(&self, r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
        let a_words = a.as_words();
        let b_words = b.as_words();
        let max = a_words.len();
        let min = b_words.len();
        debug_assert!(max >= min);
        r.expand(max)?;
        let r_words = r.words_mut();

        let mut borrows = chunked_words(
            sub_words,
            &mut r_words[..min],
            &a_words[..min],
            b_words,
            self.add_threads.max(1),
        )?;
        let mut borrow = reconcile(resolve_borrow, &mut borrows, &mut r_words[..min]);

        for i in min..max {
            let t = a_words[i];
            r_words[i] = t.wrapping_sub(borrow);
            borrow &= Word::from(t == 0);
        }
        debug_assert_eq!(borrow, 0);

        r.set_top(max);
        r.set_sign(Positive);
        r.normalize();
        Ok(())
    }

    /// Signed addition: `r = a + b`.
    pub fn add(&self, r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
        if a.sign() == b.sign() {
            let sign = a.sign();
            self.uadd(r, a, b)?;
            r.set_sign(sign);
        } else {
            match ucmp(a, b) {
                Greater => {
                    let sign = a.sign();
                    self.usub_unchecked(r, a, b)?;
                    r.set_sign(sign);
                }
                Less => {
                    let sign = b.sign();
                    self.usub_unchecked(r, b, a)?;
                    r.set_sign(sign);
                }
                Equal => r.set_zero(),
            }
        }
        r.check();
        Ok(())
    }

    /// Signed subtraction: `r = a - b`.
    pub fn sub(&self, r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
        if a.sign() != b.sign() {
            let sign = a.sign();
            self.uadd(r, a, b)?;
            r.set_sign(sign);
        } else {
            match ucmp(a, b) {
                Greater => {
                    let sign = a.sign();
                    self.usub_unchecked(r, a, b)?;
                    r.set_sign(sign);
                }
                Less => {
                    // Equal signs with |a| < |b|: a - b takes the opposite
                    // of the common sign.
                    let sign = -a.sign();
                    self.usub_unchecked(r, b, a)?;
                    r.set_sign(sign);
                }
                Equal => r.set_zero(),
            }
        }
        r.check();
        Ok(())
    }
}

/// Unsigned addition with the default [Tuning]: `r = |a| + |b|`.
pub fn uadd(r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
    Tuning::default().uadd(r, a, b)
}

/// Unsigned subtraction with the default [Tuning]: `r = |a| - |b|`;
/// requires `|a| >= |b|`.
pub fn usub(r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
    Tuning::default().usub(r, a, b)
}

/// Signed addition with the default [Tuning]: `r = a + b`.
pub fn add(r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
    Tuning::default().add(r, a, b)
}

/// Signed subtraction with the default [Tuning]: `r = a - b`.
pub fn sub(r: &mut BigInt, a: &BigInt, b: &BigInt) -> Result<(), Error> {
    Tuning::default().sub(r, a, b)
}

impl Add<&BigInt> for &BigInt {
    type Output = BigInt;

    fn add(self, rhs: &BigInt) -> BigInt {
        let mut res = BigInt::zero();
        Tuning::default()
            .add(&mut res, self, rhs)
            .unwrap_or_else(|e| panic_on_error(e));
        res
    }
}

impl Add<BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn add(self, rhs: BigInt) -> BigInt {
        &self + &rhs
    }
}

impl Add<&BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn add(self, rhs: &BigInt) -> BigInt {
        &self + rhs
    }
}

impl Add<BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn add(self, rhs: BigInt) -> BigInt {
        self + &rhs
    }
}

impl Sub<&BigInt> for &BigInt {
    type Output = BigInt;

    fn sub(self, rhs: &BigInt) -> BigInt {
        let mut res = BigInt::zero();
        Tuning::default()
            .sub(&mut res, self, rhs)
            .unwrap_or_else(|e| panic_on_error(e));
        res
    }
}

impl Sub<BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn sub(self, rhs: BigInt) -> BigInt {
        &self - &rhs
    }
}

impl Sub<&BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn sub(self, rhs: &BigInt) -> BigInt {
        &self - rhs
    }
}

impl Sub<BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn sub(self, rhs: BigInt) -> BigInt {
        self - &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning(add_threads: usize) -> Tuning {
        Tuning {
            add_threads,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_uadd_carry_across_chunks() {
        // Four two-word chunks; the first chunk's carry ripples through
        // the zeroed middle chunks and lands in the last one.
        let a = BigInt::from_words(&[Word::MAX; 8]);
        let b = BigInt::from_words(&[1, 0, 0, 0, 0, 0, 0, 1]);
        let mut r = BigInt::zero();
        tuning(4).uadd(&mut r, &a, &b).unwrap();
        assert_eq!(r.as_words(), [0, 0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_uadd_thread_counts_agree() {
        let a = BigInt::from_words(&[7, Word::MAX, 0, Word::MAX, 3, 9]);
        let b = BigInt::from_words(&[Word::MAX, Word::MAX, 2]);
        let mut reference = BigInt::zero();
        tuning(1).uadd(&mut reference, &a, &b).unwrap();
        for nthreads in [2, 3, 4, 16] {
            let mut r = BigInt::zero();
            tuning(nthreads).uadd(&mut r, &a, &b).unwrap();
            assert_eq!(r.as_words(), reference.as_words());
        }
    }

    #[test]
    fn test_usub_underflow_is_an_error() {
        let a = BigInt::from(3u8);
        let b = BigInt::from(5u8);
        let mut r = BigInt::from(42u8);
        assert_eq!(
            tuning(4).usub(&mut r, &a, &b),
            Err(Error::SubtrahendTooLarge)
        );
        // Result untouched on failure.
        assert_eq!(r, BigInt::from(42u8));

        // Same tops, a < b numerically.
        let a = BigInt::from_words(&[0, 1]);
        let b = BigInt::from_words(&[1, 1]);
        assert_eq!(
            tuning(4).usub(&mut r, &a, &b),
            Err(Error::SubtrahendTooLarge)
        );
    }

    #[test]
    fn test_usub_borrow_reaches_last_chunk() {
        let a = BigInt::from_words(&[0, 0, 0, 1]);
        let b = BigInt::from(1u8);
        let mut r = BigInt::zero();
        tuning(4).usub(&mut r, &a, &b).unwrap();
        assert_eq!(r.as_words(), [Word::MAX, Word::MAX, Word::MAX]);
    }
}
