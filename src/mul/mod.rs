//! Multiplication.
//!
//! The top-level dispatch mirrors the classic big-number layering: an
//! 8-word Comba kernel for small complete operands, budget-gated
//! recursive Karatsuba for balanced operands, and the chunked schoolbook
//! method for everything else. The engines produce a fixed-top result of
//! `a.top + b.top` words; the public wrapper normalises it.

use crate::{
    bigint::BigInt,
    context::Context,
    error::{panic_on_error, Error},
    math,
    tuning::Tuning,
};
use core::ops::Mul;
use static_assertions::const_assert;

pub(crate) mod comba;
pub(crate) mod karatsuba;
pub(crate) mod normal;

use self::comba::mul_comba8;
use self::karatsuba::{mul_part_recursive, mul_recursive, ThreadBudget};
use self::normal::mul_normal;

/// Operand length from which the recursive multipliers may be used.
const MULL_SIZE_NORMAL: usize = 16;

/// Subproblem length below which the recursion falls back to the
/// schoolbook method.
pub(crate) const MUL_RECURSIVE_SIZE_NORMAL: usize = 16;

// The recursion bottoms out on the 8-word Comba kernel.
const_assert!(MUL_RECURSIVE_SIZE_NORMAL >= 8);
const_assert!(MULL_SIZE_NORMAL >= MUL_RECURSIVE_SIZE_NORMAL);

impl Tuning {
    /// Signed multiplication: `r = a * b`, with scratch from `ctx`.
    pub fn mul(
        &self,
        r: &mut BigInt,
        a: &BigInt,
        b: &BigInt,
        ctx: &mut Context,
    ) -> Result<(), Error> {
        self.mul_fixed_top(r, a, b, ctx)?;
        r.normalize();
        Ok(())
    }

    /// Multiplication producing a fixed-top result: `top` is set to
    /// `a.top + b.top`, which may over-report the product by one zero
    /// word.
    fn mul_fixed_top(
        &self,
        r: &mut BigInt,
        a: &BigInt,
        b: &BigInt,
        ctx: &mut Context,
    ) -> Result<(), Error> {
        a.check();
        b.check();
        let a_words = a.as_words();
        let b_words = b.as_words();
        let al = a_words.len();
        let bl = b_words.len();

        if al == 0 || bl == 0 {
            r.set_zero();
            return Ok(());
        }
        let top = al + bl;
        let sign = a.sign() * b.sign();

        if al == bl && al == 8 {
            r.expand(16)?;
            mul_comba8(&mut r.words_mut()[..16], a_words, b_words);
        } else if al >= MULL_SIZE_NORMAL && bl >= MULL_SIZE_NORMAL && al.abs_diff(bl) <= 1 {
            // Balanced operands: recurse around the largest power of two
            // not above the longer operand.
            let j = math::floor_pow_2(al.max(bl));
            let k = 2 * j;
            let budget = ThreadBudget::new(self.mul_recursive_threads);
            if al > j || bl > j {
                let t = ctx.scratch(4 * k)?;
                r.expand(2 * k)?;
                mul_part_recursive(
                    &mut r.words_mut()[..2 * k],
                    a_words,
                    b_words,
                    j,
                    t,
                    self,
                    &budget,
                )?;
            } else {
                let t = ctx.scratch(2 * k)?;
                r.expand(k)?;
                mul_recursive(&mut r.words_mut()[..k], a_words, b_words, j, t, self, &budget)?;
            }
        } else {
            r.expand(top)?;
            mul_normal(
                &mut r.words_mut()[..top],
                a_words,
                b_words,
                self.mul_normal_threads,
                self.min_normal_parallel,
            )?;
        }

        r.set_top(top);
        r.set_fixed_top(true);
        r.set_sign(sign);
        Ok(())
    }
}

/// Signed multiplication with the default [Tuning]: `r = a * b`.
pub fn mul(r: &mut BigInt, a: &BigInt, b: &BigInt, ctx: &mut Context) -> Result<(), Error> {
    Tuning::default().mul(r, a, b, ctx)
}

impl Mul<&BigInt> for &BigInt {
    type Output = BigInt;

    fn mul(self, rhs: &BigInt) -> BigInt {
        let mut res = BigInt::zero();
        let mut ctx = Context::new();
        Tuning::default()
            .mul(&mut res, self, rhs, &mut ctx)
            .unwrap_or_else(|e| panic_on_error(e));
        res
    }
}

impl Mul<BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn mul(self, rhs: BigInt) -> BigInt {
        &self * &rhs
    }
}

impl Mul<&BigInt> for BigInt {
    type Output = BigInt;

    #[inline]
    fn mul(self, rhs: &BigInt) -> BigInt {
        &self * rhs
    }
}

impl Mul<BigInt> for &BigInt {
    type Output = BigInt;

    #[inline]
    fn mul(self, rhs: BigInt) -> BigInt {
        self * &rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::Sign::Positive;

    #[test]
    fn test_mul_zero_operand() {
        let mut ctx = Context::new();
        let mut r = BigInt::from(99u8);
        mul(&mut r, &BigInt::zero(), &BigInt::from(-7i8), &mut ctx).unwrap();
        assert!(r.is_zero());
        assert_eq!(r.sign(), Positive);
    }

    #[test]
    fn test_mul_sign() {
        let a = BigInt::from(-3i8);
        let b = BigInt::from(7u8);
        assert_eq!(&a * &b, BigInt::from(-21i8));
        assert_eq!(&a * &a, BigInt::from(9u8));
    }

    #[test]
    fn test_mul_normalizes_top() {
        // 2 * 3 has tops 1 and 1; the fixed top of 2 must be trimmed.
        let r = &BigInt::from(2u8) * &BigInt::from(3u8);
        assert_eq!(r.as_words(), [6]);
    }
}
