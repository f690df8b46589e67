//! Comparisons.

use crate::{
    arch::word::Word,
    bigint::BigInt,
    sign::Sign::*,
};
use core::cmp::Ordering;

/// Compare lhs with rhs as numbers. Lengths must match.
pub(crate) fn cmp_same_len(lhs: &[Word], rhs: &[Word]) -> Ordering {
    debug_assert!(lhs.len() == rhs.len());
    lhs.iter().rev().cmp(rhs.iter().rev())
}

/// Compare two word slices of possibly different lengths as numbers.
///
/// Any non-zero word of the longer slice above the common length decides
/// the comparison outright.
pub(crate) fn cmp_part(lhs: &[Word], rhs: &[Word]) -> Ordering {
    let cl = lhs.len().min(rhs.len());
    if lhs[cl..].iter().any(|&w| w != 0) {
        return Ordering::Greater;
    }
    if rhs[cl..].iter().any(|&w| w != 0) {
        return Ordering::Less;
    }
    cmp_same_len(&lhs[..cl], &rhs[..cl])
}

/// Compare magnitudes, ignoring signs.
pub(crate) fn ucmp(a: &BigInt, b: &BigInt) -> Ordering {
    let a_words = a.as_words();
    let b_words = b.as_words();
    a_words
        .len()
        .cmp(&b_words.len())
        .then_with(|| cmp_same_len(a_words, b_words))
}

impl Ord for BigInt {
    fn cmp(&self, other: &BigInt) -> Ordering {
        match (self.sign(), other.sign()) {
            (Positive, Positive) => ucmp(self, other),
            (Positive, Negative) => Ordering::Greater,
            (Negative, Positive) => Ordering::Less,
            (Negative, Negative) => ucmp(other, self),
        }
    }
}

impl PartialOrd for BigInt {
    #[inline]
    fn partial_cmp(&self, other: &BigInt) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_same_len() {
        assert_eq!(cmp_same_len(&[1, 2], &[1, 2]), Ordering::Equal);
        assert_eq!(cmp_same_len(&[9, 2], &[1, 3]), Ordering::Less);
        assert_eq!(cmp_same_len(&[9, 3], &[1, 3]), Ordering::Greater);
    }

    #[test]
    fn test_cmp_part() {
        assert_eq!(cmp_part(&[1, 2, 0], &[1, 2]), Ordering::Equal);
        assert_eq!(cmp_part(&[1, 2, 1], &[1, 2]), Ordering::Greater);
        assert_eq!(cmp_part(&[1, 2], &[1, 2, 0, 7]), Ordering::Less);
        assert_eq!(cmp_part(&[3, 2], &[1, 2]), Ordering::Greater);
    }

    #[test]
    fn test_bigint_ord() {
        let a = BigInt::from(5u8);
        let b = BigInt::from(-7i8);
        let c = BigInt::from(-5i8);
        assert!(a > b);
        assert!(b < c);
        assert!(c < a);
        assert!(BigInt::zero() > b);
        assert!(BigInt::zero() < a);
    }
}
