use num_bigint::BigUint;
use parbig::{mul, BigInt, Context, Sign, Tuning, Word};

/// Deterministic word pattern with spread-out bits.
fn test_words(len: usize, seed: Word) -> Vec<Word> {
    (0..len)
        .map(|i| (i as Word).wrapping_add(seed).wrapping_mul(0x9e3779b9) | 1)
        .collect()
}

fn to_biguint(x: &BigInt) -> BigUint {
    let mut bytes = Vec::with_capacity(x.as_words().len() * core::mem::size_of::<Word>());
    for w in x.as_words() {
        bytes.extend_from_slice(&w.to_le_bytes());
    }
    BigUint::from_bytes_le(&bytes)
}

/// Check `a * b` against the reference library, through the free
/// function, a tuned call, and the operator.
fn check_mul(a: &BigInt, b: &BigInt) {
    let expected = to_biguint(&a.abs()) * to_biguint(&b.abs());
    let expected_sign = if a.is_zero() || b.is_zero() || expected == BigUint::default() {
        Sign::Positive
    } else if a.sign() == b.sign() {
        Sign::Positive
    } else {
        Sign::Negative
    };

    let mut ctx = Context::new();
    let mut r = BigInt::zero();
    mul(&mut r, a, b, &mut ctx).unwrap();
    assert_eq!(to_biguint(&r), expected);
    assert_eq!(r.sign(), expected_sign);
    // The result is normalised.
    assert!(r.as_words().last().copied() != Some(0));

    assert_eq!(&r, &(a * b));

    let sequential = Tuning {
        add_threads: 1,
        mul_normal_threads: 1,
        mul_recursive_threads: 1,
        ..Tuning::default()
    };
    let mut r_seq = BigInt::zero();
    sequential.mul(&mut r_seq, a, b, &mut ctx).unwrap();
    assert_eq!(r.as_words(), r_seq.as_words());
    assert_eq!(r.sign(), r_seq.sign());
}

#[test]
fn test_comba_direct_path() {
    // Equal 8-word operands take the Comba branch.
    let a = BigInt::from_words(&test_words(8, 1));
    let b = BigInt::from_words(&test_words(8, 2));
    check_mul(&a, &b);

    let max = BigInt::from_words(&[Word::MAX; 8]);
    check_mul(&max, &max);
}

#[test]
fn test_karatsuba_zero_branch() {
    // Equal low and high halves make the first-level difference product
    // vanish.
    let mut half = test_words(16, 3);
    let copy = half.clone();
    half.extend_from_slice(&copy);
    let a = BigInt::from_words(&half);
    let b = BigInt::from_words(&test_words(32, 4));
    check_mul(&a, &b);
    check_mul(&a, &a);
}

#[test]
fn test_dispatch_boundary_sizes() {
    // Lengths straddling every dispatch boundary: schoolbook, Comba,
    // balanced recursion, part recursion, and back to schoolbook for
    // lopsided operands.
    let cases: [(usize, usize); 16] = [
        (1, 1),
        (2, 1),
        (7, 8),
        (8, 8),
        (8, 9),
        (15, 15),
        (15, 16),
        (16, 16),
        (16, 17),
        (17, 17),
        (31, 32),
        (32, 32),
        (33, 32),
        (40, 23),
        (64, 64),
        (100, 3),
    ];
    for (la, lb) in cases {
        let a = BigInt::from_words(&test_words(la, la as Word));
        let b = BigInt::from_words(&test_words(lb, lb as Word + 100));
        check_mul(&a, &b);
    }
}

#[test]
fn test_high_half_overhang_sizes() {
    // Sizes whose high halves stick out past the first recursive split,
    // covering the partial recursion's own splitting branches.
    for len in [33, 48, 49, 50, 63, 64, 65, 96, 97, 127, 128, 129] {
        let a = BigInt::from_words(&test_words(len, 5));
        let b = BigInt::from_words(&test_words(len, 6));
        check_mul(&a, &b);
        let b1 = BigInt::from_words(&test_words(len - 1, 7));
        check_mul(&a, &b1);
    }
}

#[test]
fn test_sign_law() {
    let a = BigInt::from_words(&test_words(20, 8));
    let b = BigInt::from_words(&test_words(20, 9));
    for (x, y, sign) in [
        (a.clone(), b.clone(), Sign::Positive),
        (-&a, b.clone(), Sign::Negative),
        (a.clone(), -&b, Sign::Negative),
        (-&a, -&b, Sign::Positive),
    ] {
        let r = &x * &y;
        assert_eq!(r.sign(), sign);
        check_mul(&x, &y);
    }
}

#[test]
fn test_zero_and_one_laws() {
    let x = BigInt::from_words(&test_words(50, 10));
    let zero = BigInt::zero();
    let one = BigInt::from(1u8);

    let r = &x * &zero;
    assert!(r.is_zero());
    assert_eq!(r.sign(), Sign::Positive);
    assert_eq!(&zero * &x, r);

    assert_eq!(&x * &one, x);
    assert_eq!(&one * &x, x);
    assert_eq!(&(-&x) * &one, -&x);
}

#[test]
fn test_square_and_reassignment() {
    // Aliasing-shaped uses: squaring and overwriting one factor.
    let a = BigInt::from_words(&test_words(64, 11));
    let square = &a * &a;
    assert_eq!(to_biguint(&square), to_biguint(&a) * to_biguint(&a));

    let b = BigInt::from_words(&test_words(40, 12));
    let expected = to_biguint(&a) * to_biguint(&b);
    let mut x = a.clone();
    x = &x * &b;
    assert_eq!(to_biguint(&x), expected);
}

#[test]
fn test_context_reuse() {
    let mut ctx = Context::new();
    let mut r = BigInt::zero();
    for len in [8, 130, 16, 256, 3] {
        let a = BigInt::from_words(&test_words(len, 13));
        let b = BigInt::from_words(&test_words(len, 14));
        mul(&mut r, &a, &b, &mut ctx).unwrap();
        assert_eq!(to_biguint(&r), to_biguint(&a) * to_biguint(&b));
    }
}
