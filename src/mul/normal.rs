//! Schoolbook multiplication.

use crate::{
    add::add_same_len_in_place,
    arch::word::Word,
    error::Error,
    primitive::{extend_word, split_double_word},
};

/// r = a * w
///
/// Returns the high word of the product.
#[must_use]
pub(crate) fn mul_words(r: &mut [Word], a: &[Word], w: Word) -> Word {
    debug_assert!(r.len() == a.len());
    let mut carry: Word = 0;
    for (r, a) in r.iter_mut().zip(a.iter()) {
        // a * w + carry <= MAX * MAX + MAX < DoubleWord::MAX
        let (v_lo, v_hi) =
            split_double_word(extend_word(*a) * extend_word(w) + extend_word(carry));
        *r = v_lo;
        carry = v_hi;
    }
    carry
}

/// r += a * w
///
/// Returns the high word.
#[must_use]
pub(crate) fn mul_add_words(r: &mut [Word], a: &[Word], w: Word) -> Word {
    debug_assert!(r.len() == a.len());
    let mut carry: Word = 0;
    for (r, a) in r.iter_mut().zip(a.iter()) {
        // r + a * w + carry <= MAX * MAX + 2 * MAX = DoubleWord::MAX
        let (v_lo, v_hi) = split_double_word(
            extend_word(*r) + extend_word(carry) + extend_word(*a) * extend_word(w),
        );
        *r = v_lo;
        carry = v_hi;
    }
    carry
}

/// r = a * b by the sequential schoolbook method.
///
/// `r` must have exactly `a.len() + b.len()` words.
pub(crate) fn mul_normal_seq(r: &mut [Word], a: &[Word], b: &[Word]) {
    debug_assert!(r.len() == a.len() + b.len());
    if a.is_empty() || b.is_empty() {
        r.fill(0);
        return;
    }
    let na = a.len();
    r[na] = mul_words(&mut r[..na], a, b[0]);
    for j in 1..b.len() {
        r[j + na] = mul_add_words(&mut r[j..j + na], a, b[j]);
    }
}

/// r = a * b.
///
/// When the smaller operand has more than `min_parallel` digits, it is
/// split into one contiguous digit chunk per worker; each worker forms
/// `a` times its chunk in a private buffer, and after the join the
/// shifted partial products are summed into `r` in chunk order, the
/// carry of each chunk placed in the word just past its contribution.
pub(crate) fn mul_normal(
    r: &mut [Word],
    a: &[Word],
    b: &[Word],
    nthreads: usize,
    min_parallel: usize,
) -> Result<(), Error> {
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    let na = a.len();
    let nb = b.len();
    debug_assert!(r.len() == na + nb);

    let nthreads = nthreads.max(1);
    let new_nb = nb / nthreads;
    if nb <= min_parallel || nthreads == 1 || new_nb == 0 {
        mul_normal_seq(r, a, b);
        return Ok(());
    }

    let products = crossbeam::thread::scope(|scope| -> Result<Vec<Vec<Word>>, Error> {
        let mut handles = Vec::with_capacity(nthreads);
        for i in 0..nthreads {
            let lo = new_nb * i;
            let hi = if i == nthreads - 1 { nb } else { lo + new_nb };
            let b_chunk = &b[lo..hi];
            let handle = scope
                .builder()
                .name(format!("parbig-mul-{}", i))
                .spawn(move |_| {
                    let mut p = vec![0; na + b_chunk.len()];
                    mul_normal_seq(&mut p, a, b_chunk);
                    p
                })
                .map_err(|_| Error::ThreadSpawn)?;
            handles.push(handle);
        }
        let mut products = Vec::with_capacity(nthreads);
        for handle in handles {
            products.push(handle.join().map_err(|_| Error::ThreadSpawn)?);
        }
        Ok(products)
    })
    .map_err(|_| Error::ThreadSpawn)??;

    r.fill(0);
    for (i, p) in products.iter().enumerate() {
        let off = new_nb * i;
        let nr = p.len();
        let carry = add_same_len_in_place(&mut r[off..off + nr], p);
        if i != nthreads - 1 {
            r[off + nr] = Word::from(carry);
        } else {
            debug_assert!(!carry);
        }
    }
    Ok(())
}
