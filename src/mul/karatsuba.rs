//! Budgeted recursive Karatsuba multiplication.
//!
//! With `a = a_lo + a_hi * B` and `b = b_lo + b_hi * B` (`B = 2^(W*n)`),
//!
//! ```text
//! a * b = a_lo*b_lo
//!       + (a_lo*b_lo + a_hi*b_hi + (a_lo - a_hi)*(b_hi - b_lo)) * B
//!       + a_hi*b_hi * B^2
//! ```
//!
//! The two half products land in `r[..n2]` and `r[n2..]`, the difference
//! product in `t[n2..2*n2]` with its sign tracked separately, and the
//! middle column is folded in afterwards. Each of the three subproducts
//! may run on its own worker: a frame claims workers from a shared
//! [ThreadBudget] and recurses inline once the budget is spent, so the
//! recursion tree degrades gracefully to the sequential algorithm. The
//! words produced are identical either way.
//!
//! The scratch layout of a frame is fixed: `t[..n]` and `t[n..n2]` hold
//! the half differences, `t[n2..2*n2]` their product, and `t[2*n2..]`
//! seeds the scratch of inline children. Spawned children get a private
//! zeroed buffer instead, freed when the frame joins them.

use crate::{
    add::{add_same_len_in_place, add_words, sub_part_words, sub_same_len_in_place_swap},
    arch::word::{SignedWord, Word},
    cmp::cmp_part,
    error::Error,
    mul::{comba::mul_comba8, normal::mul_normal_seq, MUL_RECURSIVE_SIZE_NORMAL},
    tuning::Tuning,
};
use core::{
    cmp::Ordering,
    sync::atomic::{AtomicUsize, Ordering::Relaxed},
};

/// Sentinel that keeps [ThreadBudget::try_claim] from ever succeeding
/// again.
const EXHAUSTED: usize = usize::MAX / 2;

/// Live-worker budget shared by one recursion tree.
///
/// The read and the increment in `try_claim` are deliberately two steps:
/// frames deciding concurrently can overshoot the limit by their number,
/// which the spawn-or-inline protocol tolerates.
pub(crate) struct ThreadBudget {
    used: AtomicUsize,
    limit: usize,
}

impl ThreadBudget {
    pub(crate) fn new(limit: usize) -> ThreadBudget {
        ThreadBudget {
            // The calling thread counts as one worker.
            used: AtomicUsize::new(1),
            limit: limit.max(1),
        }
    }

    fn try_claim(&self) -> bool {
        if self.used.load(Relaxed) < self.limit {
            self.used.fetch_add(1, Relaxed);
            true
        } else {
            false
        }
    }

    /// Pin the counter so the rest of the tree recurses inline.
    fn exhaust(&self) {
        self.used.store(EXHAUSTED, Relaxed);
    }
}

#[inline]
fn int_sign(ord: Ordering) -> i32 {
    match ord {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// r = a * b around a balanced split at `n = n2 / 2`.
///
/// `a` and `b` have at most `n2` words each; their high halves may fall
/// short of `n` words but must not be empty. `r` has `2 * n2` words and
/// `t` is scratch of `4 * n2` words.
pub(crate) fn mul_recursive(
    r: &mut [Word],
    a: &[Word],
    b: &[Word],
    n2: usize,
    t: &mut [Word],
    tuning: &Tuning,
    budget: &ThreadBudget,
) -> Result<(), Error> {
    debug_assert!(r.len() == 2 * n2);
    debug_assert!(t.len() == 4 * n2);
    debug_assert!(a.len() <= n2 && b.len() <= n2);

    if n2 == 8 && a.len() == 8 && b.len() == 8 {
        mul_comba8(r, a, b);
        return Ok(());
    }
    if n2 < MUL_RECURSIVE_SIZE_NORMAL {
        let prod = a.len() + b.len();
        mul_normal_seq(&mut r[..prod], a, b);
        r[prod..].fill(0);
        return Ok(());
    }

    let n = n2 / 2;
    debug_assert!(a.len() > n && b.len() > n);

    // t[..n2] = (a_lo - a_hi) and (b_hi - b_lo), ordered so both
    // differences are non-negative; `neg` records the sign of their
    // product and `zero` that it vanishes.
    let c1 = int_sign(cmp_part(&a[..n], &a[n..]));
    let c2 = int_sign(cmp_part(&b[n..], &b[..n]));
    let mut neg = false;
    let mut zero = false;
    match c1 * 3 + c2 {
        -4 => {
            sub_part_words(&mut t[..n], &a[n..], &a[..n]);
            sub_part_words(&mut t[n..n2], &b[..n], &b[n..]);
        }
        -2 => {
            sub_part_words(&mut t[..n], &a[n..], &a[..n]);
            sub_part_words(&mut t[n..n2], &b[n..], &b[..n]);
            neg = true;
        }
        2 => {
            sub_part_words(&mut t[..n], &a[..n], &a[n..]);
            sub_part_words(&mut t[n..n2], &b[..n], &b[n..]);
            neg = true;
        }
        4 => {
            sub_part_words(&mut t[..n], &a[..n], &a[n..]);
            sub_part_words(&mut t[n..n2], &b[n..], &b[..n]);
        }
        _ => zero = true,
    }

    if n == 8 && a.len() == n2 && b.len() == n2 {
        // Leaf with complete operands: three Comba products.
        {
            let (t_diff, t_prod) = t.split_at_mut(n2);
            if !zero {
                mul_comba8(&mut t_prod[..n2], &t_diff[..n], &t_diff[n..]);
            } else {
                t_prod[..n2].fill(0);
            }
        }
        mul_comba8(&mut r[..n2], &a[..n], &b[..n]);
        mul_comba8(&mut r[n2..], &a[n..], &b[n..]);
    } else {
        if n2 < tuning.min_recursive_parallel {
            budget.exhaust();
        }
        let (t_head, t_tail) = t.split_at_mut(2 * n2);
        let (t_diff, t_prod) = t_head.split_at_mut(n2);
        let t_diff: &[Word] = t_diff;
        let (r_lo, r_hi) = r.split_at_mut(n2);

        crossbeam::thread::scope(|scope| -> Result<(), Error> {
            let mut handles = Vec::with_capacity(3);

            if !zero {
                if budget.try_claim() {
                    let mut tp = vec![0; 4 * n];
                    handles.push(
                        scope
                            .builder()
                            .name("parbig-rec-mid".into())
                            .spawn(move |_| {
                                mul_recursive(
                                    t_prod,
                                    &t_diff[..n],
                                    &t_diff[n..],
                                    n,
                                    &mut tp,
                                    tuning,
                                    budget,
                                )
                            })
                            .map_err(|_| Error::ThreadSpawn)?,
                    );
                } else {
                    mul_recursive(
                        t_prod,
                        &t_diff[..n],
                        &t_diff[n..],
                        n,
                        &mut t_tail[..4 * n],
                        tuning,
                        budget,
                    )?;
                }
            } else {
                t_prod.fill(0);
            }

            if budget.try_claim() {
                let mut tp = vec![0; 4 * n];
                handles.push(
                    scope
                        .builder()
                        .name("parbig-rec-lo".into())
                        .spawn(move |_| {
                            mul_recursive(r_lo, &a[..n], &b[..n], n, &mut tp, tuning, budget)
                        })
                        .map_err(|_| Error::ThreadSpawn)?,
                );
            } else {
                mul_recursive(r_lo, &a[..n], &b[..n], n, &mut t_tail[..4 * n], tuning, budget)?;
            }

            if budget.try_claim() {
                let mut tp = vec![0; 4 * n];
                handles.push(
                    scope
                        .builder()
                        .name("parbig-rec-hi".into())
                        .spawn(move |_| {
                            mul_recursive(r_hi, &a[n..], &b[n..], n, &mut tp, tuning, budget)
                        })
                        .map_err(|_| Error::ThreadSpawn)?,
                );
            } else {
                mul_recursive(r_hi, &a[n..], &b[n..], n, &mut t_tail[..4 * n], tuning, budget)?;
            }

            for handle in handles {
                handle.join().map_err(|_| Error::ThreadSpawn)??;
            }
            Ok(())
        })
        .map_err(|_| Error::ThreadSpawn)??;
    }

    combine_middle(r, t, n2, neg);
    Ok(())
}

/// r = a * b where the high halves above the split at `n` are partial:
/// `a` has `n + tna` words and `b` has `n + tnb`, with `0 <= tnX < n` and
/// `|tna - tnb| <= 1`. `r` has `4 * n` words and `t` has `8 * n`.
pub(crate) fn mul_part_recursive(
    r: &mut [Word],
    a: &[Word],
    b: &[Word],
    n: usize,
    t: &mut [Word],
    tuning: &Tuning,
    budget: &ThreadBudget,
) -> Result<(), Error> {
    let n2 = 2 * n;
    debug_assert!(r.len() == 4 * n && t.len() == 8 * n);
    debug_assert!(a.len() >= n && b.len() >= n);
    let tna = a.len() - n;
    let tnb = b.len() - n;
    debug_assert!(tna < n && tnb < n);

    if n < 8 {
        let prod = a.len() + b.len();
        mul_normal_seq(&mut r[..prod], a, b);
        return Ok(());
    }

    // Same difference setup as the balanced case, except the vanishing
    // cross term is not short-circuited: it is computed anyway.
    let c1 = int_sign(cmp_part(&a[..n], &a[n..]));
    let c2 = int_sign(cmp_part(&b[n..], &b[..n]));
    let mut neg = false;
    match c1 * 3 + c2 {
        -4 => {
            sub_part_words(&mut t[..n], &a[n..], &a[..n]);
            sub_part_words(&mut t[n..n2], &b[..n], &b[n..]);
        }
        -3 | -2 => {
            sub_part_words(&mut t[..n], &a[n..], &a[..n]);
            sub_part_words(&mut t[n..n2], &b[n..], &b[..n]);
            neg = true;
        }
        -1 | 0 | 1 | 2 => {
            sub_part_words(&mut t[..n], &a[..n], &a[n..]);
            sub_part_words(&mut t[n..n2], &b[..n], &b[n..]);
            neg = true;
        }
        _ => {
            sub_part_words(&mut t[..n], &a[..n], &a[n..]);
            sub_part_words(&mut t[n..n2], &b[n..], &b[..n]);
        }
    }

    if n == 8 {
        {
            let (t_diff, t_prod) = t.split_at_mut(n2);
            mul_comba8(&mut t_prod[..n2], &t_diff[..n], &t_diff[n..]);
        }
        mul_comba8(&mut r[..n2], &a[..n], &b[..n]);
        let r_hi = &mut r[n2..];
        mul_normal_seq(&mut r_hi[..tna + tnb], &a[n..], &b[n..]);
        r_hi[tna + tnb..].fill(0);
    } else {
        if n2 < tuning.min_recursive_parallel {
            budget.exhaust();
        }
        let (t_head, t_tail) = t.split_at_mut(2 * n2);
        let (t_diff, t_prod) = t_head.split_at_mut(n2);
        let t_diff: &[Word] = t_diff;
        let (r_lo, r_hi) = r.split_at_mut(n2);

        crossbeam::thread::scope(|scope| -> Result<(), Error> {
            let mut handles = Vec::with_capacity(3);

            if budget.try_claim() {
                let mut tp = vec![0; 4 * n];
                handles.push(
                    scope
                        .builder()
                        .name("parbig-rec-mid".into())
                        .spawn(move |_| {
                            mul_recursive(
                                t_prod,
                                &t_diff[..n],
                                &t_diff[n..],
                                n,
                                &mut tp,
                                tuning,
                                budget,
                            )
                        })
                        .map_err(|_| Error::ThreadSpawn)?,
                );
            } else {
                mul_recursive(
                    t_prod,
                    &t_diff[..n],
                    &t_diff[n..],
                    n,
                    &mut t_tail[..4 * n],
                    tuning,
                    budget,
                )?;
            }

            if budget.try_claim() {
                let mut tp = vec![0; 4 * n];
                handles.push(
                    scope
                        .builder()
                        .name("parbig-rec-lo".into())
                        .spawn(move |_| {
                            mul_recursive(r_lo, &a[..n], &b[..n], n, &mut tp, tuning, budget)
                        })
                        .map_err(|_| Error::ThreadSpawn)?,
                );
            } else {
                mul_recursive(r_lo, &a[..n], &b[..n], n, &mut t_tail[..4 * n], tuning, budget)?;
            }

            // The high product a_hi * b_hi is itself unbalanced. If the
            // tails reach past the next split, recurse on them as another
            // partial problem; if they stop exactly at it, recurse
            // balanced; otherwise halve the subproblem until it covers
            // the tails.
            let i = n / 2;
            let j = tna.max(tnb) as isize - i as isize;
            if j >= 0 {
                if j == 0 {
                    let (r_child, r_rest) = r_hi.split_at_mut(2 * i);
                    r_rest.fill(0);
                    if budget.try_claim() {
                        let mut tp = vec![0; 4 * i];
                        handles.push(
                            scope
                                .builder()
                                .name("parbig-rec-hi".into())
                                .spawn(move |_| {
                                    mul_recursive(
                                        r_child,
                                        &a[n..],
                                        &b[n..],
                                        i,
                                        &mut tp,
                                        tuning,
                                        budget,
                                    )
                                })
                                .map_err(|_| Error::ThreadSpawn)?,
                        );
                    } else {
                        mul_recursive(
                            r_child,
                            &a[n..],
                            &b[n..],
                            i,
                            &mut t_tail[..4 * i],
                            tuning,
                            budget,
                        )?;
                    }
                } else {
                    // j > 0: the tails stick out past the split, so the
                    // high product is partial again. It covers all of
                    // r_hi and zero-fills its own slack.
                    if budget.try_claim() {
                        let mut tp = vec![0; 8 * i];
                        handles.push(
                            scope
                                .builder()
                                .name("parbig-rec-hi".into())
                                .spawn(move |_| {
                                    mul_part_recursive(
                                        r_hi,
                                        &a[n..],
                                        &b[n..],
                                        i,
                                        &mut tp,
                                        tuning,
                                        budget,
                                    )
                                })
                                .map_err(|_| Error::ThreadSpawn)?,
                        );
                    } else {
                        mul_part_recursive(
                            r_hi,
                            &a[n..],
                            &b[n..],
                            i,
                            &mut t_tail[..8 * i],
                            tuning,
                            budget,
                        )?;
                    }
                }
            } else {
                // j < 0: the high product occupies only the bottom of its
                // region. Zero the region first, then shrink the
                // subproblem until it covers the tails.
                r_hi.fill(0);
                if tna < MUL_RECURSIVE_SIZE_NORMAL && tnb < MUL_RECURSIVE_SIZE_NORMAL {
                    mul_normal_seq(&mut r_hi[..tna + tnb], &a[n..], &b[n..]);
                } else {
                    let mut i = i;
                    loop {
                        i /= 2;
                        // The conditions below rely on tna and tnb
                        // differing by at most one.
                        if i < tna || i < tnb {
                            if budget.try_claim() {
                                let mut tp = vec![0; 8 * i];
                                let (r_child, _) = r_hi.split_at_mut(4 * i);
                                handles.push(
                                    scope
                                        .builder()
                                        .name("parbig-rec-hi".into())
                                        .spawn(move |_| {
                                            mul_part_recursive(
                                                r_child,
                                                &a[n..],
                                                &b[n..],
                                                i,
                                                &mut tp,
                                                tuning,
                                                budget,
                                            )
                                        })
                                        .map_err(|_| Error::ThreadSpawn)?,
                                );
                            } else {
                                mul_part_recursive(
                                    &mut r_hi[..4 * i],
                                    &a[n..],
                                    &b[n..],
                                    i,
                                    &mut t_tail[..8 * i],
                                    tuning,
                                    budget,
                                )?;
                            }
                            break;
                        } else if i == tna || i == tnb {
                            if budget.try_claim() {
                                let mut tp = vec![0; 4 * i];
                                let (r_child, _) = r_hi.split_at_mut(2 * i);
                                handles.push(
                                    scope
                                        .builder()
                                        .name("parbig-rec-hi".into())
                                        .spawn(move |_| {
                                            mul_recursive(
                                                r_child,
                                                &a[n..],
                                                &b[n..],
                                                i,
                                                &mut tp,
                                                tuning,
                                                budget,
                                            )
                                        })
                                        .map_err(|_| Error::ThreadSpawn)?,
                                );
                            } else {
                                mul_recursive(
                                    &mut r_hi[..2 * i],
                                    &a[n..],
                                    &b[n..],
                                    i,
                                    &mut t_tail[..4 * i],
                                    tuning,
                                    budget,
                                )?;
                            }
                            break;
                        }
                    }
                }
            }

            for handle in handles {
                handle.join().map_err(|_| Error::ThreadSpawn)??;
            }
            Ok(())
        })
        .map_err(|_| Error::ThreadSpawn)??;
    }

    combine_middle(r, t, n2, neg);
    Ok(())
}

/// Fold the middle Karatsuba column into `r`:
/// `r[n..n+n2] += r_lo + r_hi - diff_product` (or `+` when the difference
/// product is negative), rippling the net carry up from `r[n + n2]`.
fn combine_middle(r: &mut [Word], t: &mut [Word], n2: usize, neg: bool) {
    let n = n2 / 2;
    debug_assert!(r.len() == 2 * n2);
    let (t_sum, t_rest) = t.split_at_mut(n2);
    let t_mid = &mut t_rest[..n2];

    // t_sum = a_lo*b_lo + a_hi*b_hi
    let mut c1 = SignedWord::from(add_words(t_sum, &r[..n2], &r[n2..]));
    if neg {
        // t_mid = t_sum - t_mid
        c1 -= SignedWord::from(sub_same_len_in_place_swap(t_sum, t_mid));
    } else {
        c1 += SignedWord::from(add_same_len_in_place(t_mid, t_sum));
    }
    c1 += SignedWord::from(add_same_len_in_place(&mut r[n..n + n2], t_mid));

    if c1 != 0 {
        // The middle column is non-negative, so the net carry is too.
        debug_assert!(c1 > 0);
        let carry = c1 as Word;
        let idx = n + n2;
        let t0 = r[idx].wrapping_add(carry);
        r[idx] = t0;
        if t0 < carry {
            // The ripple always dies out before the end of the product.
            for word in r[idx + 1..].iter_mut() {
                let (w, overflow) = word.overflowing_add(1);
                *word = w;
                if !overflow {
                    break;
                }
            }
        }
    }
}
