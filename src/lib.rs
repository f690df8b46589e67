// Licensed under either of
//
// * Apache License, Version 2.0
//   (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)
// * MIT license
//   (LICENSE-MIT or https://opensource.org/licenses/MIT)
//
// at your option.

//! A parallel big integer arithmetic library.
//!
//! The library implements arbitrary-precision signed addition, subtraction
//! and multiplication, fanning the work out over worker threads while
//! producing results bit-identical to the sequential algorithms. Addition
//! and subtraction split the operands into per-worker segments and
//! reconcile the carry/borrow chain after the join; multiplication uses a
//! chunked schoolbook method for lopsided operands and recursive Karatsuba
//! under a live-worker budget for balanced ones.
//!
//! ```
//! use parbig::{add, mul, BigInt, Context};
//!
//! let a = BigInt::from(0x123456789abcu64);
//! let b = BigInt::from(0x444333222111fffu64);
//! let mut ctx = Context::new();
//!
//! let mut r = BigInt::zero();
//! mul(&mut r, &a, &b, &mut ctx).unwrap();
//! assert_eq!(r, &a * &b);
//!
//! let mut s = BigInt::zero();
//! add(&mut s, &a, &b).unwrap();
//! assert_eq!(s, &a + &b);
//! ```
//!
//! Worker counts and parallel thresholds are runtime knobs on [Tuning];
//! the free functions use [Tuning::default]. For a fixed [Tuning], results
//! are deterministic and identical to the single-threaded reference.

pub use crate::{
    add_ops::{add, sub, uadd, usub},
    arch::word::Word,
    bigint::BigInt,
    context::Context,
    error::Error,
    mul::mul,
    sign::Sign,
    tuning::Tuning,
};

mod add;
mod add_ops;
mod arch;
mod bigint;
mod buffer;
mod cmp;
mod context;
mod error;
mod math;
mod mul;
mod primitive;
mod sign;
mod tuning;
