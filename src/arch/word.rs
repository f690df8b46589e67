//! Machine word types.

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "32")] {
        /// Machine word: the digit of the big-integer base.
        pub type Word = u32;

        /// Signed machine word.
        pub(crate) type SignedWord = i32;

        /// Double machine word.
        pub(crate) type DoubleWord = u64;
    } else {
        /// Machine word: the digit of the big-integer base.
        pub type Word = u64;

        /// Signed machine word.
        pub(crate) type SignedWord = i64;

        /// Double machine word.
        pub(crate) type DoubleWord = u128;
    }
}
