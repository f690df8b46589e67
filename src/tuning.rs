//! Worker-pool tuning.

/// Parallelism knobs for the arithmetic engines.
///
/// The three engines draw from independent worker pools: addition and
/// subtraction fan out over `add_threads` segment workers per call, the
/// chunked schoolbook multiplier over `mul_normal_threads`, and one
/// recursive multiplication keeps at most `mul_recursive_threads` live
/// workers across its whole recursion tree. Thread counts of zero behave
/// as one. For fixed operands and a fixed `Tuning`, results are
/// bit-identical regardless of scheduling.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tuning {
    /// Segment workers for parallel addition and subtraction.
    pub add_threads: usize,
    /// Chunk workers for the schoolbook multiplier.
    pub mul_normal_threads: usize,
    /// Live-worker budget inside one recursive multiplication.
    pub mul_recursive_threads: usize,
    /// Smaller-operand word count up to which the schoolbook multiplier
    /// stays sequential.
    pub min_normal_parallel: usize,
    /// Subproblem word count below which the recursive multiplier stops
    /// spawning and recurses inline.
    pub min_recursive_parallel: usize,
}

impl Default for Tuning {
    fn default() -> Tuning {
        Tuning {
            add_threads: 16,
            mul_normal_threads: 2,
            mul_recursive_threads: 16,
            min_normal_parallel: 64,
            min_recursive_parallel: 128,
        }
    }
}
