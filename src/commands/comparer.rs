//! Ordering of matched overloads.
//!
//! Candidates run by priority (highest first), then by argument count
//! (highest first). Anything still tied keeps registry order.

use std::cmp::Ordering;

use super::overload::{CommandOverload, Invoker};

/// An overload whose binder succeeded this cycle.
pub struct Candidate<'a> {
    /// The overload that matched.
    pub overload: &'a dyn CommandOverload,
    /// The bound action.
    pub invoker: Invoker<'a>,
}

/// Total order used to pick which candidate runs first.
pub fn compare_overloads(a: &dyn CommandOverload, b: &dyn CommandOverload) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| b.argument_count().cmp(&a.argument_count()))
}

/// Sorts candidates in place. The sort is stable.
pub fn sort_candidates(candidates: &mut [Candidate<'_>]) {
    candidates.sort_by(|a, b| compare_overloads(a.overload, b.overload));
}
