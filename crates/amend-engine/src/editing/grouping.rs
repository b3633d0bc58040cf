//! Overlap grouping of a sentence's transformations.
//!
//! Edits often depend on each other: "hzve -> have" produces the token that
//! "have be -> has been" later rewrites. Such edits share token ids, and every
//! connected set of them forms one group. Availability only ever needs to be
//! recomputed inside the group that was touched.

use std::collections::VecDeque;

use crate::editing::tokens::ids_overlap;
use crate::models::TokenEdit;

/// Whether two edits of the same sentence overlap.
///
/// With `in_order` set, `earlier` is known to have been produced before
/// `later`, so `earlier` cannot consume a token that `later` adds and that
/// direction is not checked.
pub fn transforms_overlap<A, B>(earlier: &A, later: &B, in_order: bool) -> bool
where
    A: TokenEdit + ?Sized,
    B: TokenEdit + ?Sized,
{
    ids_overlap(earlier.tokens_affected(), later.tokens_affected())
        || ids_overlap(earlier.tokens_added(), later.tokens_affected())
        || (!in_order && ids_overlap(earlier.tokens_affected(), later.tokens_added()))
}

/// Partition `edits` into connected components of the overlap relation.
///
/// Breadth-first from each not-yet-grouped edit, left to right, so group ids
/// are assigned in order of each group's first member. Members of a group are
/// listed in discovery order. Every pair is compared in creation order.
pub fn group_transformations<E: TokenEdit>(edits: &[E]) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; edits.len()];
    let mut groups = Vec::new();

    for seed in 0..edits.len() {
        if assigned[seed] {
            continue;
        }

        let mut members = Vec::new();
        let mut queue = VecDeque::from([seed]);

        while let Some(index) = queue.pop_front() {
            if assigned[index] {
                continue;
            }
            assigned[index] = true;
            members.push(index);

            for other in 0..edits.len() {
                if assigned[other] || other == index {
                    continue;
                }
                let linked = if other > index {
                    transforms_overlap(&edits[index], &edits[other], true)
                } else {
                    transforms_overlap(&edits[other], &edits[index], true)
                };
                if linked {
                    queue.push_back(other);
                }
            }
        }

        groups.push(members);
    }

    groups
}
