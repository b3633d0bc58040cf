//! Id-based token run primitives.
//!
//! A run is "present" in a sequence when its ids appear there contiguously and
//! in the same order. All matching is by [`TokenId`](crate::models::TokenId);
//! token text is never compared.

use std::ops::Range;

use crate::models::Token;

/// Locate `run` as a contiguous, order-preserving id run inside `tokens`.
///
/// Returns `None` for an empty run: it is trivially present but has no
/// position to splice at.
pub fn find_run(tokens: &[Token], run: &[Token]) -> Option<Range<usize>> {
    let first = run.first()?;
    let start = tokens.iter().position(|token| token.id == first.id)?;
    let end = start + run.len();

    let candidate = tokens.get(start..end)?;
    candidate
        .iter()
        .zip(run)
        .all(|(have, want)| have.id == want.id)
        .then_some(start..end)
}

/// True if `run` is empty or present in `tokens`
pub fn contains_run(tokens: &[Token], run: &[Token]) -> bool {
    run.is_empty() || find_run(tokens, run).is_some()
}

/// Replace the run `remove` with `insert`.
///
/// Leaves `tokens` untouched and returns false if `remove` is not present.
pub fn splice(tokens: &mut Vec<Token>, remove: &[Token], insert: &[Token]) -> bool {
    match find_run(tokens, remove) {
        Some(range) => {
            tokens.splice(range, insert.iter().cloned());
            true
        }
        None => false,
    }
}

/// True if any id in `a` also appears in `b`
pub fn ids_overlap(a: &[Token], b: &[Token]) -> bool {
    a.iter().any(|left| b.iter().any(|right| left.id == right.id))
}
