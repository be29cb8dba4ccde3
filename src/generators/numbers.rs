use std::cmp::{max, min};

use super::core::*;
use crate::data::*;

/// See [`choose`](fn.choose.html)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choose {
    lo: i64,
    hi: i64,
}

/// Generates integers uniformly between `lo` and `hi`, inclusive of both.
///
/// Shrinks toward zero (see [`Halvings`](../data/struct.Halvings.html)),
/// never leaving the range.
///
/// # Panics
///
/// If `lo > hi`.
pub fn choose(lo: i64, hi: i64) -> Choose {
    assert!(
        lo <= hi,
        "choose: lower bound {} exceeds upper bound {}",
        lo,
        hi
    );
    Choose { lo, hi }
}

/// A size or count as a range bound, saturating at `i64::max_value()`.
pub(crate) fn size_bound(n: usize) -> i64 {
    min(n, i64::max_value() as usize) as i64
}

/// Maps a uniform draw from `src` onto `[lo, hi]`.
pub(crate) fn rand_range(src: RandomSource, lo: i64, hi: i64) -> i64 {
    let factor = src.rand_double();
    let width = hi as i128 - lo as i128 + 1;
    let value = if width < i64::max_value() as i128 {
        lo as i128 + (factor * width as f64).floor() as i128
    } else {
        // The width has no exact double representation here, so rounding
        // can carry us past either end.
        (lo as f64 + factor * width as f64).floor() as i128
    };
    max(lo as i128, min(hi as i128, value)) as i64
}

impl Generator for Choose {
    type Item = i64;
    fn generate(&self, src: RandomSource, _: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let Choose { lo, hi } = *self;
        let value = rand_range(src, lo, hi);
        Ok(int_tree(value).filter(move |&v| v >= lo && v <= hi))
    }
}
