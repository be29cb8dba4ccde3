use std::cmp::min;
use std::rc::Rc;

use crate::data::errors::*;
use crate::data::tree::*;

/// Iterates over progressively smaller reductions of an integer: `v` minus
/// each of `v`, `v/2`, `v/4`, … (rounding toward zero), ie: zero first, then
/// a half, three quarters, seven eighths, and so on.
#[derive(Debug, Clone)]
pub struct Halvings {
    seed: i64,
    step: i64,
}

impl Halvings {
    /// Candidates for shrinking `value` toward zero.
    pub fn new(value: i64) -> Self {
        Halvings {
            seed: value,
            step: value,
        }
    }
}

impl Iterator for Halvings {
    type Item = i64;
    fn next(&mut self) -> Option<i64> {
        if self.step == 0 {
            return None;
        }
        let candidate = self.seed - self.step;
        self.step /= 2;
        Some(candidate)
    }
}

/// The shrink tree for an integer: each candidate from `Halvings` is itself
/// shrunk the same way.
pub fn int_tree(value: i64) -> ShrinkTree<i64> {
    ShrinkTree::new(value, move || {
        Box::new(Halvings::new(value).map(|v| Ok(int_tree(v))))
    })
}

/// Candidate collections with one contiguous chunk cut out. Chunk widths
/// start at the smallest power of two covering the whole collection and
/// halve at each level, so for `n` elements with `2^k >= n` we cut:
///
/// ```text
/// level 0: [0, 2^k)
/// level 1: [0, 2^(k-1)), [2^(k-1), 2^k)
/// level 2: four quarters, and so on down to single elements.
/// ```
///
/// Chunks starting past the end are skipped.
struct RemovalShrinker<T> {
    seed: Rc<Vec<ShrinkTree<T>>>,
    log2sz: usize,
    level: usize,
    chunk: usize,
}

impl<T> RemovalShrinker<T> {
    fn new(seed: Rc<Vec<ShrinkTree<T>>>) -> Self {
        let max_idx = seed.len().saturating_sub(1);
        let max_pow = 0usize.count_zeros();
        let pow = max_pow - max_idx.leading_zeros();
        RemovalShrinker {
            seed,
            log2sz: pow as usize,
            // Ranges from 0..=self.log2sz
            level: 0,
            // Ranges from 0..(1<<self.level)
            chunk: 0,
        }
    }
}

impl<T: Clone + 'static> Iterator for RemovalShrinker<T> {
    type Item = Vec<ShrinkTree<T>>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.level > self.log2sz {
                return None;
            }

            let width = 1 << (self.log2sz - self.level);
            let start = self.chunk * width;

            if start >= self.seed.len() {
                self.chunk = 0;
                self.level += 1;
                continue;
            }
            self.chunk += 1;

            let end = min(start + width, self.seed.len());
            trace!("removed {},{} of {}", start, end, self.seed.len());
            let mut candidate = Vec::with_capacity(self.seed.len() - (end - start));
            candidate.extend_from_slice(&self.seed[..start]);
            candidate.extend_from_slice(&self.seed[end..]);
            return Some(candidate);
        }
    }
}

/// Replaces one element at a time with each of its own shrinks, left to
/// right.
struct ElementShrinker<T> {
    seed: Rc<Vec<ShrinkTree<T>>>,
    pos: usize,
    current: Option<Children<T>>,
}

impl<T> ElementShrinker<T> {
    fn new(seed: Rc<Vec<ShrinkTree<T>>>) -> Self {
        ElementShrinker {
            seed,
            pos: 0,
            current: None,
        }
    }
}

impl<T: Clone + 'static> Iterator for ElementShrinker<T> {
    type Item = Maybe<Vec<ShrinkTree<T>>>;
    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.seed.len() {
            let pos = self.pos;
            let seed = &self.seed;
            let children = self.current.get_or_insert_with(|| seed[pos].children());
            match children.next() {
                Some(Ok(child)) => {
                    let mut candidate = (*self.seed).clone();
                    candidate[pos] = child;
                    return Some(Ok(candidate));
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.pos += 1;
                    self.current = None;
                }
            }
        }
        None
    }
}

/// Builds the shrink tree for a collection assembled from `elements`.
///
/// Candidates are, in order: collections with chunks removed (starting with
/// the empty collection, see `RemovalShrinker`), then collections with a
/// single element shrunk.
pub fn collection_tree<T, C, F>(elements: Vec<ShrinkTree<T>>, build: F) -> ShrinkTree<C>
where
    T: Clone + 'static,
    C: Clone + 'static,
    F: Fn(Vec<T>) -> C + 'static,
{
    collection_tree_with(elements, Rc::new(build))
}

fn collection_tree_with<T, C>(
    elements: Vec<ShrinkTree<T>>,
    build: Rc<dyn Fn(Vec<T>) -> C>,
) -> ShrinkTree<C>
where
    T: Clone + 'static,
    C: Clone + 'static,
{
    let value = build(elements.iter().map(|e| e.value().clone()).collect());
    let elements = Rc::new(elements);
    ShrinkTree::new(value, move || {
        let removals = {
            let build = build.clone();
            RemovalShrinker::new(elements.clone())
                .map(move |es| Ok(collection_tree_with(es, build.clone())))
        };
        let shrunk = {
            let build = build.clone();
            ElementShrinker::new(elements.clone())
                .map(move |es| es.map(|es| collection_tree_with(es, build.clone())))
        };
        Box::new(removals.chain(shrunk))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn values<T: Clone + 'static>(trees: Vec<ShrinkTree<T>>) -> Vec<T> {
        trees.into_iter().map(|t| t.into_value()).collect()
    }

    fn leaves(n: usize) -> Rc<Vec<ShrinkTree<usize>>> {
        Rc::new((0..n).map(ShrinkTree::pure).collect())
    }

    #[test]
    fn halvings_approach_the_original_value() {
        assert_eq!(Halvings::new(100).collect::<Vec<_>>(), vec![0, 50, 75, 88, 94, 97, 99]);
        assert_eq!(Halvings::new(-7).collect::<Vec<_>>(), vec![0, -4, -6]);
        assert_eq!(Halvings::new(0).count(), 0);
    }

    #[test]
    fn halvings_do_not_overflow_at_extremes() {
        let mins = Halvings::new(i64::min_value()).collect::<Vec<_>>();
        assert_eq!(mins[0], 0);
        assert_eq!(mins.len(), 64);
        let maxes = Halvings::new(i64::max_value()).collect::<Vec<_>>();
        assert_eq!(maxes[0], 0);
        assert_eq!(*maxes.last().expect("last"), i64::max_value() - 1);
    }

    #[test]
    fn int_tree_children_are_smaller_in_magnitude() {
        let t = int_tree(37);
        for v in t.iter().take(2000) {
            let v = v.expect("value");
            assert!(v >= 0 && v <= 37, "{}", v);
        }
        let first = t.children().next().expect("child").expect("ok");
        assert_eq!(first.value(), &0);
    }

    #[test]
    fn removal_starts_with_everything() {
        let mut it = RemovalShrinker::new(leaves(5));
        assert_eq!(it.next().map(values), Some(vec![]));
        assert_eq!(it.next().map(values), Some(vec![4]));
        assert_eq!(it.next().map(values), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn removal_ends_with_single_elements() {
        let all = RemovalShrinker::new(leaves(4)).map(values).collect::<Vec<_>>();
        let singles = &all[all.len() - 4..];
        assert_eq!(
            singles,
            &[vec![1, 2, 3], vec![0, 2, 3], vec![0, 1, 3], vec![0, 1, 2]]
        );
    }

    #[test]
    fn removal_of_empty_yields_nothing() {
        assert_eq!(RemovalShrinker::new(leaves(0)).count(), 0);
    }

    #[test]
    fn shrink_by_removal_should_produce_somewhat_unique_outputs() {
        let _ = env_logger::try_init();
        let mut counts = BTreeMap::new();
        for val in RemovalShrinker::new(leaves(256)) {
            *counts.entry(values(val)).or_insert(0) += 1;
        }

        assert!(
            counts.values().all(|&val| val == 1),
            "Expect all items to be unique; non-unique entries {:?}",
            counts
                .iter()
                .filter(|&(_, &v)| v != 1)
                .collect::<BTreeMap<_, _>>()
        )
    }

    #[test]
    fn element_shrinker_replaces_one_at_a_time() {
        let seed = Rc::new(vec![int_tree(2), int_tree(1)]);
        let all = ElementShrinker::new(seed)
            .map(|c| values(c.expect("candidate")))
            .collect::<Vec<_>>();
        assert_eq!(all, vec![vec![0, 1], vec![1, 1], vec![2, 0]]);
    }

    #[test]
    fn collection_tree_tries_empty_first() {
        let t = collection_tree(vec![int_tree(3), int_tree(5)], |v: Vec<i64>| v);
        assert_eq!(t.value(), &vec![3, 5]);
        let first = t.children().next().expect("child").expect("ok");
        assert_eq!(first.value(), &Vec::<i64>::new());
    }
}
