use std::rc::Rc;

use super::core::*;
use super::numbers::*;
use crate::data::*;

/// See [`one_of`](fn.one_of.html)
#[derive(Debug)]
pub struct OneOf<T> {
    gens: Rc<Vec<BoxedGenerator<T>>>,
}

/// See [`frequency`](fn.frequency.html)
#[derive(Debug)]
pub struct Frequency<T> {
    pairs: Rc<Vec<(u64, BoxedGenerator<T>)>>,
    total: u64,
}

/// See [`elements`](fn.elements.html)
#[derive(Debug)]
pub struct Elements<T> {
    values: Rc<Vec<T>>,
}

/// Picks one of `gens` uniformly, then generates from it. Equivalent to
/// `choose(0, len - 1).bind(|i| gens[i])`, so shrinks try earlier
/// generators first.
///
/// More alternatives can be added with [`or`](struct.OneOf.html#method.or).
///
/// # Panics
///
/// If `gens` is empty.
pub fn one_of<T, I>(gens: I) -> OneOf<T>
where
    T: Clone + 'static,
    I: IntoIterator<Item = BoxedGenerator<T>>,
{
    let gens = gens.into_iter().collect::<Vec<_>>();
    assert!(!gens.is_empty(), "one_of requires at least one generator");
    OneOf {
        gens: Rc::new(gens),
    }
}

/// Picks one of the generators, with probability proportional to its
/// weight. Zero weights are never picked.
///
/// Shrinks first try a fresh draw from each generator listed before the one
/// picked (with the same source and size), then the picked value's own
/// shrinks.
///
/// # Panics
///
/// If no generator has a positive weight, or the weights overflow.
pub fn frequency<T, I>(pairs: I) -> Frequency<T>
where
    T: Clone + 'static,
    I: IntoIterator<Item = (u64, BoxedGenerator<T>)>,
{
    let pairs = pairs
        .into_iter()
        .filter(|&(weight, _)| weight > 0)
        .collect::<Vec<_>>();
    assert!(
        !pairs.is_empty(),
        "frequency must be called with at least one positive weight"
    );
    let total = pairs
        .iter()
        .try_fold(0u64, |acc, &(weight, _)| acc.checked_add(weight))
        .filter(|&total| total <= i64::max_value() as u64);
    let total = match total {
        Some(total) => total,
        None => panic!("frequency weights must sum to at most {}", i64::max_value()),
    };
    Frequency {
        pairs: Rc::new(pairs),
        total,
    }
}

/// Picks one of `values` uniformly. Shrinks toward earlier values.
///
/// # Panics
///
/// If `values` is empty.
pub fn elements<T: Clone + 'static>(values: Vec<T>) -> Elements<T> {
    assert!(!values.is_empty(), "elements requires at least one value");
    Elements {
        values: Rc::new(values),
    }
}

impl<T: Clone + 'static> OneOf<T> {
    /// Adds another alternative.
    pub fn or<G: Generator<Item = T> + 'static>(mut self, gen: G) -> Self {
        Rc::make_mut(&mut self.gens).push(gen.boxed());
        self
    }
}

impl<T: Clone + 'static> Generator for OneOf<T> {
    type Item = T;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let gens = self.gens.clone();
        let last = (gens.len() - 1) as i64;
        choose(0, last)
            .bind(move |i| gens[i as usize].clone())
            .generate(src, size)
    }
}

/// Index of the first alternative whose running weight exceeds `n`.
fn pick<T>(pairs: &[(u64, T)], n: u64) -> usize {
    let mut running = 0;
    for (idx, &(weight, _)) in pairs.iter().enumerate() {
        running += weight;
        if running > n {
            return idx;
        }
    }
    pairs.len() - 1
}

impl<T: Clone + 'static> Generator for Frequency<T> {
    type Item = T;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let (r1, r2) = src.split();
        let draw = choose(0, (self.total - 1) as i64).generate(r1, size)?;
        let idx = pick(&self.pairs, *draw.value() as u64);
        trace!("frequency picked {} of {}", idx, self.pairs.len());
        let chosen = self.pairs[idx].1.generate(r2, size)?;

        let pairs = self.pairs.clone();
        let value = chosen.value().clone();
        Ok(ShrinkTree::new(value, move || {
            let pairs = pairs.clone();
            let earlier = (0..idx).map(move |i| pairs[i].1.generate(r2, size));
            Box::new(earlier.chain(chosen.children()))
        }))
    }
}

impl<T: Clone + 'static> Generator for Elements<T> {
    type Item = T;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let values = self.values.clone();
        let last = (values.len() - 1) as i64;
        Ok(choose(0, last)
            .generate(src, size)?
            .map(move |i| values[i as usize].clone()))
    }
}
