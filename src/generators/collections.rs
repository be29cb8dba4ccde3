use std::any::type_name;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::core::*;
use super::filtering::*;
use super::numbers::*;
use crate::data::*;

const DEFAULT_MAX_TRIES: usize = 10;

/// See [`vecs`](fn.vecs.html)
#[derive(Debug, Clone)]
pub struct VecGenerator<G> {
    inner: G,
}

/// Generates vectors with items given by `inner`. The length is drawn from
/// `0..=size`, and each item from its own split of the source.
///
/// Shrinks try the empty vector first, then progressively smaller chunks
/// removed, then each item shrunk in turn.
pub fn vecs<G: Generator>(inner: G) -> VecGenerator<G> {
    VecGenerator { inner }
}

impl<G: Generator> Generator for VecGenerator<G> {
    type Item = Vec<G::Item>;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let (r1, r2) = src.split();
        let len = rand_range(r1, 0, size_bound(size)) as usize;
        let roses = r2
            .split_n(len)
            .into_iter()
            .map(|src| self.inner.generate(src, size))
            .collect::<Maybe<Vec<_>>>()?;
        Ok(collection_tree(roses, |items| items))
    }
}

/// Permutes `items` uniformly, using only `src`. For each position in turn,
/// swaps it with a position drawn from the remainder.
pub fn shuffle<T>(src: RandomSource, mut items: Vec<T>) -> Vec<T> {
    let n = items.len();
    let mut src = src;
    for i in 0..n {
        let (r1, r2) = src.split();
        let j = rand_range(r1, i as i64, (n - 1) as i64) as usize;
        items.swap(i, j);
        src = r2;
    }
    items
}

/// How many elements a distinct collection should hold, and how hard to
/// try finding them.
///
/// Either an exact `num_elements`, or a range given by `min_elements`
/// (default 0) and `max_elements` (default `min_elements + size`).
#[derive(Clone)]
pub struct DistinctOptions {
    num_elements: Option<usize>,
    min_elements: Option<usize>,
    max_elements: Option<usize>,
    max_tries: usize,
    on_exhausted: Option<ExhaustionHook>,
}

impl Default for DistinctOptions {
    fn default() -> Self {
        DistinctOptions {
            num_elements: None,
            min_elements: None,
            max_elements: None,
            max_tries: DEFAULT_MAX_TRIES,
            on_exhausted: None,
        }
    }
}

impl fmt::Debug for DistinctOptions {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("DistinctOptions")
            .field("num_elements", &self.num_elements)
            .field("min_elements", &self.min_elements)
            .field("max_elements", &self.max_elements)
            .field("max_tries", &self.max_tries)
            .field("on_exhausted", &self.on_exhausted.is_some())
            .finish()
    }
}

impl DistinctOptions {
    /// Requires exactly `n` elements.
    pub fn num_elements(&self, n: usize) -> Self {
        DistinctOptions {
            num_elements: Some(n),
            ..self.clone()
        }
    }

    /// Requires at least `n` elements.
    pub fn min_elements(&self, n: usize) -> Self {
        DistinctOptions {
            min_elements: Some(n),
            ..self.clone()
        }
    }

    /// Allows at most `n` elements.
    pub fn max_elements(&self, n: usize) -> Self {
        DistinctOptions {
            max_elements: Some(n),
            ..self.clone()
        }
    }

    /// How many consecutive duplicate draws we tolerate before giving up.
    pub fn max_tries(&self, max_tries: usize) -> Self {
        DistinctOptions {
            max_tries,
            ..self.clone()
        }
    }

    /// Overrides the error raised once we give up.
    pub fn on_exhausted<F>(&self, hook: F) -> Self
    where
        F: Fn(&Exhaustion) -> GenError + 'static,
    {
        DistinctOptions {
            on_exhausted: Some(Rc::new(hook)),
            ..self.clone()
        }
    }

    fn validate(&self) {
        if self.num_elements.is_some() {
            assert!(
                self.min_elements.is_none() && self.max_elements.is_none(),
                "num_elements cannot be combined with min_elements or max_elements"
            );
        }
        if let (Some(min), Some(max)) = (self.min_elements, self.max_elements) {
            assert!(
                min <= max,
                "min_elements {} exceeds max_elements {}",
                min,
                max
            );
        }
    }

    fn accepts(&self, len: usize) -> bool {
        match self.num_elements {
            Some(n) => len == n,
            None => {
                len >= self.min_elements.unwrap_or(0)
                    && self.max_elements.map(|max| len <= max).unwrap_or(true)
            }
        }
    }
}

struct Distinct<C, G, KF, K> {
    witness: PhantomData<fn() -> K>,
    empty: C,
    key_fn: KF,
    allow_duplicates_after_shrink: bool,
    ordered: bool,
    inner: G,
    options: DistinctOptions,
}

/// See [`distinct_collection`](fn.distinct_collection.html)
pub struct DistinctCollection<C, G, KF, K> {
    shared: Rc<Distinct<C, G, KF, K>>,
}

impl<C, G, KF, K> Clone for DistinctCollection<C, G, KF, K> {
    fn clone(&self) -> Self {
        DistinctCollection {
            shared: self.shared.clone(),
        }
    }
}

/// Builds collections of elements from `inner` that are distinct by
/// `key_fn`.
///
/// Elements are drawn one at a time. A draw whose key has already been seen
/// is discarded, and the next draw uses a size one larger. After `max_tries`
/// consecutive duplicates we stop: with fewer than the minimum number of
/// elements that is an [`Exhaustion`](../data/struct.Exhaustion.html),
/// otherwise the collection gathered so far is used.
///
/// When `ordered`, the elements are shuffled before being added to `empty`,
/// so that simpler elements do not systematically come first.
///
/// Shrinks only ever produce collections of an accepted size. Unless
/// `allow_duplicates_after_shrink`, they also stay distinct by `key_fn`.
///
/// # Panics
///
/// If the options combine `num_elements` with `min_elements` or
/// `max_elements`, or `min_elements` exceeds `max_elements`.
pub fn distinct_collection<C, G, KF, K>(
    empty: C,
    key_fn: KF,
    allow_duplicates_after_shrink: bool,
    ordered: bool,
    inner: G,
    options: DistinctOptions,
) -> DistinctCollection<C, G, KF, K>
where
    G: Generator,
    C: Clone + Extend<G::Item> + 'static,
    KF: Fn(&G::Item) -> K + 'static,
    K: Ord,
{
    options.validate();
    DistinctCollection {
        shared: Rc::new(Distinct {
            witness: PhantomData,
            empty,
            key_fn,
            allow_duplicates_after_shrink,
            ordered,
            inner,
            options,
        }),
    }
}

fn identity<T: Clone>(v: &T) -> T {
    v.clone()
}

/// Vectors of distinct elements, in random order.
pub fn distinct_vecs<G>(
    inner: G,
    options: DistinctOptions,
) -> DistinctCollection<Vec<G::Item>, G, fn(&G::Item) -> G::Item, G::Item>
where
    G: Generator,
    G::Item: Ord,
{
    distinct_collection(
        Vec::new(),
        identity as fn(&G::Item) -> G::Item,
        false,
        true,
        inner,
        options,
    )
}

/// Vectors of elements with distinct keys, in random order.
pub fn distinct_vecs_by<G, KF, K>(
    inner: G,
    key_fn: KF,
    options: DistinctOptions,
) -> DistinctCollection<Vec<G::Item>, G, KF, K>
where
    G: Generator,
    KF: Fn(&G::Item) -> K + 'static,
    K: Ord,
{
    distinct_collection(Vec::new(), key_fn, false, true, inner, options)
}

/// Sets of the given type, populated with elements from `inner`.
///
/// To generate values of `BTreeSet<i64>`:
///
/// ```
/// use std::collections::BTreeSet;
/// use conjectures::generators::*;
/// let gen = sets::<BTreeSet<_>, _>(choose(0, 100), DistinctOptions::default());
/// ```
pub fn sets<C, G>(
    inner: G,
    options: DistinctOptions,
) -> DistinctCollection<C, G, fn(&G::Item) -> G::Item, G::Item>
where
    G: Generator,
    G::Item: Ord,
    C: Default + Clone + Extend<G::Item> + 'static,
{
    distinct_collection(
        C::default(),
        identity as fn(&G::Item) -> G::Item,
        true,
        false,
        inner,
        options,
    )
}

impl<C, G, KF, K> Distinct<C, G, KF, K>
where
    G: Generator,
    C: Clone + Extend<G::Item> + 'static,
    KF: Fn(&G::Item) -> K,
    K: Ord,
{
    fn assemble(
        &self,
        src: RandomSource,
        size: usize,
        target: usize,
        min: usize,
    ) -> Maybe<ShrinkTree<C>> {
        let max_tries = self.options.max_tries;
        let mut roses = Vec::new();
        let mut seen = BTreeSet::new();
        let mut src = src;
        let mut size = size;
        let mut tries = 0;
        loop {
            if tries >= max_tries && roses.len() < min {
                return Err(exhausted(
                    &self.options.on_exhausted,
                    Exhaustion {
                        combinator: "distinct_collection",
                        generator: type_name::<G>(),
                        max_tries,
                        num_elements: self.options.num_elements,
                    },
                ));
            }
            if tries >= max_tries || roses.len() >= target {
                break;
            }
            let (r1, r2) = src.split();
            let rose = self.inner.generate(r1, size)?;
            if seen.insert((self.key_fn)(rose.value())) {
                roses.push(rose);
                tries = 0;
            } else {
                trace!("distinct_collection collision {} at size {}", tries + 1, size);
                size = size.saturating_add(1);
                tries += 1;
            }
            src = r2;
        }
        debug!("distinct_collection assembled {} of {} elements", roses.len(), target);

        let roses = if self.ordered { shuffle(src, roses) } else { roses };
        let empty = self.empty.clone();
        Ok(collection_tree(roses, move |items| {
            let mut coll = empty.clone();
            coll.extend(items);
            coll
        }))
    }
}

fn distinct_by<'a, T, K, F, I>(key_fn: F, items: I) -> bool
where
    T: 'a,
    K: Ord,
    F: Fn(&T) -> K,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = BTreeSet::new();
    items.into_iter().all(|item| seen.insert(key_fn(item)))
}

impl<C, G, KF, K> Generator for DistinctCollection<C, G, KF, K>
where
    G: Generator + 'static,
    C: Clone + Extend<G::Item> + 'static,
    for<'a> &'a C: IntoIterator<Item = &'a G::Item>,
    KF: Fn(&G::Item) -> K + 'static,
    K: Ord + 'static,
{
    type Item = C;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let shared = self.shared.clone();
        let tree = match shared.options.num_elements {
            Some(n) => shared.assemble(src, size, n, n)?,
            None => {
                let min = shared.options.min_elements.unwrap_or(0);
                let max = shared.options.max_elements.unwrap_or_else(|| min.saturating_add(size));
                let (r1, r2) = src.split();
                let targets = choose(size_bound(min), size_bound(max)).generate(r1, size)?;
                let assembler = shared.clone();
                targets.flat_map(move |target| assembler.assemble(r2, size, target as usize, min))?
            }
        };

        Ok(tree.filter(move |coll: &C| {
            shared.options.accepts(coll.into_iter().count())
                && (shared.allow_duplicates_after_shrink
                    || distinct_by(|v| (shared.key_fn)(v), coll))
        }))
    }
}
