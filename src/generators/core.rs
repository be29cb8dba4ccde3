use std::fmt;
use std::rc::Rc;

use crate::data::*;
use crate::generators::filtering::*;

/// An immutable description of how to produce values of `Self::Item`, along
/// with how to shrink them.
///
/// Evaluation is referentially transparent: the same source and size always
/// yield the same tree.
pub trait Generator {
    /// The type of values generated.
    type Item: Clone + 'static;

    /// Evaluates the generator, returning the sampled value at the root of
    /// its shrink tree.
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>>;

    /// Applies `f` to each generated value, and to every shrink of it.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> U + 'static,
        U: Clone + 'static,
    {
        Map {
            inner: self,
            f: Rc::new(f),
        }
    }

    /// Generates a value, and uses it to pick the generator for the final
    /// value.
    ///
    /// Shrinks try simpler values from `self` first (re-running `f` for
    /// each), followed by the shrinks of the final value.
    fn bind<F, H>(self, f: F) -> Bind<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> H + 'static,
        H: Generator,
    {
        Bind {
            inner: self,
            f: Rc::new(f),
        }
    }

    /// Retries generation until `pred` holds, with default options. See
    /// [`SuchThat`](struct.SuchThat.html).
    fn such_that<P>(self, pred: P) -> SuchThat<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item) -> bool + 'static,
    {
        self.such_that_with(pred, SuchThatOptions::default())
    }

    /// As [`such_that`](#method.such_that), with custom options.
    fn such_that_with<P>(self, pred: P, options: SuchThatOptions) -> SuchThat<Self, P>
    where
        Self: Sized,
        P: Fn(&Self::Item) -> bool + 'static,
    {
        SuchThat::new(self, pred, options)
    }

    /// Ignores the caller's size, always using `size`.
    fn resize(self, size: usize) -> Resize<Self>
    where
        Self: Sized,
    {
        Resize { inner: self, size }
    }

    /// Evaluates with the caller's size transformed by `f`.
    fn scale<F>(self, f: F) -> Scale<Self, F>
    where
        Self: Sized,
        F: Fn(usize) -> usize,
    {
        Scale { inner: self, f }
    }

    /// Erases the type of this generator.
    fn boxed(self) -> BoxedGenerator<Self::Item>
    where
        Self: Sized + 'static,
    {
        BoxedGenerator(Rc::new(self))
    }
}

impl<'a, G: Generator + ?Sized> Generator for &'a G {
    type Item = G::Item;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        (**self).generate(src, size)
    }
}

/// See [`pure`](fn.pure.html)
#[derive(Debug, Clone)]
pub struct Pure<V>(V);

/// See [`Generator::map`](trait.Generator.html#method.map)
pub struct Map<G, F> {
    inner: G,
    f: Rc<F>,
}

/// See [`Generator::bind`](trait.Generator.html#method.bind)
pub struct Bind<G, F> {
    inner: G,
    f: Rc<F>,
}

/// See [`sized`](fn.sized.html)
pub struct SizedGenerator<F>(F);

/// See [`Generator::resize`](trait.Generator.html#method.resize)
#[derive(Debug, Clone)]
pub struct Resize<G> {
    inner: G,
    size: usize,
}

/// See [`Generator::scale`](trait.Generator.html#method.scale)
#[derive(Clone)]
pub struct Scale<G, F> {
    inner: G,
    f: F,
}

/// A type-erased, cheaply cloneable generator.
pub struct BoxedGenerator<T>(Rc<dyn Generator<Item = T>>);

/// A generator that always yields `val`, and never shrinks.
pub fn pure<V: Clone + 'static>(val: V) -> Pure<V> {
    Pure(val)
}

/// Builds a generator from the current size, and evaluates it at that same
/// size.
pub fn sized<F, G>(builder: F) -> SizedGenerator<F>
where
    F: Fn(usize) -> G,
    G: Generator,
{
    SizedGenerator(builder)
}

impl<V: Clone + 'static> Generator for Pure<V> {
    type Item = V;
    fn generate(&self, _: RandomSource, _: usize) -> Maybe<ShrinkTree<Self::Item>> {
        Ok(ShrinkTree::pure(self.0.clone()))
    }
}

impl<G, F, U> Generator for Map<G, F>
where
    G: Generator,
    F: Fn(G::Item) -> U + 'static,
    U: Clone + 'static,
{
    type Item = U;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let f = self.f.clone();
        Ok(self.inner.generate(src, size)?.map(move |v| f(v)))
    }
}

impl<G, F, H> Generator for Bind<G, F>
where
    G: Generator,
    F: Fn(G::Item) -> H + 'static,
    H: Generator,
{
    type Item = H::Item;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let (r1, r2) = src.split();
        let tree = self.inner.generate(r1, size)?;
        let f = self.f.clone();
        tree.flat_map(move |v| f(v).generate(r2, size))
    }
}

impl<F, G> Generator for SizedGenerator<F>
where
    F: Fn(usize) -> G,
    G: Generator,
{
    type Item = G::Item;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        (self.0)(size).generate(src, size)
    }
}

impl<G: Generator> Generator for Resize<G> {
    type Item = G::Item;
    fn generate(&self, src: RandomSource, _: usize) -> Maybe<ShrinkTree<Self::Item>> {
        self.inner.generate(src, self.size)
    }
}

impl<G, F> Generator for Scale<G, F>
where
    G: Generator,
    F: Fn(usize) -> usize,
{
    type Item = G::Item;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        self.inner.generate(src, (self.f)(size))
    }
}

impl<T> Clone for BoxedGenerator<T> {
    fn clone(&self) -> Self {
        BoxedGenerator(self.0.clone())
    }
}

impl<T> fmt::Debug for BoxedGenerator<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_tuple("BoxedGenerator").finish()
    }
}

impl<T: Clone + 'static> Generator for BoxedGenerator<T> {
    type Item = T;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        self.0.generate(src, size)
    }

    fn boxed(self) -> BoxedGenerator<T> {
        self
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generators::*;
    use std::cell::Cell;
    use std::fmt;

    pub(crate) fn sources(n: usize) -> Vec<RandomSource> {
        RandomSource::make(0x5eed).split_n(n)
    }

    pub(crate) fn roots<T: Clone + 'static>(tree: &ShrinkTree<T>) -> Vec<T> {
        tree.children()
            .map(|c| c.expect("child").into_value())
            .collect()
    }

    pub(crate) fn should_generate_same_output_given_same_input<G>(gen: G)
    where
        G: Generator,
        G::Item: fmt::Debug + PartialEq,
    {
        for (i, src) in sources(100).into_iter().enumerate() {
            let v0 = gen.generate(src, i % 50).expect("v0");
            let v1 = gen.generate(src, i % 50).expect("v1");
            assert_eq!(v0.value(), v1.value());
            let c0 = v0.iter().take(50).collect::<Vec<_>>();
            let c1 = v1.iter().take(50).collect::<Vec<_>>();
            assert_eq!(c0, c1);
        }
    }

    pub(crate) fn usually_generates_different_output_for_different_inputs<G>(gen: G)
    where
        G: Generator,
        G::Item: PartialEq,
    {
        let values = sources(100)
            .into_iter()
            .map(|src| gen.generate(src, 30).expect("value").into_value())
            .collect::<Vec<_>>();
        let differing = values.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(differing > 0, "Differing items:{} > 0", differing);
    }

    #[test]
    fn pure_should_generate_same_values() {
        for src in sources(10) {
            let t = pure("fourty two").generate(src, 100).expect("pure");
            assert_eq!(t.value(), &"fourty two");
            assert_eq!(t.children().count(), 0);
        }
    }

    #[test]
    fn map_applies_to_root_and_shrinks() {
        let gen = choose(0, 100).map(|v| v * 2);
        for src in sources(20) {
            let plain = choose(0, 100).generate(src, 30).expect("plain");
            let mapped = gen.generate(src, 30).expect("mapped");
            let expected = plain.iter().take(100).map(|v| v.map(|v| v * 2)).collect::<Vec<_>>();
            assert_eq!(mapped.iter().take(100).collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn bind_should_generate_same_output_given_same_input() {
        should_generate_same_output_given_same_input(
            choose(0, 10).bind(|n| choose(0, n).map(move |v| (n, v))),
        )
    }

    #[test]
    fn bind_usually_generates_different_output_for_different_inputs() {
        usually_generates_different_output_for_different_inputs(
            choose(0, 10).bind(|n| choose(0, n).map(move |v| (n, v))),
        )
    }

    #[test]
    fn bind_shrinks_upstream_value_first() {
        let gen = choose(0, 1000).bind(|n| pure(n).map(|v| v * 10).bind(|v| choose(v, v + 5)));
        for src in sources(20) {
            let tree = gen.generate(src, 30).expect("bind");
            let root = *tree.value();
            let upstream = root / 10;
            let kids = roots(&tree);
            let upstream_shrinks = crate::data::Halvings::new(upstream).count();
            // Upstream shrinks come first, each re-evaluated downstream.
            for k in &kids[..upstream_shrinks] {
                assert!(k / 10 < upstream, "{} should come from a smaller upstream", k);
            }
            // Then shrinks of the downstream value at the same upstream.
            for k in &kids[upstream_shrinks..] {
                assert_eq!(k / 10, upstream, "{} should keep upstream {}", k, upstream);
            }
        }
    }

    #[test]
    fn bind_evaluates_continuation_with_independent_source() {
        let outer = pure(()).bind(|_| generator_fn(|src, _| Ok(ShrinkTree::pure(src))));
        let src = RandomSource::make(1);
        let seen = outer.generate(src, 0).expect("bind").into_value();
        assert_eq!(seen, src.split().1);
    }

    #[test]
    fn sized_builds_from_current_size() {
        let gen = sized(|n| pure(n));
        assert_eq!(gen.generate(RandomSource::make(0), 17).expect("sized").into_value(), 17);
    }

    #[test]
    fn resize_overrides_size() {
        let gen = sized(|n| pure(n)).resize(3);
        for size in 0..10 {
            let v = gen.generate(RandomSource::make(0), size).expect("resize");
            assert_eq!(v.into_value(), 3);
        }
    }

    #[test]
    fn scale_transforms_size() {
        let gen = sized(|n| pure(n)).scale(|n| n * 2 + 1);
        let v = gen.generate(RandomSource::make(0), 10).expect("scale");
        assert_eq!(v.into_value(), 21);
    }

    #[test]
    fn boxed_generators_behave_like_the_original() {
        let gen = choose(-5, 5);
        let boxed = choose(-5, 5).boxed();
        for src in sources(50) {
            assert_eq!(
                gen.generate(src, 30).expect("plain").into_value(),
                boxed.generate(src, 30).expect("boxed").into_value()
            );
        }
    }

    #[test]
    fn generation_is_lazy_in_shrinks() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let gen = choose(0, 1000).bind(move |n| {
            counter.set(counter.get() + 1);
            pure(n)
        });
        let tree = gen.generate(RandomSource::make(3), 30).expect("tree");
        assert_eq!(calls.get(), 1);
        let _ = tree.children().next();
        assert!(calls.get() <= 2);
    }
}
