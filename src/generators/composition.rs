use super::core::*;
use crate::data::*;

/// See [`generator_fn`](fn.generator_fn.html)
pub struct GeneratorFn<F>(F);

/// See [`lazy`](fn.lazy.html)
pub struct Lazy<F>(F);

/// Makes it slightly easier to implement generators, by allowing the user
/// to specify a function, rather than needing to build it from either
/// combinators, or create a new Generator instance.
pub fn generator_fn<T, F>(f: F) -> GeneratorFn<F>
where
    T: Clone + 'static,
    F: Fn(RandomSource, usize) -> Maybe<ShrinkTree<T>>,
{
    GeneratorFn(f)
}

/// Defers building a generator until it is evaluated. Mostly useful for
/// recursive generators, which would otherwise never finish being built.
pub fn lazy<F, G>(f: F) -> Lazy<F>
where
    F: Fn() -> G,
    G: Generator,
{
    Lazy(f)
}

impl<T, F> Generator for GeneratorFn<F>
where
    T: Clone + 'static,
    F: Fn(RandomSource, usize) -> Maybe<ShrinkTree<T>>,
{
    type Item = T;

    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        (self.0)(src, size)
    }
}

impl<F, G> Generator for Lazy<F>
where
    F: Fn() -> G,
    G: Generator,
{
    type Item = G::Item;

    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        (self.0)().generate(src, size)
    }
}
