use std::any::type_name;
use std::fmt;
use std::rc::Rc;

use super::core::*;
use crate::data::*;

const DEFAULT_MAX_TRIES: usize = 10;

/// Turns the context of a retry ceiling being hit into the error reported
/// to the caller.
pub type ExhaustionHook = Rc<dyn Fn(&Exhaustion) -> GenError>;

/// Configuration for [`such_that`](trait.Generator.html#method.such_that_with).
#[derive(Clone)]
pub struct SuchThatOptions {
    max_tries: usize,
    on_exhausted: Option<ExhaustionHook>,
}

impl Default for SuchThatOptions {
    fn default() -> Self {
        SuchThatOptions {
            max_tries: DEFAULT_MAX_TRIES,
            on_exhausted: None,
        }
    }
}

impl fmt::Debug for SuchThatOptions {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("SuchThatOptions")
            .field("max_tries", &self.max_tries)
            .field("on_exhausted", &self.on_exhausted.is_some())
            .finish()
    }
}

impl SuchThatOptions {
    /// Overrides how many draws are attempted before giving up.
    pub fn max_tries(&self, max_tries: usize) -> Self {
        SuchThatOptions {
            max_tries,
            ..self.clone()
        }
    }

    /// Overrides the error raised once we give up.
    pub fn on_exhausted<F>(&self, hook: F) -> Self
    where
        F: Fn(&Exhaustion) -> GenError + 'static,
    {
        SuchThatOptions {
            on_exhausted: Some(Rc::new(hook)),
            ..self.clone()
        }
    }
}

pub(crate) fn exhausted(hook: &Option<ExhaustionHook>, ex: Exhaustion) -> GenError {
    debug!("Exhausted: {}", ex);
    match hook {
        Some(hook) => hook(&ex),
        None => ex.into(),
    }
}

/// See [`Generator::such_that`](trait.Generator.html#method.such_that)
///
/// Each failing draw retries with a freshly split source and the size
/// increased by one. The first value satisfying the predicate is returned,
/// with every shrink that fails the predicate pruned from its tree. After
/// `max_tries` failing draws, generation fails with
/// [`GenError::Exhausted`](../data/enum.GenError.html).
pub struct SuchThat<G, P> {
    inner: G,
    pred: Rc<P>,
    options: SuchThatOptions,
}

impl<G, P> SuchThat<G, P> {
    pub(crate) fn new(inner: G, pred: P, options: SuchThatOptions) -> Self {
        SuchThat {
            inner,
            pred: Rc::new(pred),
            options,
        }
    }
}

impl<G, P> Generator for SuchThat<G, P>
where
    G: Generator,
    P: Fn(&G::Item) -> bool + 'static,
{
    type Item = G::Item;
    fn generate(&self, src: RandomSource, size: usize) -> Maybe<ShrinkTree<Self::Item>> {
        let mut src = src;
        let mut size = size;
        for attempt in 0..self.options.max_tries {
            let (r1, r2) = src.split();
            let tree = self.inner.generate(r1, size)?;
            if (self.pred)(tree.value()) {
                trace!("such_that satisfied on attempt {}", attempt + 1);
                let pred = self.pred.clone();
                return Ok(tree.filter(move |v| pred(v)));
            }
            trace!("such_that rejected attempt {} at size {}", attempt + 1, size);
            src = r2;
            size = size.saturating_add(1);
        }
        Err(exhausted(
            &self.options.on_exhausted,
            Exhaustion {
                combinator: "such_that",
                generator: type_name::<G>(),
                max_tries: self.options.max_tries,
                num_elements: None,
            },
        ))
    }
}
