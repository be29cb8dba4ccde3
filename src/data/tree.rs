use std::fmt;
use std::iter;
use std::rc::Rc;

use super::errors::*;

/// A lazily computed sequence of shrink candidates. A candidate that could
/// not be produced (eg: a retrying generator gave up while re-evaluating)
/// shows up as an `Err` item.
pub type Children<T> = Box<dyn Iterator<Item = Maybe<ShrinkTree<T>>>>;

/// A value, along with an ordered, lazily produced sequence of simpler
/// candidate values (a rose tree). Earlier children are tried first by a
/// shrink search.
///
/// The children are restartable: each call to
/// [`children`](#method.children) produces a fresh iterator, and nothing is
/// computed until it is consumed.
pub struct ShrinkTree<T> {
    value: T,
    children: Rc<dyn Fn() -> Children<T>>,
}

impl<T: Clone> Clone for ShrinkTree<T> {
    fn clone(&self) -> Self {
        ShrinkTree {
            value: self.value.clone(),
            children: self.children.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ShrinkTree<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("ShrinkTree")
            .field("value", &self.value)
            .field("children", &format_args!(".."))
            .finish()
    }
}

impl<T: Clone + 'static> ShrinkTree<T> {
    /// Creates a tree from a value and a function producing its children.
    pub fn new<F>(value: T, children: F) -> Self
    where
        F: Fn() -> Children<T> + 'static,
    {
        ShrinkTree {
            value,
            children: Rc::new(children),
        }
    }

    /// A tree that never shrinks.
    pub fn pure(value: T) -> Self {
        ShrinkTree::new(value, || Box::new(iter::empty()))
    }

    /// Creates a tree with an already materialized list of children.
    pub fn with_children(value: T, children: Vec<ShrinkTree<T>>) -> Self {
        ShrinkTree::new(value, move || {
            Box::new(children.clone().into_iter().map(Ok::<_, GenError>))
        })
    }

    /// The value at the root of this tree.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Discards the shrinks, returning the root value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Starts a fresh traversal of the immediate shrink candidates.
    pub fn children(&self) -> Children<T> {
        (self.children)()
    }

    /// Applies `f` to every node of the tree, preserving its shape.
    pub fn map<U, F>(self, f: F) -> ShrinkTree<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + 'static,
    {
        self.map_with(Rc::new(f))
    }

    fn map_with<U: Clone + 'static>(self, f: Rc<dyn Fn(T) -> U>) -> ShrinkTree<U> {
        let value = f(self.value);
        let children = self.children;
        ShrinkTree::new(value, move || {
            let f = f.clone();
            Box::new(children().map(move |c| c.map(|c| c.map_with(f.clone()))))
        })
    }

    /// Removes every descendant failing `pred`, along with its subtree. The
    /// root is kept as-is.
    pub fn filter<P>(self, pred: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.filter_with(Rc::new(pred))
    }

    fn filter_with(self, pred: Rc<dyn Fn(&T) -> bool>) -> Self {
        let children = self.children;
        ShrinkTree::new(self.value, move || {
            let pred = pred.clone();
            Box::new(children().filter_map(move |c| match c {
                Ok(c) => {
                    if pred(&c.value) {
                        Some(Ok(c.filter_with(pred.clone())))
                    } else {
                        None
                    }
                }
                Err(e) => Some(Err(e)),
            }))
        })
    }

    /// Monadic bind over trees: equivalent to `self.map(f).join()`, except
    /// that `f` may fail.
    ///
    /// The children of the result are first the shrinks of `self`, each
    /// re-run through `f`, followed by the children of `f(root)`.
    pub fn flat_map<U, F>(self, f: F) -> Maybe<ShrinkTree<U>>
    where
        U: Clone + 'static,
        F: Fn(T) -> Maybe<ShrinkTree<U>> + 'static,
    {
        self.flat_map_with(Rc::new(f))
    }

    fn flat_map_with<U: Clone + 'static>(
        self,
        f: Rc<dyn Fn(T) -> Maybe<ShrinkTree<U>>>,
    ) -> Maybe<ShrinkTree<U>> {
        let inner = f(self.value)?;
        let outer_children = self.children;
        let inner_children = inner.children;
        Ok(ShrinkTree::new(inner.value, move || {
            let f = f.clone();
            Box::new(
                outer_children()
                    .map(move |c| c.and_then(|c| c.flat_map_with(f.clone())))
                    .chain(inner_children()),
            )
        }))
    }

    /// Pairs two trees. Shrinks the left component first, then the right,
    /// one at a time.
    pub fn zip<U: Clone + 'static>(self, other: ShrinkTree<U>) -> ShrinkTree<(T, U)> {
        let value = (self.value.clone(), other.value.clone());
        ShrinkTree::new(value, move || {
            let (left, right) = (self.clone(), other.clone());
            let lefts = {
                let right = right.clone();
                left.children()
                    .map(move |c| c.map(|c| c.zip(right.clone())))
            };
            let rights = right
                .children()
                .map(move |c| c.map(|c| left.clone().zip(c)));
            Box::new(lefts.chain(rights))
        })
    }

    /// Lazily walks every node, root first, depth first.
    pub fn iter(&self) -> TreeIter<T> {
        TreeIter {
            root: Some(self.clone()),
            stack: Vec::new(),
        }
    }
}

impl<T: Clone + 'static> ShrinkTree<ShrinkTree<T>> {
    /// Flattens a tree of trees. The root is the inner root; the children
    /// are the joined outer children followed by the inner children.
    pub fn join(self) -> ShrinkTree<T> {
        let outer_children = self.children;
        let inner = self.value;
        let inner_children = inner.children;
        ShrinkTree::new(inner.value, move || {
            Box::new(
                outer_children()
                    .map(|c| c.map(ShrinkTree::join))
                    .chain(inner_children()),
            )
        })
    }
}

/// See [`ShrinkTree::iter`](struct.ShrinkTree.html#method.iter)
pub struct TreeIter<T> {
    root: Option<ShrinkTree<T>>,
    stack: Vec<Children<T>>,
}

impl<T: Clone + 'static> Iterator for TreeIter<T> {
    type Item = Maybe<T>;
    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.stack.push(root.children());
            return Some(Ok(root.value));
        }
        loop {
            let next = self.stack.last_mut()?.next();
            match next {
                None => {
                    self.stack.pop();
                }
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(node)) => {
                    self.stack.push(node.children());
                    return Some(Ok(node.value));
                }
            }
        }
    }
}
