//! This module contains the underlying randomness and shrinking data. The
//! main types are the `RandomSource`, an immutable splittable source of
//! randomness, and the `ShrinkTree`, a value along with a lazily computed
//! tree of simpler values to try when a test fails.
//!
//! Also provides the candidate iterators used to build shrink trees (see
//! [`int_tree`](fn.int_tree.html) and
//! [`collection_tree`](fn.collection_tree.html)).

mod errors;
mod shrinkers;
mod source;
mod tree;
pub use self::errors::*;
pub use self::shrinkers::*;
pub use self::source::*;
pub use self::tree::*;
