//! This module describes how values and their shrinks get generated from
//! the underlying [`conjectures::data`](../data/index.html) types.
//!
//! Everything here is built on the [`Generator`](trait.Generator.html)
//! trait: primitives such as [`choose`](fn.choose.html), and combinators
//! such as [`frequency`](fn.frequency.html) or
//! [`Generator::such_that`](trait.Generator.html#method.such_that) that
//! build new generators from old ones.

mod choice;
mod collections;
mod composition;
mod core;
mod filtering;
mod numbers;
mod tuples;

pub use self::choice::*;
pub use self::collections::*;
pub use self::composition::*;
pub use self::core::*;
pub use self::filtering::*;
pub use self::numbers::*;
pub use self::tuples::*;
