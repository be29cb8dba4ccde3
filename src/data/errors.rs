use std::fmt;
use thiserror::Error;

/// The result of evaluating a generator.
pub type Maybe<T> = Result<T, GenError>;

/// The reasons why evaluating a generator can fail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenError {
    /// A retrying combinator ran out of attempts.
    #[error("{0}")]
    Exhausted(Exhaustion),
    /// Raised by a caller-supplied `on_exhausted` hook.
    #[error("{0}")]
    Custom(String),
}

/// Context describing a retry ceiling that was hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exhaustion {
    /// Which combinator gave up, eg: `"such_that"`.
    pub combinator: &'static str,
    /// Type name of the generator that was being drawn from.
    pub generator: &'static str,
    /// The retry ceiling that was reached.
    pub max_tries: usize,
    /// The number of elements we were asked for, if any.
    pub num_elements: Option<usize>,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{} gave up after {} tries drawing from {}",
            self.combinator, self.max_tries, self.generator
        )?;
        if let Some(n) = self.num_elements {
            write!(fmt, " (wanted {} elements)", n)?;
        }
        Ok(())
    }
}

impl From<Exhaustion> for GenError {
    fn from(ex: Exhaustion) -> Self {
        GenError::Exhausted(ex)
    }
}
