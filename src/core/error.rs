use thiserror::Error;

/// Errors raised by the exchange model.
///
/// Clamping of withdrawals and unstaging is a normal outcome and never
/// produces one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExchangeError {
    /// Backing storage for a collection could not be obtained.
    #[error("unable to allocate {what} ({requested} elements)")]
    Allocation {
        what: &'static str,
        requested: usize,
    },
    /// A currency id was outside `[0, bound - 1]`.
    #[error("currency id {id} out of range (exchange has {bound} currencies)")]
    Index { id: usize, bound: usize },
    /// A value violated one of the model's invariants.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl ExchangeError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        ExchangeError::InvariantViolation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Allocates `len` copies of `fill`, surfacing allocator failure as an error.
pub(crate) fn allocate<T: Clone>(len: usize, fill: T, what: &'static str) -> Result<Vec<T>> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(len)
        .map_err(|_| ExchangeError::Allocation {
            what,
            requested: len,
        })?;
    items.resize(len, fill);
    Ok(items)
}
