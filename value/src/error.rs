//! The error vocabulary shared by every abstract domain.

/// Result type alias used throughout the crate and its downstream domains.
pub type Result<T> = std::result::Result<T, Error>;

/// The four failure kinds an abstract-domain operation can raise. All
/// operations on a well-formed domain are otherwise total; these are raised
/// only at the boundaries spec.md §7 names (construction of a malformed
/// lattice, asking for the value carried by a bottom/top element, an
/// invariant violation, or a tag/value mismatch).
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum Error {
    /// An operation received a value outside its domain: a malformed finite
    /// lattice specification, or a non-positive element count for a
    /// work-queue or sparse-set universe.
    #[display(fmt = "invalid argument: {}", _0)]
    InvalidArgument(String),

    /// The caller asked for the underlying value of a lifted domain while it
    /// was bottom, or for the min/max element of an empty interval.
    #[display(fmt = "undefined operation: {}", _0)]
    UndefinedOperation(String),

    /// An invariant was violated: broken trie invariants, a counter going
    /// negative, a work-pool joining while tasks are still being submitted.
    /// These are unreachable in correct use of the public API.
    #[display(fmt = "internal error: {}", _0)]
    Internal(String),

    /// A domain received a value whose `kind()` disagrees with its stored
    /// tag.
    #[display(fmt = "invalid abstract value: {}", _0)]
    InvalidValue(String),
}

impl std::error::Error for Error {}

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn undefined_operation(message: impl Into<String>) -> Self {
        Error::UndefinedOperation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Error::InvalidValue(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_messages_are_tagged_by_kind() {
        assert_eq!(
            format!("{}", Error::invalid_argument("bad cap")),
            "invalid argument: bad cap"
        );
        assert_eq!(
            format!("{}", Error::undefined_operation("empty interval min")),
            "undefined operation: empty interval min"
        );
    }
}
