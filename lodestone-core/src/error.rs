use thiserror::Error;

/// Errors raised while evaluating a spend predicate.
///
/// Predicates are untrusted input: every evaluation error is folded into a
/// spend denial by [`crate::transaction::Output::can_spend`] and never
/// crosses the engine boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredicateError {
    #[error("satisfier argument {0} is missing")]
    MissingArgument(usize),

    #[error("satisfier argument {0} has the wrong type")]
    TypeMismatch(usize),

    #[error("arithmetic overflow while evaluating predicate")]
    Overflow,

    #[error("satisfier has too many arguments")]
    TooManyArguments,
}
