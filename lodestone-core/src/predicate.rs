use crate::error::PredicateError;
use serde::{Deserialize, Serialize};

/// Maximum number of satisfier arguments a predicate will examine
const MAX_SATISFIER_ARGS: usize = 1024;

/// A satisfier argument handed to a spend predicate.
///
/// Spenders supply an ordered list of these values; the predicate attached
/// to the output being spent decides whether the list grants permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
}

impl Value {
    /// Reads the value as an integer, reporting the argument position on
    /// mismatch so evaluation errors stay diagnosable.
    fn as_int(&self, position: usize) -> Result<i64, PredicateError> {
        match self {
            Value::Int(n) => Ok(*n),
            _ => Err(PredicateError::TypeMismatch(position)),
        }
    }
}

/// Spend-authorization predicate attached to a transaction output.
///
/// Each kind has a deterministic serde encoding, so outputs (and therefore
/// transaction identifiers) are reproducible across runs for the same
/// logical transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    /// Grants unconditionally.
    AlwaysAllow,
    /// The first satisfier argument must equal the constant.
    EqualsConstant(Value),
    /// All satisfier arguments must be integers summing to the constant.
    SumEquals(i64),
    /// At least `required` of `members` must appear among the satisfier
    /// arguments (m-of-n).
    Threshold {
        required: usize,
        members: Vec<Value>,
    },
}

impl Predicate {
    /// Evaluates the predicate against a satisfier.
    ///
    /// # Errors
    ///
    /// Returns an error when the satisfier cannot be interpreted by this
    /// predicate kind (missing argument, wrong type, overflow). Callers
    /// treat any error as a spend denial.
    pub fn evaluate(&self, satisfier: &[Value]) -> Result<bool, PredicateError> {
        if satisfier.len() > MAX_SATISFIER_ARGS {
            return Err(PredicateError::TooManyArguments);
        }

        match self {
            Self::AlwaysAllow => Ok(true),
            Self::EqualsConstant(expected) => {
                let first = satisfier
                    .first()
                    .ok_or(PredicateError::MissingArgument(0))?;
                Ok(first == expected)
            }
            Self::SumEquals(expected) => {
                let mut sum = 0i64;
                for (position, value) in satisfier.iter().enumerate() {
                    sum = sum
                        .checked_add(value.as_int(position)?)
                        .ok_or(PredicateError::Overflow)?;
                }
                Ok(sum == *expected)
            }
            Self::Threshold { required, members } => {
                let hits = members
                    .iter()
                    .filter(|member| satisfier.contains(member))
                    .count();
                Ok(hits >= *required)
            }
        }
    }
}
