//! The two kinds of failure which can affect an individual country or result cell.
use std::error::Error;
use std::fmt;

/// Indicates that input data or a cost calculation could not be used.
///
/// Both kinds are fatal for the affected row or cell. Whether they abort the whole run is decided
/// by the caller (see the `lenient` option).
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A row of input data is missing a required field or a field could not be parsed
    MalformedInput {
        /// Where the offending data came from (e.g. file path and line)
        location: String,
        /// Description of the problem
        message: String,
    },
    /// A parameter lies outside its physically valid range
    DomainViolation {
        /// The name of the offending parameter
        parameter: &'static str,
        /// The value which was supplied
        value: f64,
        /// Description of the valid range
        constraint: &'static str,
    },
}

impl ModelError {
    /// Create a [`ModelError::DomainViolation`]
    pub fn domain(parameter: &'static str, value: f64, constraint: &'static str) -> Self {
        Self::DomainViolation {
            parameter,
            value,
            constraint,
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedInput { location, message } => {
                write!(f, "Malformed input at {location}: {message}")
            }
            Self::DomainViolation {
                parameter,
                value,
                constraint,
            } => write!(f, "Invalid value for {parameter} ({value}): {constraint}"),
        }
    }
}

impl Error for ModelError {}

/// Check that a condition on a parameter holds, otherwise return a [`ModelError::DomainViolation`]
macro_rules! ensure_domain {
    ($cond:expr, $parameter:expr, $value:expr, $constraint:expr) => {
        if !$cond {
            return Err($crate::error::ModelError::domain(
                $parameter,
                $value,
                $constraint,
            ));
        }
    };
}
pub(crate) use ensure_domain;
