use std::fmt::{self, Debug, Display};
use std::io;

use crate::people::PersonId;

/// Provides `HerdError` and maps other errors to
/// convert to a `HerdError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum HerdError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    /// A model input is outside of its valid domain. Reported before any simulation work
    /// begins.
    InvalidConfiguration(String),
    /// Partner sampling produced a pairing that can never be valid. This is a logic fault in
    /// the engine, not a recoverable condition.
    InvariantViolation {
        step: usize,
        actor: PersonId,
        partner: PersonId,
        reason: &'static str,
    },
}

impl From<io::Error> for HerdError {
    fn from(error: io::Error) -> Self {
        HerdError::IoError(error)
    }
}

impl From<serde_json::Error> for HerdError {
    fn from(error: serde_json::Error) -> Self {
        HerdError::JsonError(error)
    }
}

impl From<csv::Error> for HerdError {
    fn from(error: csv::Error) -> Self {
        HerdError::CsvError(error)
    }
}

impl From<String> for HerdError {
    fn from(error: String) -> Self {
        HerdError::InvalidConfiguration(error)
    }
}

impl From<&str> for HerdError {
    fn from(error: &str) -> Self {
        HerdError::InvalidConfiguration(error.to_string())
    }
}

impl std::error::Error for HerdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HerdError::IoError(error) => Some(error),
            HerdError::JsonError(error) => Some(error),
            HerdError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for HerdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HerdError::IoError(error) => write!(f, "I/O error: {error}"),
            HerdError::JsonError(error) => write!(f, "invalid parameter file: {error}"),
            HerdError::CsvError(error) => write!(f, "CSV report error: {error}"),
            HerdError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {message}")
            }
            HerdError::InvariantViolation {
                step,
                actor,
                partner,
                reason,
            } => write!(
                f,
                "invariant violated at step {step}: {actor:?} interacted with {partner:?} ({reason})"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_converts_to_invalid_configuration() {
        let error: HerdError = "population size must be positive".into();
        assert!(matches!(error, HerdError::InvalidConfiguration(_)));
        assert_eq!(
            error.to_string(),
            "invalid configuration: population size must be positive"
        );
    }

    #[test]
    fn invariant_violation_carries_context() {
        let error = HerdError::InvariantViolation {
            step: 3,
            actor: PersonId::new(4),
            partner: PersonId::new(4),
            reason: "partner is the actor",
        };
        assert_eq!(
            error.to_string(),
            "invariant violated at step 3: Person 4 interacted with Person 4 (partner is the actor)"
        );
    }

    #[test]
    fn io_error_is_the_source() {
        let error: HerdError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&error).is_some());
    }
}
