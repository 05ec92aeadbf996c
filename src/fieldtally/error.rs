/*!
# Counting Engine Error Handling

This module provides error handling for the field-value counting engine.
All counting operations return well-structured errors with context
information to help with debugging and operator feedback.

## Error Categories

- **Configuration Errors**: invalid mapping sets rejected at handler
  construction
- **Path Errors**: malformed field-path expressions
- **Decoding Errors**: raw payloads that could not be parsed into a
  structured record
- **Value Errors**: null elements inside collection-typed leaves during
  dispatch
- **Repository Errors**: definition persistence failures
- **Aggregated Errors**: per-mapping failures collected across one handling
  pass

## Propagation Policy

Extraction-time absence (missing field, null intermediate) is *not* an
error — it is a silent, zero-result traversal. Only malformed configuration,
malformed path syntax, undecodable payloads, and genuinely invalid leaf
values surface as errors.
*/

use std::fmt;

/// Error types for field-value counting and definition persistence.
///
/// Each variant carries the context relevant to its failure mode. Mapping
/// failures during a handling pass are isolated per mapping and surfaced
/// together as [`TallyError::Aggregated`] once every mapping has been
/// attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum TallyError {
    /// Invalid mapping set supplied at handler construction.
    ///
    /// Fatal to construction: an empty mapping set or an empty counter name
    /// can never produce a working handler.
    Configuration {
        /// Description of the configuration problem
        message: String,
    },

    /// Malformed field-path expression.
    ///
    /// Raised when a path expression is empty or contains an empty segment
    /// after splitting on `.`. Paths are resolved eagerly, so this is also
    /// fatal to handler construction.
    InvalidPath {
        /// The offending path expression
        expression: String,
        /// Description of what is wrong with it
        message: String,
    },

    /// Raw payload could not be decoded into a structured record.
    ///
    /// Surfaced to the caller for that single record; no mapping is
    /// attempted and the record is not forwarded.
    Decoding {
        /// Description of the decoding failure
        message: String,
    },

    /// A null element was found inside a collection-typed leaf at dispatch.
    ///
    /// Isolated to the offending mapping; sibling mappings for the same
    /// record still proceed.
    InvalidValue {
        /// Name of the counter whose dispatch failed
        counter_name: String,
        /// Description of the invalid leaf
        message: String,
    },

    /// Definition persistence failure.
    ///
    /// Covers serialization delimiter violations, malformed stored values,
    /// and key-value backend errors.
    Repository {
        /// Description of the persistence failure
        message: String,
    },

    /// One or more mapping failures from a single handling pass.
    ///
    /// Produced after all mappings were attempted, so increments issued by
    /// healthy mappings are never suppressed by a poisoned sibling.
    Aggregated {
        /// The individual per-mapping failures, in mapping order
        failures: Vec<TallyError>,
    },
}

impl fmt::Display for TallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TallyError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
            TallyError::InvalidPath {
                expression,
                message,
            } => {
                write!(f, "Invalid field path '{}': {}", expression, message)
            }
            TallyError::Decoding { message } => {
                write!(f, "Decoding error: {}", message)
            }
            TallyError::InvalidValue {
                counter_name,
                message,
            } => {
                write!(f, "Invalid value for counter '{}': {}", counter_name, message)
            }
            TallyError::Repository { message } => {
                write!(f, "Repository error: {}", message)
            }
            TallyError::Aggregated { failures } => {
                write!(f, "{} mapping(s) failed: ", failures.len())?;
                for (i, failure) in failures.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for TallyError {}

impl TallyError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        TallyError::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid-path error
    pub fn invalid_path(expression: impl Into<String>, message: impl Into<String>) -> Self {
        TallyError::InvalidPath {
            expression: expression.into(),
            message: message.into(),
        }
    }

    /// Create a decoding error
    pub fn decoding(message: impl Into<String>) -> Self {
        TallyError::Decoding {
            message: message.into(),
        }
    }

    /// Create an invalid-value error
    pub fn invalid_value(counter_name: impl Into<String>, message: impl Into<String>) -> Self {
        TallyError::InvalidValue {
            counter_name: counter_name.into(),
            message: message.into(),
        }
    }

    /// Create a repository error
    pub fn repository(message: impl Into<String>) -> Self {
        TallyError::Repository {
            message: message.into(),
        }
    }

    /// Create an aggregated error from per-mapping failures
    pub fn aggregated(failures: Vec<TallyError>) -> Self {
        TallyError::Aggregated { failures }
    }
}

/// Result type for counting operations
pub type TallyResult<T> = Result<T, TallyError>;
