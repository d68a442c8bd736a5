//! Error types for the Futchain harness.
//!
//! Only two kinds of failure matter while a run is in progress: the endpoint
//! being unreachable (fatal) and an individual call failing (non-fatal).
//! The remaining variants can only occur while the harness is being built.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while probing the precompile.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HarnessError {
    /// The RPC endpoint is unreachable or refused to report chain identity.
    #[error("Connectivity error: {reason}")]
    Connectivity {
        /// Transport or node error message
        reason: String,
    },

    /// A single contract call failed.
    #[error("{operation}({}) failed: {reason}", format_argument(.argument))]
    Lookup {
        /// Name of the precompile function or RPC method that was called
        operation: String,
        /// The id passed to the call, if it takes one
        argument: Option<u64>,
        /// Transport, revert or decoding reason
        reason: String,
    },

    /// The RPC URL could not be parsed.
    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidRpcUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The precompile address could not be parsed.
    #[error("Invalid precompile address: '{address}'")]
    InvalidAddress {
        /// The rejected address string
        address: String,
    },

    /// The interface description is unreadable or incomplete.
    #[error("Interface description error: {reason}")]
    Abi {
        /// What is wrong with the description
        reason: String,
    },
}

impl HarnessError {
    /// Build a lookup error for `operation(argument)`.
    pub fn lookup(
        operation: impl Into<String>,
        argument: Option<u64>,
        reason: impl ToString,
    ) -> Self {
        HarnessError::Lookup {
            operation: operation.into(),
            argument,
            reason: reason.to_string(),
        }
    }

    /// Build a connectivity error.
    pub fn connectivity(reason: impl ToString) -> Self {
        HarnessError::Connectivity {
            reason: reason.to_string(),
        }
    }

    /// Build an interface description error.
    pub fn abi(reason: impl ToString) -> Self {
        HarnessError::Abi {
            reason: reason.to_string(),
        }
    }

    /// Whether this error must abort the run.
    ///
    /// Lookup failures are isolated to the call that produced them; every
    /// other kind leaves nothing to run against.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, HarnessError::Lookup { .. })
    }
}

fn format_argument(argument: &Option<u64>) -> String {
    argument.map(|a| a.to_string()).unwrap_or_default()
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
