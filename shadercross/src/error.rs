//! Error types for shadercross operations

use thiserror::Error;

/// Error type for shadercross operations
#[derive(Error, Debug)]
pub enum Error {
    /// Target or stage combination is not supported; detected before any work
    #[error("{0} not supported")]
    Unsupported(String),

    /// Front-end compilation or linking failed
    #[error("Front-end failed: {messages}")]
    Frontend {
        /// Concatenated diagnostics from failing units, then the linker
        messages: String,
    },

    /// One backend could not represent an IR construct; scoped to its stage
    #[error("Error compiling to {target}: {message}")]
    Translation {
        /// Human-readable target description
        target: String,
        /// What the backend could not represent
        message: String,
    },

    /// Binary IR did not decode cleanly
    #[error("Malformed module: {reason}")]
    MalformedModule {
        /// What failed to decode
        reason: String,
    },

    /// Generated text exceeded the bounded output capacity
    #[error("Generated output exceeded {limit} bytes")]
    OutputOverflow {
        /// The capacity that was exceeded
        limit: usize,
    },

    /// Reflection document generation failed
    #[error("Reflection failed: {message}")]
    Reflection {
        /// What the reflector could not resolve
        message: String,
    },

    /// IO error during include resolution
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for shadercross operations
pub type Result<T> = std::result::Result<T, Error>;
