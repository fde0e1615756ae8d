//! # Generator Errors
//!
//! Generation failures are fatal and structural. They are never collected
//! alongside conformance violations and never retried.

use thiserror::Error;

/// Error raised while compiling or drawing from a generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// A predicate leaf is not one of the recognised shape predicates.
    #[error("Unable to create a generator for: {source_text}")]
    Unresolvable {
        /// Literal source text of the offending predicate.
        source_text: String,
    },

    /// A refinement rejected every candidate within the retry ceiling.
    #[error("refinement {source_text} rejected {attempts} consecutive candidates; the filter is too narrow for its base generator")]
    FilterExhausted {
        /// Rendering of the refinement spec.
        source_text: String,
        /// Number of candidates drawn before giving up.
        attempts: u32,
    },
}
