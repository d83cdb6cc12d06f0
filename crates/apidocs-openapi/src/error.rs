//! Error types for spec construction.
//!
//! Every failure here reflects a programming or configuration defect that
//! should be fixed before deploy: spec documents are built synchronously at
//! application startup, so nothing in this crate retries or degrades.

use thiserror::Error;

/// Result type for spec-construction operations.
pub type Result<T> = std::result::Result<T, SpecError>;

/// Errors raised while deriving schemas or building operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A type that cannot be classified into a schema fragment.
    ///
    /// Raised at spec-build time and never silently swallowed; the whole
    /// registration aborts.
    #[error("unsupported type `{type_name}` cannot be rendered as a schema")]
    UnsupportedType {
        /// Identity of the offending type.
        type_name: String,
    },

    /// A generic parameter survived to resolution without a binding.
    ///
    /// This signals a bug in descriptor construction (an uninstantiated
    /// template reached the extractor), not a user error.
    #[error("unresolved generic parameter `{param}` while extracting `{model}`")]
    UnresolvedTypeParameter {
        /// Name of the unbound parameter.
        param: String,
        /// Model whose extraction hit the unbound parameter.
        model: String,
    },

    /// A generic template was instantiated with the wrong number of arguments.
    #[error("`{model}` expects {expected} generic argument(s), got {got}")]
    GenericArityMismatch {
        /// The template's simple name.
        model: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// A body parameter was declared on a method that structurally forbids
    /// bodies (GET, DELETE). Raised at route-registration time.
    #[error("method {method} does not support a body parameter")]
    BodyNotAllowed {
        /// The offending HTTP method.
        method: &'static str,
    },

    /// More than one body parameter resolved for a single operation.
    #[error("operation `{method} {path}` resolved more than one body parameter")]
    MultipleBodyParameters {
        /// HTTP method of the operation.
        method: &'static str,
        /// Path template of the operation.
        path: String,
    },

    /// A custom content type with no automatic schema mapping (only
    /// `image/*` and `text/*` are mapped).
    #[error("content type `{content_type}` has no automatic schema mapping")]
    UnsupportedContentType {
        /// The unmapped content type.
        content_type: String,
    },
}
