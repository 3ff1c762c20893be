use crate::{BackendError, ContradictionReport};

/// An error synthesizing a puzzle.
///
/// Finding no puzzle is not an error: unsatisfiable requests and timeouts
/// return `Ok(None)`. Running out of uniqueness refinements is, since the
/// search stopped without deciding whether a puzzle exists.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SynthError {
    /// The constraints are contradictory or ill-formed.
    #[display("{_0}")]
    Malformed(#[from] ContradictionReport),
    /// The solver failed.
    #[display("{_0}")]
    Backend(#[from] BackendError),
    /// Every candidate so far admitted another solution, and the configured
    /// number of refinements was used up.
    #[display("no unique candidate after {limit} refinements")]
    RefinementLimit {
        /// The configured limit.
        limit: usize,
    },
}
