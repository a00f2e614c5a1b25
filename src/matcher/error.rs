use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// A node with children or groups met a scalar where it needed a container.
    #[error("structural mismatch at {path}: {spec} expects a container, found {found}")]
    StructuralMismatch {
        spec: String,
        path: String,
        found: &'static str,
    },
}
