//! Fatal errors.
//!
//! Unlike diagnostics, these abort the run and return no output text.

/// Unrecoverable configuration errors for one translation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FatalError {
    /// Two distinct qualified paths flattened to the same target identifier.
    /// Silent renaming could change which entity a reference denotes, so the
    /// run aborts instead.
    FlatNameCollision {
        flat_name: String,
        first_path: String,
        second_path: String,
    },
    /// The external parser produced no tree at all.
    EmptyInput,
}

impl std::fmt::Display for FatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FatalError::FlatNameCollision {
                flat_name,
                first_path,
                second_path,
            } => write!(
                f,
                "flattened name `{flat_name}` is produced by both `{first_path}` and `{second_path}`"
            ),
            FatalError::EmptyInput => write!(f, "no input tree was supplied"),
        }
    }
}

impl std::error::Error for FatalError {}
