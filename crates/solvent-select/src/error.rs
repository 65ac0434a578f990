use solvent_select_core::CoreError;
use solvent_select_ghs::StatementError;
use solvent_select_table::TableError;
use thiserror::Error;

pub const SOLUTE_UNDEFINED_GUIDANCE: &str = "First, you must define the solute coordinates.";

#[derive(Debug, Error)]
pub enum SelectError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Statements(#[from] StatementError),

    #[error("unknown solvent: {0}")]
    UnknownSolvent(String),
}

impl SelectError {
    /// Text to show the user when the failure is theirs to correct.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::Core(CoreError::SoluteUndefined) => Some(SOLUTE_UNDEFINED_GUIDANCE),
            _ => None,
        }
    }
}
