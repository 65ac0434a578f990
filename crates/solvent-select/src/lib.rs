pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod spec;

pub use config::*;
pub use engine::*;
pub use error::SelectError;
pub use report::*;
pub use spec::*;

pub use solvent_select_core::*;
pub use solvent_select_ghs::{StatementError, StatementLine, StatementTable};
pub use solvent_select_table::{
    rank_solvents, SolventTable, SortDirection, SortKey, SortOrder, TableError,
};
