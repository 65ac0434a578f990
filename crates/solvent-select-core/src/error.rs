use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid score groups: {0}")]
    InvalidGroups(String),

    #[error("metric {metric} is not part of group {group}")]
    UnknownMetric { group: String, metric: String },

    #[error("unknown score group: {0}")]
    UnknownGroup(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("solute coordinates not defined")]
    SoluteUndefined,
}
