use thiserror::Error;

/// Failures reported to whoever issued a command. None of them leave a trace in the registry,
/// the history or the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabError {
    #[error("set name cannot be empty")]
    EmptyName,
    #[error("a set named \"{name}\" already exists")]
    DuplicateName { name: String },
    #[error("no set named \"{name}\"")]
    NotFound { name: String },
    #[error("unknown universal set \"{name}\"")]
    UnknownTemplate { name: String },
    #[error("the {what} of set \"{name}\" cannot be empty")]
    EmptyDefinition { name: String, what: &'static str },
}

pub type LabResult<T> = Result<T, LabError>;

/// Recovered locally: logged, then replaced by the empty set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ParseDegradation {
    #[error("number \"{fragment}\" does not fit in a double")]
    NonFinite { fragment: String },
    #[error("cannot interpret set-builder expression: {reason}")]
    Predicate { reason: String },
    #[error("cannot interpret description: {reason}")]
    Description { reason: &'static str },
}
