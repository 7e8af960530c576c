use crate::node_store::{NodeStoreError, ValidationError};

/// Failure of a namespace operation.
///
/// Everything but `Infrastructure` is a rejection of the request itself
/// (unknown names, rule violations) that the user can act on.
#[derive(Debug, thiserror::Error)]
pub enum NamespaceError {
    #[error("{kind}")]
    Invalid { kind: ValidationError },
    #[error("NODE_NOT_FOUND: no node named '{name}'")]
    NodeNotFound { name: String },
    #[error("NAME_UNCHANGED: '{name}' already has this name")]
    NameUnchanged { name: String },
    #[error("Error During Node Store Interaction ({source})")]
    Infrastructure { source: NodeStoreError },
}
pub type Result<T> = std::result::Result<T, NamespaceError>;

impl NamespaceError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid { kind } => kind.code(),
            Self::NodeNotFound { .. } => "NODE_NOT_FOUND",
            Self::NameUnchanged { .. } => "NAME_UNCHANGED",
            Self::Infrastructure { .. } => "INFRASTRUCTURE",
        }
    }

    pub fn is_rejection(&self) -> bool {
        !self.is_infrastructure()
    }

    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Infrastructure { .. })
    }
}

impl From<ValidationError> for NamespaceError {
    fn from(kind: ValidationError) -> Self {
        Self::Invalid { kind }
    }
}
impl From<NodeStoreError> for NamespaceError {
    fn from(error: NodeStoreError) -> Self {
        match error.validation_kind() {
            Some(kind) => Self::Invalid { kind },
            None => Self::Infrastructure { source: error },
        }
    }
}
impl From<diesel::result::Error> for NamespaceError {
    fn from(error: diesel::result::Error) -> Self {
        NodeStoreError::from(error).into()
    }
}
