use super::*;
use diesel::result::DatabaseErrorKind;
use std::fmt;

/// Domain rule a node operation was rejected by.
///
/// The `Display` output is the stable code of the rule (e.g. `DUPLICATE_NAME`),
/// so callers can render or match on it without inspecting the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    NameNotGiven,
    TypeNotGiven,
    DuplicateName,
    ParentNotFound,
    ParentNotFolder,
    ParentIdNotGiven,
    IdNotGiven,
    NewNameNotGiven,
    NewParentNotFound,
    NewParentNotFolder,
    CannotMoveIntoDescendant,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameNotGiven => "NAME_NOT_GIVEN",
            Self::TypeNotGiven => "TYPE_NOT_GIVEN",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::ParentNotFound => "PARENT_NOT_FOUND",
            Self::ParentNotFolder => "PARENT_NOT_FOLDER",
            Self::ParentIdNotGiven => "PARENT_ID_NOT_GIVEN",
            Self::IdNotGiven => "ID_NOT_GIVEN",
            Self::NewNameNotGiven => "NEW_NAME_NOT_GIVEN",
            Self::NewParentNotFound => "NEW_PARENT_NOT_FOUND",
            Self::NewParentNotFolder => "NEW_PARENT_NOT_FOLDER",
            Self::CannotMoveIntoDescendant => "CANNOT_MOVE_INTO_DESCENDANT",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NodeStoreError {
    #[error("{kind}")]
    Invalid { kind: ValidationError },
    #[error("Error During Database Migration ({source})")]
    DBMigrationError {
        #[from]
        source: db_migration::MigrationError,
    },
    #[error("Error Connecting To Node Database ({source})")]
    DBConnectionError {
        #[from]
        source: diesel::result::ConnectionError,
    },
    #[error("Error During Node Database Interaction ({source})")]
    GenericSQLError { source: diesel::result::Error },
    #[error("Node Not Found")]
    NotFound,
    #[error("Node Database Is Inconsistent ({message})")]
    ViolatesDBConsistency { message: &'static str },
}
pub type Result<T> = std::result::Result<T, NodeStoreError>;

impl NodeStoreError {
    /// The domain rule that rejected the operation, None for infrastructure failures.
    pub fn validation_kind(&self) -> Option<ValidationError> {
        match self {
            Self::Invalid { kind } => Some(*kind),
            _ => None,
        }
    }
}

impl From<ValidationError> for NodeStoreError {
    fn from(kind: ValidationError) -> Self {
        Self::Invalid { kind }
    }
}

// Unique indexes are the authoritative guard against name collisions, so their
// violations are reported as the domain error rather than a raw SQL failure.
impl From<diesel::result::Error> for NodeStoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => Self::NotFound,
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::Invalid {
                    kind: ValidationError::DuplicateName,
                }
            }
            error => Self::GenericSQLError { source: error },
        }
    }
}
