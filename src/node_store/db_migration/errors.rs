use super::DBVersion;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Could Not Read/Write DB Version ({source})")]
    ReadWriteDBVersion { source: diesel::result::Error },
    #[error("Unknown DB Version {version}")]
    UnknownDBVersion { version: DBVersion },
    #[error("Error During Database Migration ({source})")]
    SQLError {
        #[from]
        source: diesel::result::Error,
    },
}
pub type Result<T> = std::result::Result<T, MigrationError>;
