/// Module performing database migrations to newer application/database format versions.
/// Used on an existing DB connection to upgrade it to the most recent version.
///
/// upgrade_db(&connection); // upgrades to latest DB version
mod errors;
pub use self::errors::*;
mod version_001;
mod version_002;

use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Integer;
use diesel::sqlite::SqliteConnection;
use tracing::info;

pub type DBVersion = i32;
pub const REQUIRED_DB_VERSION: DBVersion = 2;

#[derive(QueryableByName)]
struct UserVersion {
    #[sql_type = "Integer"]
    user_version: DBVersion,
}

/// Upgrades the given database connection to the REQUIRED_DB_VERSION of the
/// current application build.
///
/// MUST be run before any other action on the database to make sure it's compatible.
pub fn upgrade_db(conn: &SqliteConnection) -> Result<DBVersion> {
    loop {
        let current_version = read_db_version(&conn)?;
        if current_version < REQUIRED_DB_VERSION {
            migrate_up_from(conn, current_version)?;
        } else {
            return Ok(current_version);
        }
    }
}

/// Migrates the given database connection from the DBVersion version to (version + 1).
/// Expects the database to be in the given version and updates the user_version pragma
/// to the new (version + 1) value if successful.
///
/// Does not wrap the operation in a transaction,
/// the caller is supposed to if a rollback might be required.
fn migrate_up_from(conn: &SqliteConnection, version: DBVersion) -> Result<()> {
    match version {
        0 => version_001::migrate(&conn)?,
        1 => version_002::migrate(&conn)?,
        _ => return Err(MigrationError::UnknownDBVersion { version }),
    };

    write_db_version(&conn, version + 1)?;
    info!(from = version, to = version + 1, "migrated node database");
    Ok(())
}

fn read_db_version(conn: &SqliteConnection) -> Result<DBVersion> {
    let rows = sql_query("PRAGMA user_version")
        .load::<UserVersion>(conn)
        .map_err(|source| MigrationError::ReadWriteDBVersion { source })?;

    Ok(rows.first().map_or(0, |row| row.user_version))
}

fn write_db_version(conn: &SqliteConnection, version: DBVersion) -> Result<()> {
    // PRAGMA statements do not accept bound parameters.
    sql_query(format!("PRAGMA user_version = {}", version))
        .execute(conn)
        .map_err(|source| MigrationError::ReadWriteDBVersion { source })?;

    Ok(())
}
