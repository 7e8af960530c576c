use super::*;

pub fn migrate(conn: &SqliteConnection) -> Result<()> {
    create_table_nodes(&conn)?;
    create_index_nodes_parent_name(&conn)?;
    create_index_nodes_parent(&conn)?;

    Ok(())
}

// Every file and folder of the namespace is one row. Nodes form a forest by
// pointing at their parent folder, root level nodes have no parent.
// 'type' is either 'file' or 'folder', deleted_at is reserved.
// A parent must exist; subtrees are only ever deleted as a whole.
fn create_table_nodes(conn: &SqliteConnection) -> Result<()> {
    sql_query(
        "CREATE TABLE nodes(
                id              TEXT PRIMARY KEY NOT NULL,
                name            TEXT NOT NULL,
                type            TEXT NOT NULL,
                parent_id       TEXT REFERENCES nodes(id),

                created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                deleted_at      TIMESTAMP
            )",
    )
    .execute(conn)?;

    Ok(())
}

// No two siblings may share a name.
fn create_index_nodes_parent_name(conn: &SqliteConnection) -> Result<()> {
    sql_query("CREATE UNIQUE INDEX nodes_parent_name_idx ON nodes(parent_id, name)")
        .execute(conn)?;
    Ok(())
}

// Child listings and subtree walks search by parent.
fn create_index_nodes_parent(conn: &SqliteConnection) -> Result<()> {
    sql_query("CREATE INDEX nodes_parent_idx ON nodes(parent_id)").execute(conn)?;
    Ok(())
}
