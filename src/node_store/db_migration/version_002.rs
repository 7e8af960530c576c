use super::*;

pub fn migrate(conn: &SqliteConnection) -> Result<()> {
    create_index_nodes_name(&conn)?;

    Ok(())
}

// Names are unique across the whole namespace, not only among siblings.
// Name lookups are the entry point of every namespace operation, so the
// index also serves as their search index.
fn create_index_nodes_name(conn: &SqliteConnection) -> Result<()> {
    sql_query("CREATE UNIQUE INDEX nodes_name_idx ON nodes(name)").execute(conn)?;
    Ok(())
}
