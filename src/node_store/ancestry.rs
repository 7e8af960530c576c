use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;

use super::Result;

// Closure of a node along parent -> child edges, the node itself included.
// UNION (instead of UNION ALL) drops rows already produced, so an id is never
// expanded twice and the walk terminates even if parent pointers form a cycle.
pub(super) const SUBTREE_CTE: &str = "WITH RECURSIVE subtree(id) AS (
        SELECT id FROM nodes WHERE id = ?
        UNION
        SELECT nodes.id FROM nodes INNER JOIN subtree ON nodes.parent_id = subtree.id
    )";

#[derive(Debug, QueryableByName)]
struct SubtreeEntry {
    #[sql_type = "Text"]
    id: String,
}

/// Answers ancestry questions on the node table without loading the nodes themselves.
pub struct AncestryChecker<'a> {
    conn: &'a SqliteConnection,
}

impl<'a> AncestryChecker<'a> {
    pub fn new(conn: &'a SqliteConnection) -> Self {
        Self { conn }
    }

    /// Returns true if candidate_id is ancestor_id itself or any transitive child of it.
    /// Stops at the first hit instead of materializing the whole subtree.
    pub fn is_same_or_descendant(&self, ancestor_id: &str, candidate_id: &str) -> Result<bool> {
        if ancestor_id == candidate_id {
            return Ok(true);
        }

        let hits = sql_query(format!(
            "{} SELECT id FROM subtree WHERE id = ? LIMIT 1",
            SUBTREE_CTE
        ))
        .bind::<Text, _>(ancestor_id)
        .bind::<Text, _>(candidate_id)
        .load::<SubtreeEntry>(self.conn)?;

        Ok(!hits.is_empty())
    }

    /// Lists the ids of the node and all its transitive children.
    /// Returns an empty list for unknown ids.
    pub fn subtree_ids(&self, root_id: &str) -> Result<Vec<String>> {
        let entries = sql_query(format!("{} SELECT id FROM subtree", SUBTREE_CTE))
            .bind::<Text, _>(root_id)
            .load::<SubtreeEntry>(self.conn)?;

        Ok(entries.into_iter().map(|entry| entry.id).collect())
    }
}
