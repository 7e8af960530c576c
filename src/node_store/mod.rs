mod ancestry;
pub use self::ancestry::AncestryChecker;
pub mod db_migration;
// Database schema - must be kept up to date manually
mod entity;
pub use self::entity::*;
mod errors;
pub use self::errors::*;
mod schema;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info};

use self::schema::nodes;

/// Persistent storage of the namespace: one row per file or folder, linked by parent ids.
///
/// All reads and writes of the node table go through this type. Operations that validate
/// before they mutate run in a single transaction, so their checks can not go stale.
pub struct NodeStore {
    conn: SqliteConnection,
}

impl NodeStore {
    /// Opens the node db file located at the given path and performs data migrations to
    /// the current application version if required.
    /// Use ":memory:" for a throw-away database.
    pub fn open(path: &str) -> Result<NodeStore> {
        let result = NodeStore {
            conn: SqliteConnection::establish(path)?,
        };

        result.default_db_settings()?;
        result.upgrade_db()?;

        debug!(path, "opened node database");
        Ok(result)
    }

    /// Ancestry queries on the nodes of this store.
    pub fn ancestry(&self) -> AncestryChecker<'_> {
        AncestryChecker::new(&self.conn)
    }

    /// Runs the given closure in a transaction on the store's connection.
    /// Store operations called inside nest as savepoints, so the closure commits or rolls
    /// back as a whole.
    pub fn transaction<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<diesel::result::Error>,
    {
        self.conn.transaction(f)
    }

    /// Creates a new node, either at root level (no parent_id) or inside the given folder.
    /// The node gets a fresh id and creation/update times of now.
    ///
    /// Returns the node as persisted in the database.
    pub fn create(
        &self,
        name: &str,
        node_type: Option<NodeType>,
        parent_id: Option<&str>,
    ) -> Result<Node> {
        if name.is_empty() {
            return Err(ValidationError::NameNotGiven.into());
        }
        let node_type = node_type.ok_or(ValidationError::TypeNotGiven)?;

        let result = self.conn.transaction::<_, NodeStoreError, _>(|| {
            if self.find_sibling(parent_id, name)?.is_some() {
                return Err(ValidationError::DuplicateName.into());
            }
            if let Some(parent_id) = parent_id {
                let parent = self
                    .find_by_id(parent_id)?
                    .ok_or(ValidationError::ParentNotFound)?;
                if !parent.is_folder() {
                    return Err(ValidationError::ParentNotFolder.into());
                }
            }

            let new_id = uuid::Uuid::new_v4().to_string();
            let now = current_time();
            diesel::insert_into(nodes::table)
                .values(&node::InsertFull {
                    id: &new_id,
                    name,
                    node_type,
                    parent_id,
                    created_at: now,
                    updated_at: now,
                })
                .execute(&self.conn)?;

            self.load_node(&new_id)
        })?;

        info!(
            node_id = %result.id,
            name = %result.name,
            node_type = %result.node_type,
            parent_id = ?result.parent_id,
            "created node"
        );
        Ok(result)
    }

    /// Looks up the node with exactly the given name.
    /// Names are unique in the whole store, so there is at most one.
    pub fn find_by_name(&self, name: &str) -> Result<Option<Node>> {
        let result = nodes::table
            .filter(nodes::name.eq(name))
            .first::<Node>(&self.conn)
            .optional()?;

        Ok(result)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Node>> {
        let result = nodes::table.find(id).first::<Node>(&self.conn).optional()?;

        Ok(result)
    }

    /// Lists the direct children of the given folder, ordered by name (byte-wise).
    pub fn list_children(&self, parent_id: &str) -> Result<Vec<Node>> {
        if parent_id.is_empty() {
            return Err(ValidationError::ParentIdNotGiven.into());
        }

        self.conn.transaction::<_, NodeStoreError, _>(|| {
            let parent = self
                .find_by_id(parent_id)?
                .ok_or(ValidationError::ParentNotFound)?;
            if !parent.is_folder() {
                return Err(ValidationError::ParentNotFolder.into());
            }

            let children = nodes::table
                .filter(nodes::parent_id.eq(parent_id))
                .order(nodes::name.asc())
                .load::<Node>(&self.conn)?;

            debug!(parent_id, children = children.len(), "listed children");
            Ok(children)
        })
    }

    /// Gives the node a new name and bumps its update time.
    ///
    /// Name collisions are left to the unique indexes of the table,
    /// they are reported as DuplicateName.
    pub fn rename(&self, id: &str, new_name: &str) -> Result<Node> {
        if id.is_empty() {
            return Err(ValidationError::IdNotGiven.into());
        }
        if new_name.is_empty() {
            return Err(ValidationError::NewNameNotGiven.into());
        }

        let result = self.conn.transaction::<_, NodeStoreError, _>(|| {
            let changed = diesel::update(nodes::table.find(id))
                .set(&node::UpdateName {
                    name: new_name,
                    updated_at: current_time(),
                })
                .execute(&self.conn)?;
            if changed == 0 {
                return Err(NodeStoreError::NotFound);
            }

            self.load_node(id)
        })?;

        info!(node_id = %result.id, name = %result.name, "renamed node");
        Ok(result)
    }

    /// Re-attaches the node (and with it its whole subtree) to a new parent folder,
    /// or to root level if no new parent is given.
    ///
    /// Refuses to move a node into itself or any of its descendants,
    /// as this would detach the subtree into a cycle.
    pub fn move_node(&self, id: &str, new_parent_id: Option<&str>) -> Result<Node> {
        if id.is_empty() {
            return Err(ValidationError::IdNotGiven.into());
        }

        let result = self.conn.transaction::<_, NodeStoreError, _>(|| {
            if let Some(new_parent_id) = new_parent_id {
                let new_parent = self
                    .find_by_id(new_parent_id)?
                    .ok_or(ValidationError::NewParentNotFound)?;
                if !new_parent.is_folder() {
                    return Err(ValidationError::NewParentNotFolder.into());
                }
                if self.ancestry().is_same_or_descendant(id, new_parent_id)? {
                    return Err(ValidationError::CannotMoveIntoDescendant.into());
                }
            }

            let changed = diesel::update(nodes::table.find(id))
                .set(&node::UpdateParent {
                    parent_id: new_parent_id,
                    updated_at: current_time(),
                })
                .execute(&self.conn)?;
            if changed == 0 {
                return Err(NodeStoreError::NotFound);
            }

            self.load_node(id)
        })?;

        info!(node_id = %result.id, parent_id = ?result.parent_id, "moved node");
        Ok(result)
    }

    /// Deletes the node and every node below it in one statement.
    /// Deleting an unknown id is a no-op.
    ///
    /// Returns the number of deleted nodes.
    pub fn delete_subtree(&self, id: &str) -> Result<usize> {
        if id.is_empty() {
            return Err(ValidationError::IdNotGiven.into());
        }

        let removed = self.conn.transaction::<_, NodeStoreError, _>(|| {
            let removed = sql_query(format!(
                "{} DELETE FROM nodes WHERE id IN (SELECT id FROM subtree)",
                ancestry::SUBTREE_CTE
            ))
            .bind::<Text, _>(id)
            .execute(&self.conn)?;

            Ok(removed)
        })?;

        info!(node_id = id, removed, "deleted subtree");
        Ok(removed)
    }

    /// Total number of nodes in the store.
    pub fn count(&self) -> Result<i64> {
        Ok(nodes::table.count().get_result(&self.conn)?)
    }

    fn find_sibling(&self, parent_id: Option<&str>, name: &str) -> Result<Option<Node>> {
        // parent_id = NULL never matches, root level siblings need IS NULL.
        let result = match parent_id {
            Some(parent_id) => nodes::table
                .filter(nodes::parent_id.eq(parent_id))
                .filter(nodes::name.eq(name))
                .first::<Node>(&self.conn)
                .optional()?,
            None => nodes::table
                .filter(nodes::parent_id.is_null())
                .filter(nodes::name.eq(name))
                .first::<Node>(&self.conn)
                .optional()?,
        };

        Ok(result)
    }

    // Re-reads a node right after it was written in the same transaction.
    fn load_node(&self, id: &str) -> Result<Node> {
        nodes::table
            .find(id)
            .first::<Node>(&self.conn)
            .optional()?
            .ok_or(NodeStoreError::ViolatesDBConsistency {
                message: "written node can not be read back",
            })
    }

    fn upgrade_db(&self) -> Result<()> {
        self.conn
            .transaction(|| db_migration::upgrade_db(&self.conn))?;

        Ok(())
    }

    fn default_db_settings(&self) -> Result<()> {
        sql_query("PRAGMA foreign_keys = 1").execute(&self.conn)?;

        Ok(())
    }
}

fn current_time() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
