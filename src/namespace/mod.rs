mod errors;
pub use self::errors::*;

use crate::node_store::{Node, NodeStore, NodeType, ValidationError};
use tracing::{debug, warn};

/// Name based access to the namespace.
///
/// Users address nodes by their (globally unique) names, the store works on ids.
/// Each operation resolves the names, checks the request against the namespace rules
/// and delegates to the store, all in one transaction.
pub struct NamespaceService {
    store: NodeStore,
}

impl NamespaceService {
    /// Same as new, but opens the node store at the given path first.
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self::new(NodeStore::open(path)?))
    }

    pub fn new(store: NodeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Creates a node at root level or, if a parent name is given, inside that folder.
    pub fn create_node(
        &self,
        name: &str,
        node_type: Option<NodeType>,
        parent_name: Option<&str>,
    ) -> Result<Node> {
        let result = self.store.transaction::<_, NamespaceError, _>(|| {
            let parent = match parent_name.filter(|parent_name| !parent_name.is_empty()) {
                Some(parent_name) => Some(self.resolve_folder(
                    parent_name,
                    ValidationError::ParentNotFound,
                    ValidationError::ParentNotFolder,
                )?),
                None => None,
            };

            let parent_id = parent.as_ref().map(|parent| parent.id.as_str());
            Ok(self.store.create(name, node_type, parent_id)?)
        });

        traced("create", result)
    }

    /// Lists the children of the named folder, ordered by name.
    pub fn list_nodes(&self, parent_name: &str) -> Result<Vec<Node>> {
        let result = self.store.transaction::<_, NamespaceError, _>(|| {
            let parent = self.resolve_folder(
                parent_name,
                ValidationError::ParentNotFound,
                ValidationError::ParentNotFolder,
            )?;

            Ok(self.store.list_children(&parent.id)?)
        });

        traced("list", result)
    }

    /// Renames the named node. Renaming a node to its current name is refused.
    pub fn rename_node(&self, name: &str, new_name: &str) -> Result<Node> {
        let result = self.store.transaction::<_, NamespaceError, _>(|| {
            let node = self.resolve(name)?;
            if node.name == new_name {
                return Err(NamespaceError::NameUnchanged {
                    name: name.to_string(),
                });
            }

            Ok(self.store.rename(&node.id, new_name)?)
        });

        traced("rename", result)
    }

    /// Moves the named node (with everything below it) into the named folder.
    pub fn move_node(&self, name: &str, new_parent_name: &str) -> Result<Node> {
        let result = self.store.transaction::<_, NamespaceError, _>(|| {
            let node = self.resolve(name)?;
            let new_parent = self.resolve_folder(
                new_parent_name,
                ValidationError::NewParentNotFound,
                ValidationError::NewParentNotFolder,
            )?;

            Ok(self.store.move_node(&node.id, Some(&new_parent.id))?)
        });

        traced("move", result)
    }

    /// Removes the named node and everything below it.
    ///
    /// Returns the number of removed nodes.
    pub fn remove_node(&self, name: &str) -> Result<usize> {
        let result = self.store.transaction::<_, NamespaceError, _>(|| {
            let node = self.resolve(name)?;

            Ok(self.store.delete_subtree(&node.id)?)
        });

        traced("remove", result)
    }

    pub fn find_node(&self, name: &str) -> Result<Option<Node>> {
        Ok(self.store.find_by_name(name)?)
    }

    fn resolve(&self, name: &str) -> Result<Node> {
        self.store
            .find_by_name(name)?
            .ok_or_else(|| NamespaceError::NodeNotFound {
                name: name.to_string(),
            })
    }

    fn resolve_folder(
        &self,
        name: &str,
        if_missing: ValidationError,
        if_file: ValidationError,
    ) -> Result<Node> {
        let node = self.store.find_by_name(name)?.ok_or(if_missing)?;
        if !node.is_folder() {
            return Err(if_file.into());
        }

        Ok(node)
    }
}

fn traced<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(error) = &result {
        if error.is_infrastructure() {
            warn!(operation, %error, "namespace operation failed");
        } else {
            debug!(operation, code = error.code(), "namespace operation rejected");
        }
    }

    result
}
