use super::schema::nodes;
use super::NodeType;
use chrono::NaiveDateTime;

#[derive(Debug, Queryable, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub node_type: NodeType,
    pub parent_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl Node {
    pub fn is_folder(&self) -> bool {
        self.node_type.is_folder()
    }

    pub fn is_root_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Insertable)]
#[table_name = "nodes"]
pub struct InsertFull<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub node_type: NodeType,
    pub parent_id: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[table_name = "nodes"]
pub struct UpdateName<'a> {
    pub name: &'a str,
    pub updated_at: NaiveDateTime,
}

// A move to root level must write NULL, not skip the column.
#[derive(AsChangeset)]
#[table_name = "nodes"]
#[changeset_options(treat_none_as_null = "true")]
pub struct UpdateParent<'a> {
    pub parent_id: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}
