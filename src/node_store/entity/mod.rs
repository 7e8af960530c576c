use super::schema;

// Basic entity mappings on database tables (Should be mostly 1:1 copies of our schema and helpers).
pub mod node;
pub use self::node::Node;
mod node_type_enum;
pub use self::node_type_enum::{NodeType, UnknownNodeType};
