table! {
    nodes (id) {
        id -> Text,
        name -> Text,
        #[sql_name = "type"]
        node_type -> Text,
        parent_id -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        // Reserved for soft deletes, never written.
        deleted_at -> Nullable<Timestamp>,
    }
}
