use uuid::Uuid;

/// Fresh opaque id for a new node. Random (v4), so ids stay unique across
/// sessions that share the same data file.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
