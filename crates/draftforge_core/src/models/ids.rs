use uuid::Uuid;

/// Generate a process-unique opaque ID in the editor's upper-case UUID form.
pub fn new_id() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}
