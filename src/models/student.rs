use serde::Serialize;

/// Identity registry entry. Immutable once enrolled; referenced by
/// gate events and attendance records through `student_id`.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: i64,
    pub student_id: String,          // campus identifier, unique
    pub full_name: String,
    pub rfid_tag: Option<String>,    // unique when set
    pub guardian_email: String,
    pub created_at: String,
}

impl Student {
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.student_id
        } else {
            &self.full_name
        }
    }
}
