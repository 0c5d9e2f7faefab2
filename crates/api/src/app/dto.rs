use serde::Deserialize;
use serde_json::json;

use classroom_groups::Group;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products/:id/access`.
///
/// `student_id` stays a string so malformed ids map to `invalid_id` instead of
/// a body rejection.
#[derive(Debug, Deserialize)]
pub struct AccessRequest {
    pub student_id: String,
    #[serde(default = "default_access")]
    pub access: bool,
}

fn default_access() -> bool {
    true
}

// -------------------------
// Response mapping
// -------------------------

pub fn group_to_json(group: &Group) -> serde_json::Value {
    json!({
        "id": group.id_typed().to_string(),
        "number": group.number(),
        "name": group.name(),
        "students": group.students().iter().map(|s| s.to_string()).collect::<Vec<_>>(),
    })
}
