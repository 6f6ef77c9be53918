use crate::models::ApiDoc;
use chrono::Utc;

/// Finalizes an extracted document for the caller.
///
/// Sets the source URL, replaces the description when `description_override`
/// is non-empty, and stamps both timestamps with the current instant.
pub fn assemble(mut doc: ApiDoc, source_url: &str, description_override: Option<&str>) -> ApiDoc {
    doc.url = source_url.to_string();

    if let Some(description) = description_override.filter(|d| !d.is_empty()) {
        doc.description = description.to_string();
    }

    let now = Utc::now();
    doc.created_at = now;
    doc.updated_at = now;
    doc
}
