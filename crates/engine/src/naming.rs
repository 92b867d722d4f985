//! Candidate names for rename-and-retry
//!
//! When an insert collides with a sibling's name the service asks for the
//! next candidate: `report.docx` → `report(1).docx` → `report(2).docx`.

/// Produces alternative names after a sibling-name collision
pub trait NameCandidates: Send + Sync {
    /// The candidate for retry number `attempt` (starting at 1)
    fn candidate(&self, original: &str, attempt: u32) -> String;
}

/// Appends `(n)` before the extension
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedSuffix;

impl NameCandidates for NumberedSuffix {
    fn candidate(&self, original: &str, attempt: u32) -> String {
        next_available_name(original, attempt)
    }
}

/// `name` with `(attempt)` inserted before its extension
///
/// A leading dot does not start an extension, so `.profile` becomes
/// `.profile(1)`.
pub fn next_available_name(name: &str, attempt: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}({}).{}", stem, attempt, ext),
        _ => format!("{}({})", name, attempt),
    }
}
