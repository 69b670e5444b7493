//! Validation helpers shared by the ordered list documents.

use std::collections::HashSet;

use crate::error::CoreError;

/// Reject lists in which two entries share an id.
pub fn validate_unique_ids<'a, I>(ids: I, entity: &str) -> Result<(), CoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(CoreError::Validation(format!("Empty {entity} id")));
        }
        if !seen.insert(id) {
            return Err(CoreError::Validation(format!("Duplicate {entity} id '{id}'")));
        }
    }
    Ok(())
}
