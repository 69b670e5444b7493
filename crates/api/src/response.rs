//! Shared success envelopes for API handlers.
//!
//! Mutating endpoints answer `{ "success": true, ... }` so the admin UI can
//! check one flag regardless of the resource. Reads return the bare resource.

use serde::Serialize;

/// `{ "success": true }` with no payload.
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `{ "success": true, ...data }` where `data`'s fields are inlined.
///
/// # Example
///
/// ```ignore
/// Ok(Json(SuccessWith::new(SubmissionBody { submission })))
/// ```
#[derive(Debug, Serialize)]
pub struct SuccessWith<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessWith<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
