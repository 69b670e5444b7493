pub mod auth;
pub mod files;
pub mod form_schema;
pub mod merge;
pub mod notifications;
pub mod questions;
pub mod submissions;
pub mod terms;
pub mod upload;
