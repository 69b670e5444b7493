//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&JsonStore` as the first argument and run under the guard of the
//! resource kind they own.

pub mod form_schema_repo;
pub mod notification_repo;
pub mod question_repo;
pub mod submission_repo;
pub mod terms_repo;
pub mod user_repo;

pub use form_schema_repo::FormSchemaRepo;
pub use notification_repo::NotificationRepo;
pub use question_repo::QuestionRepo;
pub use submission_repo::{DeletedSubmission, SubmissionRepo};
pub use terms_repo::TermsRepo;
pub use user_repo::UserRepo;
