//! Typed documents stored per resource kind, with their seed values.

use serde::de::DeserializeOwned;
use serde::Serialize;

use audition_core::form_schema::{default_form_schema, FormField};
use audition_core::notification::Notification;
use audition_core::question::Question;
use audition_core::site_config::SiteConfig;
use audition_core::submission::Submission;
use audition_core::user::User;

use crate::kind::ResourceKind;

/// A whole-file JSON document owned by one resource kind.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    /// Value persisted the first time the document is read.
    fn seed() -> Self;
}

impl Document for Vec<Question> {
    const KIND: ResourceKind = ResourceKind::Questions;

    fn seed() -> Self {
        Vec::new()
    }
}

impl Document for Vec<FormField> {
    const KIND: ResourceKind = ResourceKind::FormSchema;

    fn seed() -> Self {
        default_form_schema()
    }
}

impl Document for Vec<Submission> {
    const KIND: ResourceKind = ResourceKind::Submissions;

    fn seed() -> Self {
        Vec::new()
    }
}

/// Empty here; the default admin account is added by
/// [`UserRepo`](crate::repositories::UserRepo) from store configuration.
impl Document for Vec<User> {
    const KIND: ResourceKind = ResourceKind::Users;

    fn seed() -> Self {
        Vec::new()
    }
}

impl Document for SiteConfig {
    const KIND: ResourceKind = ResourceKind::Terms;

    fn seed() -> Self {
        SiteConfig::seeded()
    }
}

impl Document for Vec<Notification> {
    const KIND: ResourceKind = ResourceKind::Notifications;

    fn seed() -> Self {
        Vec::new()
    }
}
