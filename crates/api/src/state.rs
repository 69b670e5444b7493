use std::sync::Arc;

use audition_core::user::SeedUser;
use audition_db::{JsonStore, StoreConfig, StoreError};
use audition_events::{SubmissionNotifier, WebhookDelivery, WebhookError};
use audition_pipeline::{MediaConcatenator, MergeService};

use crate::auth::password::hash_password;
use crate::config::ServerConfig;
use crate::rate_limit::LoginRateLimiter;

/// Failure while assembling [`AppState`].
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to open data store: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to hash default admin password: {0}")]
    AdminPassword(String),

    #[error("Failed to build webhook client: {0}")]
    Webhook(#[from] WebhookError),
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// JSON document store.
    pub store: Arc<JsonStore>,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Merge orchestrator with its per-submission locks.
    pub merge: Arc<MergeService>,
    /// Token buckets for `POST /auth/login`.
    pub login_limiter: Arc<LoginRateLimiter>,
    /// Fire-and-forget new-submission webhook sender.
    pub notifier: SubmissionNotifier,
}

impl AppState {
    /// Open the store and wire the services from `config`.
    pub async fn initialize(
        config: ServerConfig,
        concatenator: Arc<dyn MediaConcatenator>,
    ) -> Result<Self, StateError> {
        let admin_hash = hash_password(&config.admin.password)
            .map_err(|e| StateError::AdminPassword(e.to_string()))?;

        let store = Arc::new(
            JsonStore::open(StoreConfig {
                data_dir: config.paths.data_dir.clone(),
                uploads_dir: config.paths.uploads_dir.clone(),
                seed_admin: Some(SeedUser {
                    email: config.admin.email.clone(),
                    name: config.admin.name.clone(),
                    password_hash: admin_hash,
                }),
            })
            .await?,
        );

        let merge = Arc::new(MergeService::new(
            Arc::clone(&store),
            concatenator,
            config.paths.tmp_dir.clone(),
        ));
        let login_limiter = Arc::new(LoginRateLimiter::new(config.login_rate));
        let notifier = SubmissionNotifier::new(WebhookDelivery::new()?, config.public_base_url.clone());

        Ok(Self {
            store,
            config: Arc::new(config),
            merge,
            login_limiter,
            notifier,
        })
    }
}
