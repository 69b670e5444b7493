//! Move media referenced as `/uploads/<name>` out of the old public directory
//! into the private upload directory and rewrite the stored references.
//!
//! Reads `DATA_DIR`, `UPLOADS_DIR` and `LEGACY_PUBLIC_UPLOADS_DIR` the same
//! way the server does. Safe to run more than once.

use anyhow::Context;
use audition_api::config::StoragePaths;
use audition_api::telemetry::init_tracing;
use audition_db::migrate::migrate_legacy_uploads;
use audition_db::{JsonStore, StoreConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let paths = StoragePaths::from_env();
    tracing::info!(
        data_dir = %paths.data_dir.display(),
        uploads_dir = %paths.uploads_dir.display(),
        legacy_dir = %paths.legacy_uploads_dir.display(),
        "Migrating legacy uploads"
    );

    let store = JsonStore::open(StoreConfig {
        data_dir: paths.data_dir.clone(),
        uploads_dir: paths.uploads_dir.clone(),
        seed_admin: None,
    })
    .await
    .context("Failed to open data store")?;

    let report = migrate_legacy_uploads(&store, &paths.legacy_uploads_dir)
        .await
        .context("Migration failed")?;

    tracing::info!(
        moved = report.moved,
        updated = report.updated,
        missing = report.missing,
        "Migration complete"
    );
    Ok(())
}
