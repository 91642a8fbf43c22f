//! Sync command: fetch a class curriculum from the sync server

use anyhow::Result;

use crate::config::AppConfig;
use crate::remote::{HttpSyncClient, SyncClient};
use crate::store::content::ContentStore;
use crate::store::{JsonContentStore, MemorySessionStore};

/// Execute the sync command
pub async fn execute_sync_command(
    config: &AppConfig,
    class_code: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let mut client = HttpSyncClient::new(
        config.server_url.clone(),
        Box::new(MemorySessionStore::new()),
    );

    client.login(email, password).await?;
    let curriculum = client.fetch_class(class_code).await?;
    client.logout();

    let store = JsonContentStore::new(config.curriculum_file());
    store.save(&curriculum)?;
    println!(
        "✅ Synced class {} ({} units) into {}",
        class_code,
        curriculum.unit_ids().len(),
        store.path().display()
    );
    Ok(())
}
