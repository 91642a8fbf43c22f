//! Remote collaborators: the content-sync server client

pub mod sync;

pub use sync::{HttpSyncClient, SyncClient};
