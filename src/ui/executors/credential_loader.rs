use std::sync::Arc;

use tokio::task::JoinHandle;

use super::ExecutorContext;
use crate::core::app::AppAction;
use crate::core::credentials::{CredentialStorage, CredentialStore};

/// Reads the persisted credentials on the blocking pool; keyring and file
/// backends may block.
pub fn spawn_credential_load(
    ctx: ExecutorContext,
    storage: Arc<dyn CredentialStorage>,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let loaded =
            tokio::task::spawn_blocking(move || CredentialStore::read_persisted(storage.as_ref()))
                .await;

        match loaded {
            Ok(keys) => ctx.deliver(AppAction::CredentialsLoaded { keys }),
            Err(err) => {
                tracing::warn!(error = %err, "Credential load task failed");
                false
            }
        }
    })
}
