use std::sync::Arc;

use tokio::task::JoinHandle;

use super::ExecutorContext;
use crate::core::app::AppAction;
use crate::core::catalog::CatalogSource;

pub fn spawn_catalog_refresh(
    ctx: ExecutorContext,
    source: Arc<dyn CatalogSource>,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let result = tokio::select! {
            result = source.refresh() => result,
            _ = ctx.lifetime.closed() => return false,
        };

        let action = match result {
            Ok(entries) => {
                tracing::debug!(entries = entries.len(), "Catalog refreshed");
                AppAction::CatalogLoaded { entries }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Catalog refresh failed");
                AppAction::CatalogLoadFailed {
                    error: err.to_string(),
                }
            }
        };

        ctx.deliver(action)
    })
}
