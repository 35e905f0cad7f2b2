use tokio_util::sync::CancellationToken;

/// Tracks whether the view that owns an [`App`](super::App) is still live.
///
/// Background tasks hold a clone and drop their result once the view has been
/// closed, so late catalog or credential loads never touch torn-down state.
#[derive(Clone, Debug, Default)]
pub struct ViewLifetime {
    token: CancellationToken,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    /// Resolves once [`close`](Self::close) has been called on any clone.
    pub async fn closed(&self) {
        self.token.cancelled().await;
    }
}
