//! Contracts of the collaborators that actually talk to the model.
//!
//! The chat shell only starts and stops work through these traits and reads
//! back their status flags; transport, retries and streaming belong to the
//! implementations.

use crate::core::message::Message;
use crate::core::providers::Provider;

/// Everything the send engine needs for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    /// Text given explicitly (an example prompt); `None` means the draft.
    pub override_text: Option<String>,
    /// The text that will be sent: the override when present, else the draft.
    pub text: String,
    pub provider: Option<Provider>,
    pub model: String,
    /// The selected provider's key only; other providers' keys never leave
    /// the credential store.
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceRequest {
    pub draft: String,
    pub provider: Option<Provider>,
    pub model: String,
    pub api_key: String,
}

pub trait SendEngine: Send {
    /// Starts a new turn. Completion is signalled back to the shell as
    /// `AppAction::SendCompleted`.
    fn send(&mut self, request: SendRequest);

    /// Interrupts the in-flight response, if any.
    fn stop(&mut self);

    fn is_streaming(&self) -> bool;

    /// True once the first message of the session has been submitted.
    fn has_started(&self) -> bool;

    fn messages(&self) -> &[Message];
}

pub trait EnhanceEngine: Send {
    /// Requests a rewrite of the draft. The result arrives as
    /// `AppAction::EnhanceCompleted` or `AppAction::EnhanceFailed`.
    fn enhance(&mut self, request: EnhanceRequest);

    fn is_enhancing(&self) -> bool;
}

/// Engines that accept every request and never produce output; for hosts
/// that only need the selection surface.
#[derive(Debug, Default)]
pub struct NullEngine {
    messages: Vec<Message>,
}

impl SendEngine for NullEngine {
    fn send(&mut self, request: SendRequest) {
        tracing::debug!(chars = request.text.len(), "Send dropped by null engine");
    }

    fn stop(&mut self) {}

    fn is_streaming(&self) -> bool {
        false
    }

    fn has_started(&self) -> bool {
        false
    }

    fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl EnhanceEngine for NullEngine {
    fn enhance(&mut self, _request: EnhanceRequest) {}

    fn is_enhancing(&self) -> bool {
        false
    }
}
