use crate::core::composer::ActionControl;
use crate::core::message::Message;
use crate::core::providers::Provider;
use crate::core::selection::{ModelOption, OptionsKey};

/// Which body the panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    /// Before the first message: intro copy and example prompts.
    Intro,
    Conversation,
}

/// Everything a view needs to draw the chat panel, borrowed from the shell.
/// Not `Debug`: it carries the selected provider's key.
#[derive(Clone)]
pub struct ChatPanel<'a> {
    pub visible: bool,
    pub mode: PanelMode,
    pub streaming: bool,
    /// Empty until the chat has started.
    pub messages: &'a [Message],
    pub draft: &'a str,
    pub provider: Option<&'a Provider>,
    pub model: &'a str,
    pub providers: &'a [Provider],
    pub model_options: &'a [ModelOption],
    /// Changes whenever `model_options` may have changed.
    pub options_key: &'a OptionsKey,
    /// Stored key for the selected provider, `""` when none.
    pub api_key: &'a str,
    pub enhancing: bool,
    pub enhanced: bool,
    pub can_enhance: bool,
    pub action_control: ActionControl,
    pub show_hint: bool,
    pub example_prompts: &'a [String],
    pub status: Option<&'a str>,
}

impl ChatPanel<'_> {
    pub fn chat_started(&self) -> bool {
        self.mode == PanelMode::Conversation
    }
}
