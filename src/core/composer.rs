//! Draft input and the send/stop/enhance intents it produces.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

/// Drafts longer than this many characters show the newline shortcut hint.
const HINT_THRESHOLD: usize = 3;

pub const NEWLINE_HINT: &str = "shift+enter for newline";

/// What the composer asks the shell to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerIntent {
    /// `override_text: None` sends the current draft.
    Send { override_text: Option<String> },
    Stop,
    Enhance,
}

/// State of the single send/stop control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionControl {
    Hidden,
    Send,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Intent(ComposerIntent),
    Edited,
    Ignored,
}

#[derive(Debug, Default, Clone)]
pub struct Composer {
    draft: String,
    /// Mirrored from the send engine.
    streaming: bool,
    /// Mirrored from the enhance engine.
    enhancing: bool,
    enhanced: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_len(&self) -> usize {
        self.draft.graphemes(true).count()
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn is_enhancing(&self) -> bool {
        self.enhancing
    }

    pub fn is_enhanced(&self) -> bool {
        self.enhanced
    }

    /// Replaces the draft wholesale, as a text field change would.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.enhanced = false;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.draft.push(ch);
        self.enhanced = false;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if let Some((start, _)) = self.draft.grapheme_indices(true).next_back() {
            self.draft.truncate(start);
            self.enhanced = false;
        }
    }

    /// Routes a key press. A bare Enter submits and inserts nothing;
    /// Shift+Enter or Alt+Enter inserts a line break instead.
    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Ignored;
        }

        match key.code {
            KeyCode::Enter => {
                if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) {
                    self.insert_newline();
                    KeyOutcome::Edited
                } else {
                    KeyOutcome::Intent(self.submit())
                }
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(ch);
                KeyOutcome::Edited
            }
            KeyCode::Backspace => {
                self.backspace();
                KeyOutcome::Edited
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Sends the current draft.
    pub fn submit(&mut self) -> ComposerIntent {
        self.enhanced = false;
        ComposerIntent::Send {
            override_text: None,
        }
    }

    /// Sends `text` verbatim, whatever the draft holds.
    pub fn submit_example(&mut self, text: &str) -> ComposerIntent {
        self.enhanced = false;
        ComposerIntent::Send {
            override_text: Some(text.to_string()),
        }
    }

    pub fn action_control(&self) -> ActionControl {
        if self.streaming {
            ActionControl::Stop
        } else if !self.draft.is_empty() {
            ActionControl::Send
        } else {
            ActionControl::Hidden
        }
    }

    /// Presses the send/stop control. Nothing happens while it is hidden.
    pub fn activate_action_control(&mut self) -> Option<ComposerIntent> {
        match self.action_control() {
            ActionControl::Hidden => None,
            ActionControl::Stop => Some(ComposerIntent::Stop),
            ActionControl::Send => Some(self.submit()),
        }
    }

    pub fn can_enhance(&self) -> bool {
        !self.draft.is_empty() && !self.enhancing
    }

    pub fn request_enhance(&self) -> Option<ComposerIntent> {
        self.can_enhance().then_some(ComposerIntent::Enhance)
    }

    /// Whether to show the "enhanced" confirmation. Suppressed while a new
    /// enhancement is running.
    pub fn show_enhanced_indicator(&self) -> bool {
        self.enhanced && !self.enhancing
    }

    pub fn show_hint(&self) -> bool {
        self.draft_len() > HINT_THRESHOLD
    }

    pub fn sync_status(&mut self, streaming: bool, enhancing: bool) {
        self.streaming = streaming;
        self.enhancing = enhancing;
    }

    /// Installs an enhanced draft and raises the confirmation indicator.
    pub fn apply_enhancement(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.enhanced = true;
    }

    /// Clears the draft once the send engine reports the turn was accepted.
    pub fn clear_after_send(&mut self) {
        self.draft.clear();
        self.enhanced = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn composer_with(text: &str) -> Composer {
        let mut composer = Composer::new();
        composer.set_draft(text);
        composer
    }

    #[test]
    fn bare_enter_submits_without_newline() {
        let mut composer = composer_with("hello");

        let outcome = composer.handle_key(&key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(
            outcome,
            KeyOutcome::Intent(ComposerIntent::Send {
                override_text: None
            })
        );
        assert_eq!(composer.draft(), "hello");
    }

    #[test]
    fn shift_enter_inserts_newline_without_submitting() {
        let mut composer = composer_with("hello");

        let outcome = composer.handle_key(&key(KeyCode::Enter, KeyModifiers::SHIFT));

        assert_eq!(outcome, KeyOutcome::Edited);
        assert_eq!(composer.draft(), "hello\n");
    }

    #[test]
    fn alt_enter_also_inserts_newline() {
        let mut composer = composer_with("a");
        assert_eq!(
            composer.handle_key(&key(KeyCode::Enter, KeyModifiers::ALT)),
            KeyOutcome::Edited
        );
        assert_eq!(composer.draft(), "a\n");
    }

    #[test]
    fn typing_and_backspace_edit_the_draft() {
        let mut composer = Composer::new();
        for ch in "hé!".chars() {
            composer.handle_key(&key(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        composer.handle_key(&key(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(composer.draft(), "hé");

        assert_eq!(
            composer.handle_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyOutcome::Ignored
        );
        assert_eq!(composer.draft(), "hé");
    }

    #[test]
    fn key_release_is_ignored() {
        let mut composer = composer_with("x");
        let mut release = key(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(composer.handle_key(&release), KeyOutcome::Ignored);
    }

    #[test]
    fn example_submission_overrides_draft() {
        let mut composer = composer_with("draft text");
        let intent = composer.submit_example("Make a space invaders game");
        assert_eq!(
            intent,
            ComposerIntent::Send {
                override_text: Some("Make a space invaders game".to_string())
            }
        );
        assert_eq!(composer.draft(), "draft text");
    }

    #[test]
    fn action_control_follows_draft_and_streaming() {
        let mut composer = Composer::new();
        assert_eq!(composer.action_control(), ActionControl::Hidden);
        assert_eq!(composer.activate_action_control(), None);

        composer.set_draft("hi");
        assert_eq!(composer.action_control(), ActionControl::Send);
        assert_eq!(
            composer.activate_action_control(),
            Some(ComposerIntent::Send {
                override_text: None
            })
        );

        composer.sync_status(true, false);
        assert_eq!(composer.action_control(), ActionControl::Stop);
        composer.set_draft("");
        assert_eq!(composer.action_control(), ActionControl::Stop);
        assert_eq!(composer.activate_action_control(), Some(ComposerIntent::Stop));
    }

    #[test]
    fn hint_appears_past_three_characters() {
        assert!(!composer_with("abc").show_hint());
        assert!(composer_with("abcd").show_hint());
        // Grapheme clusters, not bytes.
        assert!(!composer_with("ééé").show_hint());
    }

    #[test]
    fn enhance_requires_draft_and_idle_engine() {
        let mut composer = Composer::new();
        assert_eq!(composer.request_enhance(), None);

        composer.set_draft("make it better");
        assert_eq!(composer.request_enhance(), Some(ComposerIntent::Enhance));

        composer.sync_status(false, true);
        assert!(!composer.can_enhance());
        assert_eq!(composer.request_enhance(), None);
    }

    #[test]
    fn enhanced_indicator_lasts_until_next_edit_or_submit() {
        let mut composer = composer_with("draft");
        composer.apply_enhancement("a much better draft");
        assert!(composer.show_enhanced_indicator());

        composer.sync_status(false, true);
        assert!(!composer.show_enhanced_indicator());
        composer.sync_status(false, false);
        assert!(composer.show_enhanced_indicator());

        composer.insert_char('!');
        assert!(!composer.show_enhanced_indicator());

        composer.apply_enhancement("again");
        composer.submit();
        assert!(!composer.show_enhanced_indicator());
    }

    #[test]
    fn clear_after_send_empties_draft() {
        let mut composer = composer_with("sent");
        composer.clear_after_send();
        assert_eq!(composer.draft(), "");
        assert_eq!(composer.action_control(), ActionControl::Hidden);
    }
}
