use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::app::{App, AppInitConfig};
use crate::core::catalog::{Catalog, ModelEntry};
use crate::core::credentials::MemoryStorage;
use crate::core::engine::{EnhanceEngine, EnhanceRequest, SendEngine, SendRequest};
use crate::core::message::Message;
use crate::core::providers::Provider;
use crate::core::selection::DisplayLimitPolicy;

/// Observable state shared between a test and the engines it handed to an
/// [`App`].
#[derive(Default)]
pub struct FakeEngineState {
    pub sent: Vec<SendRequest>,
    pub stops: usize,
    pub enhance_requests: Vec<EnhanceRequest>,
    pub streaming: bool,
    pub enhancing: bool,
    pub started: bool,
    pub messages: Vec<Message>,
}

#[derive(Clone, Default)]
pub struct FakeEngine {
    state: Arc<Mutex<FakeEngineState>>,
    /// Copy of `state.messages` so `messages()` can hand out a slice.
    messages: Vec<Message>,
}

impl FakeEngine {
    pub fn state(&self) -> MutexGuard<'_, FakeEngineState> {
        self.state.lock().expect("fake engine state")
    }
}

impl SendEngine for FakeEngine {
    fn send(&mut self, request: SendRequest) {
        let messages = {
            let mut state = self.state();
            state.started = true;
            state.messages.push(Message::user(request.text.clone()));
            state.sent.push(request);
            state.messages.clone()
        };
        self.messages = messages;
    }

    fn stop(&mut self) {
        self.state().stops += 1;
    }

    fn is_streaming(&self) -> bool {
        self.state().streaming
    }

    fn has_started(&self) -> bool {
        self.state().started
    }

    fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl EnhanceEngine for FakeEngine {
    fn enhance(&mut self, request: EnhanceRequest) {
        self.state().enhance_requests.push(request);
    }

    fn is_enhancing(&self) -> bool {
        self.state().enhancing
    }
}

pub fn test_providers() -> Vec<Provider> {
    vec![
        Provider::new("openai", "OpenAI"),
        Provider::new("groq", "Groq"),
        Provider::new("openrouter", "OpenRouter"),
    ]
}

pub fn test_catalog() -> Catalog {
    Catalog::new(vec![
        ModelEntry::new("gpt-4", "GPT-4", "openai"),
        ModelEntry::new("llama3", "Llama 3", "groq"),
    ])
}

pub fn test_init(storage: Arc<MemoryStorage>) -> AppInitConfig {
    AppInitConfig {
        providers: test_providers(),
        catalog: test_catalog(),
        limits: DisplayLimitPolicy::unlimited(),
        default_provider: Some("openai".to_string()),
        default_models: Default::default(),
        example_prompts: vec![
            "Make a space invaders game".to_string(),
            "How do I center a div?".to_string(),
        ],
        storage,
    }
}

/// An app on the test catalog with `openai` selected, plus handles to its
/// storage and engine.
pub fn create_test_app() -> (App, FakeEngine, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let engine = FakeEngine::default();
    let app = App::new(
        test_init(storage.clone()),
        Box::new(engine.clone()),
        Box::new(engine.clone()),
    );
    (app, engine, storage)
}
