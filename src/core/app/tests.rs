use super::*;
use crate::core::catalog::ModelEntry;
use crate::core::composer::ActionControl;
use crate::core::credentials::{CredentialMap, CredentialStorage, RecordPolicy, CREDENTIALS_RECORD};
use crate::utils::test_utils::{create_test_app, test_init, FakeEngine};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode, modifiers: KeyModifiers) -> AppAction {
    AppAction::Key {
        event: KeyEvent::new(code, modifiers),
    }
}

#[test]
fn new_app_selects_default_provider_and_its_first_model() {
    let (app, _, _) = create_test_app();
    assert_eq!(app.selection.provider_name(), Some("openai"));
    assert_eq!(app.selection.model(), "gpt-4");
    assert_eq!(app.panel().mode, PanelMode::Intro);
}

#[test]
fn changing_provider_recomputes_model_and_options() {
    let (mut app, _, _) = create_test_app();

    apply_action(
        &mut app,
        AppAction::ChangeProvider {
            provider: "groq".to_string(),
        },
    );

    let panel = app.panel();
    assert_eq!(panel.model, "llama3");
    assert_eq!(panel.model_options.len(), 1);
    assert_eq!(panel.model_options[0].label, "Llama 3");
}

#[test]
fn configured_default_model_wins_when_offered() {
    let storage = Arc::new(crate::core::credentials::MemoryStorage::new());
    let mut init = test_init(storage);
    init.catalog = Catalog::new(vec![
        ModelEntry::new("llama3", "Llama 3", "groq"),
        ModelEntry::new("mixtral", "Mixtral", "groq"),
    ]);
    init.default_models
        .insert("groq".to_string(), "mixtral".to_string());
    let engine = FakeEngine::default();
    let mut app = App::new(init, Box::new(engine.clone()), Box::new(engine));

    apply_action(
        &mut app,
        AppAction::ChangeProvider {
            provider: "groq".to_string(),
        },
    );
    assert_eq!(app.selection.model(), "mixtral");
}

#[test]
fn enter_sends_draft_once_with_selected_provider_key() {
    let (mut app, engine, _) = create_test_app();
    apply_actions(
        &mut app,
        [
            AppAction::ChangeApiKey {
                provider: "openai".to_string(),
                key: "sk-openai".to_string(),
            },
            AppAction::ChangeApiKey {
                provider: "groq".to_string(),
                key: "gsk-groq".to_string(),
            },
            AppAction::ChangeInput {
                text: "hello".to_string(),
            },
            key(KeyCode::Enter, KeyModifiers::NONE),
        ],
    );

    let state = engine.state();
    assert_eq!(state.sent.len(), 1);
    let request = &state.sent[0];
    assert_eq!(request.text, "hello");
    assert_eq!(request.override_text, None);
    assert_eq!(request.model, "gpt-4");
    assert_eq!(request.api_key, "sk-openai");
    drop(state);
    assert_eq!(app.composer.draft(), "hello");
}

#[test]
fn shift_enter_never_sends() {
    let (mut app, engine, _) = create_test_app();
    apply_actions(
        &mut app,
        [
            AppAction::ChangeInput {
                text: "line one".to_string(),
            },
            key(KeyCode::Enter, KeyModifiers::SHIFT),
        ],
    );

    assert!(engine.state().sent.is_empty());
    assert_eq!(app.composer.draft(), "line one\n");
}

#[test]
fn example_prompt_is_sent_verbatim() {
    let (mut app, engine, _) = create_test_app();
    apply_actions(
        &mut app,
        [
            AppAction::ChangeInput {
                text: "unrelated draft".to_string(),
            },
            AppAction::SubmitExample {
                text: "How do I center a div?".to_string(),
            },
        ],
    );

    let state = engine.state();
    assert_eq!(state.sent.len(), 1);
    assert_eq!(state.sent[0].text, "How do I center a div?");
    assert_eq!(
        state.sent[0].override_text.as_deref(),
        Some("How do I center a div?")
    );
    drop(state);
    assert_eq!(app.composer.draft(), "unrelated draft");
}

#[test]
fn empty_draft_is_not_sent() {
    let (mut app, engine, _) = create_test_app();
    apply_action(&mut app, AppAction::Submit);
    assert!(engine.state().sent.is_empty());
}

#[test]
fn send_completion_clears_draft_and_starts_conversation() {
    let (mut app, _, _) = create_test_app();
    apply_actions(
        &mut app,
        [
            AppAction::ChangeInput {
                text: "hi".to_string(),
            },
            AppAction::Submit,
            AppAction::SendCompleted,
        ],
    );

    let panel = app.panel();
    assert_eq!(panel.draft, "");
    assert!(panel.chat_started());
    assert_eq!(panel.messages.len(), 1);
    assert_eq!(panel.messages[0].content, "hi");
}

#[test]
fn control_switches_to_stop_while_streaming() {
    let (mut app, engine, _) = create_test_app();
    apply_action(
        &mut app,
        AppAction::ChangeInput {
            text: "hi".to_string(),
        },
    );
    assert_eq!(app.panel().action_control, ActionControl::Send);

    engine.state().streaming = true;
    apply_action(&mut app, AppAction::ActivateControl);

    assert_eq!(engine.state().stops, 1);
    assert!(engine.state().sent.is_empty());
    assert_eq!(app.panel().action_control, ActionControl::Stop);
    assert!(app.panel().streaming);
}

#[test]
fn send_is_suppressed_while_streaming() {
    let (mut app, engine, _) = create_test_app();
    engine.state().streaming = true;
    apply_actions(
        &mut app,
        [
            AppAction::ChangeInput {
                text: "again".to_string(),
            },
            AppAction::Submit,
        ],
    );
    assert!(engine.state().sent.is_empty());
}

#[test]
fn enhance_round_trip_sets_indicator_until_edit() {
    let (mut app, engine, _) = create_test_app();
    apply_actions(
        &mut app,
        [
            AppAction::ChangeInput {
                text: "todo app".to_string(),
            },
            AppAction::Enhance,
        ],
    );
    assert_eq!(engine.state().enhance_requests.len(), 1);
    assert_eq!(engine.state().enhance_requests[0].draft, "todo app");

    engine.state().enhancing = true;
    apply_action(&mut app, AppAction::Enhance);
    assert_eq!(engine.state().enhance_requests.len(), 1);
    assert!(app.panel().enhancing);
    assert!(!app.panel().can_enhance);

    engine.state().enhancing = false;
    apply_action(
        &mut app,
        AppAction::EnhanceCompleted {
            text: "Build a todo app in React using Tailwind".to_string(),
        },
    );
    let panel = app.panel();
    assert!(panel.enhanced);
    assert_eq!(panel.draft, "Build a todo app in React using Tailwind");

    apply_action(&mut app, key(KeyCode::Char('!'), KeyModifiers::NONE));
    assert!(!app.panel().enhanced);
}

#[test]
fn enhance_failure_is_reported_on_status_line() {
    let (mut app, _, _) = create_test_app();
    apply_action(
        &mut app,
        AppAction::EnhanceFailed {
            error: "timeout".to_string(),
        },
    );
    assert_eq!(app.status(), Some("Prompt enhancement failed: timeout"));
    apply_action(&mut app, AppAction::ClearStatus);
    assert_eq!(app.status(), None);
}

#[test]
fn api_key_write_failure_keeps_key_and_reports() {
    let (mut app, _, storage) = create_test_app();
    storage.fail_writes(true);

    apply_action(
        &mut app,
        AppAction::ChangeApiKey {
            provider: "openai".to_string(),
            key: "sk-1".to_string(),
        },
    );

    assert_eq!(app.panel().api_key, "sk-1");
    assert!(app
        .status()
        .is_some_and(|status| status.contains("kept for this session only")));
}

#[test]
fn panel_shows_key_of_selected_provider_only() {
    let (mut app, _, _) = create_test_app();
    apply_action(
        &mut app,
        AppAction::ChangeApiKey {
            provider: "groq".to_string(),
            key: "gsk-1".to_string(),
        },
    );
    assert_eq!(app.panel().api_key, "");

    apply_action(
        &mut app,
        AppAction::ChangeProvider {
            provider: "groq".to_string(),
        },
    );
    assert_eq!(app.panel().api_key, "gsk-1");
}

#[test]
fn catalog_load_replaces_options() {
    let (mut app, _, _) = create_test_app();
    let before = app.panel().options_key.clone();

    apply_action(
        &mut app,
        AppAction::CatalogLoaded {
            entries: vec![
                ModelEntry::new("gpt-4o", "GPT-4o", "openai"),
                ModelEntry::new("gpt-4", "GPT-4", "openai"),
            ],
        },
    );

    let panel = app.panel();
    assert_ne!(panel.options_key, &before);
    assert_eq!(panel.model_options.len(), 2);
    assert_eq!(panel.model, "gpt-4");
}

#[test]
fn catalog_failure_keeps_previous_catalog() {
    let (mut app, _, _) = create_test_app();
    apply_action(
        &mut app,
        AppAction::CatalogLoadFailed {
            error: "offline".to_string(),
        },
    );
    assert_eq!(app.panel().model_options.len(), 1);
    assert_eq!(app.status(), Some("Could not refresh models: offline"));
}

#[test]
fn refresh_action_yields_command() {
    let (mut app, _, _) = create_test_app();
    let command = apply_action(&mut app, AppAction::RefreshCatalog);
    assert!(matches!(command, Some(AppCommand::RefreshCatalog)));
}

#[test]
fn startup_loads_credentials_then_catalog() {
    let (app, _, storage) = create_test_app();
    storage
        .set(CREDENTIALS_RECORD, "{\"openai\":\"sk-stored\"}", &RecordPolicy::default())
        .expect("seed");

    let commands = app.startup_commands();
    assert_eq!(commands.len(), 2);
    match &commands[0] {
        AppCommand::LoadCredentials { storage } => {
            let keys = CredentialStore::read_persisted(storage.as_ref());
            assert_eq!(keys.get("openai").map(String::as_str), Some("sk-stored"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
    assert!(matches!(commands[1], AppCommand::RefreshCatalog));
}

#[test]
fn closed_view_ignores_late_results() {
    let (mut app, _, _) = create_test_app();
    app.close();

    let mut keys = CredentialMap::new();
    keys.insert("openai".to_string(), "sk-late".to_string());
    apply_actions(
        &mut app,
        [
            AppAction::CredentialsLoaded { keys },
            AppAction::CatalogLoaded {
                entries: Vec::new(),
            },
        ],
    );

    assert_eq!(app.credentials.get("openai"), "");
    assert_eq!(app.selection.catalog().len(), 2);
}

#[test]
fn visibility_flag_passes_through() {
    let (mut app, _, _) = create_test_app();
    assert!(app.panel().visible);
    apply_action(&mut app, AppAction::SetVisible { visible: false });
    assert!(!app.panel().visible);
}

#[test]
fn model_change_is_accepted_verbatim() {
    let (mut app, _, _) = create_test_app();
    apply_action(
        &mut app,
        AppAction::ChangeModel {
            model: "gpt-5-preview".to_string(),
        },
    );
    assert_eq!(app.panel().model, "gpt-5-preview");
}

#[test]
fn startup_catalog_fills_empty_model_with_configured_default() {
    let storage = Arc::new(crate::core::credentials::MemoryStorage::new());
    let mut init = test_init(storage);
    init.catalog = Catalog::default();
    init.default_models
        .insert("openai".to_string(), "gpt-4o".to_string());
    let engine = FakeEngine::default();
    let mut app = App::new(init, Box::new(engine.clone()), Box::new(engine.clone()));
    assert_eq!(app.selection.model(), "");

    apply_actions(
        &mut app,
        [
            AppAction::CatalogLoaded {
                entries: vec![
                    ModelEntry::new("gpt-4", "GPT-4", "openai"),
                    ModelEntry::new("gpt-4o", "GPT-4o", "openai"),
                ],
            },
            AppAction::ChangeInput {
                text: "hi".to_string(),
            },
            AppAction::Submit,
        ],
    );

    assert_eq!(app.panel().model_options.len(), 2);
    assert_eq!(app.selection.model(), "gpt-4o");
    assert_eq!(engine.state().sent[0].model, "gpt-4o");
}

#[test]
fn startup_catalog_without_default_picks_first_entry() {
    let storage = Arc::new(crate::core::credentials::MemoryStorage::new());
    let mut init = test_init(storage);
    init.catalog = Catalog::default();
    let engine = FakeEngine::default();
    let mut app = App::new(init, Box::new(engine.clone()), Box::new(engine));

    apply_action(
        &mut app,
        AppAction::CatalogLoaded {
            entries: vec![
                ModelEntry::new("gpt-4", "GPT-4", "openai"),
                ModelEntry::new("gpt-4o", "GPT-4o", "openai"),
            ],
        },
    );
    assert_eq!(app.selection.model(), "gpt-4");
}

#[test]
fn catalog_refresh_keeps_chosen_model() {
    let (mut app, _, _) = create_test_app();
    apply_actions(
        &mut app,
        [
            AppAction::ChangeModel {
                model: "custom-model".to_string(),
            },
            AppAction::CatalogLoaded {
                entries: vec![ModelEntry::new("gpt-4o", "GPT-4o", "openai")],
            },
        ],
    );
    assert_eq!(app.selection.model(), "custom-model");
}

#[test]
fn provider_reload_reselects_when_selected_provider_disappears() {
    let (mut app, _, _) = create_test_app();
    apply_action(
        &mut app,
        AppAction::ChangeProvider {
            provider: "groq".to_string(),
        },
    );

    apply_action(
        &mut app,
        AppAction::ProvidersChanged {
            providers: vec![Provider::new("groq", "Groq Cloud")],
        },
    );
    assert_eq!(app.panel().provider.map(|p| p.display_name.as_str()), Some("Groq Cloud"));
    assert_eq!(app.selection.model(), "llama3");

    apply_action(
        &mut app,
        AppAction::ProvidersChanged {
            providers: vec![Provider::new("openai", "OpenAI")],
        },
    );
    assert_eq!(app.selection.provider_name(), Some("openai"));
    assert_eq!(app.selection.model(), "gpt-4");
    assert_eq!(app.panel().providers.len(), 1);
}
