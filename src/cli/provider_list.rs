use std::sync::Arc;

use crate::core::config::Config;
use crate::core::credentials::{CredentialStorage, CredentialStore};
use crate::core::providers::load_providers;

pub fn list_providers(config: &Config, storage: Arc<dyn CredentialStorage>) {
    let mut store = CredentialStore::new(storage);
    store.load();

    let rows = provider_rows(config, &store);
    if rows.is_empty() {
        println!("No providers configured.");
        return;
    }

    println!("Configured Providers:");
    println!();
    for row in rows {
        println!("{row}");
    }
    if config.default_provider.is_some() {
        println!();
        println!("* = default provider");
    }
}

fn provider_rows(config: &Config, store: &CredentialStore) -> Vec<String> {
    let providers = load_providers(config);
    let id_width = providers
        .iter()
        .map(|p| p.name.len() + 1)
        .max()
        .unwrap_or(0);
    let name_width = providers
        .iter()
        .map(|p| p.display_name.len())
        .max()
        .unwrap_or(0);

    providers
        .iter()
        .map(|provider| {
            let is_default = config
                .default_provider
                .as_ref()
                .is_some_and(|d| d.eq_ignore_ascii_case(&provider.name));
            let id = if is_default {
                format!("{}*", provider.name)
            } else {
                provider.name.clone()
            };
            let auth_status = if store.get(&provider.name).is_empty() {
                "❌"
            } else {
                "✅"
            };
            format!(
                "  {id:<id_width$}  {:<name_width$}  {auth_status}  {}",
                provider.display_name, provider.base_url
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credentials::MemoryStorage;

    #[test]
    fn rows_mark_default_and_stored_keys() {
        let config = Config {
            default_provider: Some("Groq".to_string()),
            ..Config::default()
        };
        let mut store = CredentialStore::new(Arc::new(MemoryStorage::new()));
        store.update("openai", "sk-test").expect("update");

        let rows = provider_rows(&config, &store);

        let openai = rows.iter().find(|r| r.contains("OpenAI")).expect("openai row");
        assert!(openai.contains('✅'));
        let groq = rows.iter().find(|r| r.contains("groq*")).expect("groq row");
        assert!(groq.contains('❌'));
    }
}
