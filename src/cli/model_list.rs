//! Model listing for a single provider.

use std::error::Error;
use std::sync::Arc;

use crate::core::catalog::{Catalog, CatalogSource, HttpCatalogSource, MergedCatalogSource};
use crate::core::config::Config;
use crate::core::credentials::{CredentialStorage, CredentialStore};
use crate::core::providers::{find_provider, load_providers};
use crate::core::selection::{ModelOption, SelectionController};

pub async fn list_models(
    config: &Config,
    storage: Arc<dyn CredentialStorage>,
    provider: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let providers = load_providers(config);
    let requested = provider
        .or(config.default_provider.as_deref())
        .or_else(|| providers.first().map(|p| p.name.as_str()))
        .ok_or("No providers configured")?;
    let provider = find_provider(&providers, requested)
        .cloned()
        .ok_or_else(|| format!("Unknown provider '{requested}'"))?;

    let mut store = CredentialStore::new(storage);
    store.load();
    let api_key = store.get(&provider.name).to_string();
    if api_key.is_empty() {
        eprintln!(
            "⚠️  No API key stored for {}. Run 'palaver auth {}' if the provider needs one.",
            provider.display_name, provider.name
        );
    }

    println!("🤖 Available Models for {}", provider.display_name);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    let default_model = config.get_default_model(&provider.name).cloned();
    if let Some(model) = &default_model {
        println!("🎯 Default model for this provider: {model} (from config)");
        println!();
    }

    let source = HttpCatalogSource::new(reqwest::Client::new(), provider.clone(), api_key);
    let entries = source.refresh().await?;
    let total = entries.len();

    let mut selection = SelectionController::new(
        providers,
        Catalog::new(entries),
        config.display_limit_policy(),
    );
    selection.set_provider(&provider.name);

    if total == 0 {
        println!("No models found for this provider.");
        return Ok(());
    }

    let options = selection.model_options();
    if options.len() < total {
        println!("Showing {} of {total} models (newest first):", options.len());
    } else {
        println!("Found {total} models (newest first):");
    }
    println!();
    for line in model_lines(options, default_model.as_deref()) {
        println!("{line}");
    }
    Ok(())
}

/// Lists the models of every provider with a stored key. Providers whose
/// request fails are skipped.
pub async fn list_all_models(
    config: &Config,
    storage: Arc<dyn CredentialStorage>,
) -> Result<(), Box<dyn Error>> {
    let providers = load_providers(config);
    let mut store = CredentialStore::new(storage);
    store.load();

    let client = reqwest::Client::new();
    let sources: Vec<Box<dyn CatalogSource>> = providers
        .iter()
        .filter(|p| !store.get(&p.name).is_empty())
        .map(|p| -> Box<dyn CatalogSource> {
            Box::new(HttpCatalogSource::new(
                client.clone(),
                p.clone(),
                store.get(&p.name),
            ))
        })
        .collect();
    if sources.is_empty() {
        println!("No API keys stored. Run 'palaver auth PROVIDER' first.");
        return Ok(());
    }

    let catalog = Catalog::new(MergedCatalogSource::new(sources).refresh().await?);
    let mut selection =
        SelectionController::new(providers.clone(), catalog, config.display_limit_policy());
    for provider in &providers {
        if selection.catalog().for_provider(&provider.name).next().is_none() {
            continue;
        }
        selection.set_provider(&provider.name);
        println!("🤖 {}", provider.display_name);
        let default_model = config.get_default_model(&provider.name).map(String::as_str);
        for line in model_lines(selection.model_options(), default_model) {
            println!("{line}");
        }
        println!();
    }
    Ok(())
}

fn model_lines(options: &[ModelOption], default_model: Option<&str>) -> Vec<String> {
    options
        .iter()
        .map(|option| {
            let marker = if default_model == Some(option.value.as_str()) {
                "*"
            } else {
                " "
            };
            if option.label == option.value {
                format!("{marker} {}", option.value)
            } else {
                format!("{marker} {}  ({})", option.value, option.label)
            }
        })
        .collect()
}
