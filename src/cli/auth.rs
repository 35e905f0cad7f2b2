use std::error::Error;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::credentials::{mask_secret, CredentialStorage, CredentialStore};
use crate::core::providers::{load_providers, Provider};

pub fn store_key(
    storage: Arc<dyn CredentialStorage>,
    provider: &Provider,
) -> Result<(), Box<dyn Error>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("Enter API key for {}: ", provider.display_name);
        io::stdout().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let key = line.trim();
    if key.is_empty() {
        return Err("API key cannot be empty".into());
    }

    let mut store = CredentialStore::new(storage);
    store.load();
    store.update(&provider.name, key)?;
    println!(
        "✅ Stored API key for {} ({})",
        provider.display_name,
        mask_secret(key)
    );
    Ok(())
}

pub fn remove_key(
    storage: Arc<dyn CredentialStorage>,
    provider: &Provider,
) -> Result<(), Box<dyn Error>> {
    let mut store = CredentialStore::new(storage);
    store.load();
    if store.get(&provider.name).is_empty() {
        println!("No API key stored for {}", provider.display_name);
        return Ok(());
    }
    store.remove(&provider.name)?;
    println!("✅ Removed API key for {}", provider.display_name);
    Ok(())
}

pub fn list_keys(config: &Config, storage: Arc<dyn CredentialStorage>) {
    let mut store = CredentialStore::new(storage);
    store.load();
    let lines = key_lines(&load_providers(config), &store);
    if lines.is_empty() {
        println!("No API keys stored.");
        return;
    }
    for line in lines {
        println!("{line}");
    }
}

/// Known providers first, in display order, then keys for providers no
/// longer configured.
fn key_lines(providers: &[Provider], store: &CredentialStore) -> Vec<String> {
    let keys = store.snapshot();
    let mut lines: Vec<String> = providers
        .iter()
        .filter_map(|p| {
            keys.get(&p.name)
                .map(|key| format!("  {}: {}", p.name, mask_secret(key)))
        })
        .collect();

    let mut orphans: Vec<_> = keys
        .iter()
        .filter(|(name, _)| !providers.iter().any(|p| &p.name == *name))
        .collect();
    orphans.sort();
    lines.extend(
        orphans
            .into_iter()
            .map(|(name, key)| format!("  {name}: {} (unknown provider)", mask_secret(key))),
    );
    lines
}
