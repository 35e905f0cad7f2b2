use crate::core::builtin_providers::builtin_providers;
use crate::core::config::Config;

/// A backend source of language models.
///
/// Only `name` takes part in selection; the remaining fields travel with the
/// provider so collaborators (catalog source, send engine) can reach it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provider {
    pub name: String,
    pub display_name: String,
    pub base_url: String,
    pub mode: Option<String>,
}

impl Provider {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            base_url: String::new(),
            mode: None,
        }
    }

    pub fn is_anthropic_mode(&self) -> bool {
        self.mode.as_deref() == Some("anthropic")
    }
}

/// Known providers in display order: built-ins first, then custom
/// providers from the config. A custom provider whose id collides with a
/// built-in replaces it in place.
pub fn load_providers(config: &Config) -> Vec<Provider> {
    let mut providers = builtin_providers().to_vec();

    for custom in &config.custom_providers {
        let provider = Provider {
            name: custom.id.clone(),
            display_name: custom.display_name.clone(),
            base_url: custom.base_url.clone(),
            mode: custom.mode.clone(),
        };
        match providers
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&custom.id))
        {
            Some(existing) => *existing = provider,
            None => providers.push(provider),
        }
    }

    providers
}

/// Looks a provider up by name, preferring an exact match over a
/// case-insensitive one.
pub fn find_provider<'a>(providers: &'a [Provider], name: &str) -> Option<&'a Provider> {
    providers
        .iter()
        .find(|p| p.name == name)
        .or_else(|| providers.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
}
