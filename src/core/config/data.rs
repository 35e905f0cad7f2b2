use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A provider declared in config.toml. Shares its id namespace with the
/// built-ins; a matching id replaces the built-in entry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomProvider {
    pub id: String,
    pub display_name: String,
    pub base_url: String,
    pub mode: Option<String>,
}

/// Where per-provider API keys are persisted between runs.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackendKind {
    /// Platform keyring (Secret Service, Keychain, Windows Credential Manager)
    #[default]
    Keyring,
    /// A credentials.toml file next to config.toml
    File,
    /// Keys are kept for the lifetime of the process only
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    pub default_provider: Option<String>,
    #[serde(default)]
    pub default_models: HashMap<String, String>,
    #[serde(default)]
    pub custom_providers: Vec<CustomProvider>,
    /// Maximum number of model options shown per provider
    /// Key: provider id, matched case-insensitively (e.g., "openrouter")
    /// Value: option count (e.g., 500)
    /// Providers without an entry show every catalog model.
    pub display_limits: Option<HashMap<String, usize>>,
    /// Credential persistence backend; defaults to the platform keyring
    pub credential_backend: Option<CredentialBackendKind>,
    /// Canned prompts shown before the first message is sent
    pub example_prompts: Option<Vec<String>>,
}

pub const DEFAULT_EXAMPLE_PROMPTS: &[&str] = &[
    "Build a todo app in React using Tailwind",
    "Build a simple blog using Astro",
    "Create a cookie consent form using Material UI",
    "Make a space invaders game",
    "How do I center a div?",
];

/// Providers whose catalogs are large enough to need a display cap.
pub const DEFAULT_DISPLAY_LIMITS: &[(&str, usize)] = &[("openrouter", 500)];

/// `path` with the home directory shown as `~` on Unix.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        if let Some(relative) = home.as_deref().and_then(|home| path.strip_prefix(home).ok()) {
            return format!("~/{}", relative.display());
        }
    }

    path.display().to_string()
}
