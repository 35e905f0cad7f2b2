//! Providers shipped with the binary, parsed once from the embedded
//! `builtin_providers.toml`.

use std::sync::OnceLock;

use serde::Deserialize;
use tracing::warn;

use crate::core::providers::Provider;

const BUILTIN_PROVIDERS_TOML: &str = include_str!("../builtin_providers.toml");

#[derive(Deserialize)]
struct ProviderTable {
    providers: Vec<ProviderRow>,
}

#[derive(Deserialize)]
struct ProviderRow {
    id: String,
    display_name: String,
    base_url: String,
    #[serde(default)]
    mode: Option<String>,
}

impl From<ProviderRow> for Provider {
    fn from(row: ProviderRow) -> Self {
        Provider {
            name: row.id,
            display_name: row.display_name,
            base_url: row.base_url,
            mode: row.mode,
        }
    }
}

fn parse_providers(contents: &str) -> Result<Vec<Provider>, toml::de::Error> {
    let table: ProviderTable = toml::from_str(contents)?;
    Ok(table.providers.into_iter().map(Provider::from).collect())
}

/// Built-in providers in file order. An unparsable table yields none.
pub fn builtin_providers() -> &'static [Provider] {
    static PROVIDERS: OnceLock<Vec<Provider>> = OnceLock::new();
    PROVIDERS.get_or_init(|| {
        parse_providers(BUILTIN_PROVIDERS_TOML).unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring malformed built-in provider table");
            Vec::new()
        })
    })
}
