mod auth;
mod model_list;
mod provider_list;

use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::core::config::data::CredentialBackendKind;
use crate::core::config::Config;
use crate::core::credentials::{CredentialStorage, FileStorage, KeyringStorage, MemoryStorage};
use crate::core::providers::{find_provider, load_providers, Provider};
use crate::utils::logging::init_tracing;

const CREDENTIALS_FILE: &str = "credentials.toml";

#[derive(Parser)]
#[command(name = "palaver")]
#[command(about = "Provider, model and API key management for terminal AI chat")]
#[command(
    long_about = "Palaver keeps track of the AI providers you chat with, the models they offer \
and the API keys you use for them.\n\n\
Keys are stored in the system keyring by default. Set credential_backend = \"file\" in the \
config file to keep them in a file next to it instead.\n\n\
Environment Variables:\n\
  PALAVER_LOG       Log filter directives, e.g. debug or palaver=trace (default: warn)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured providers (default)
    Providers,
    /// List the models a provider offers
    Models {
        /// Provider to list models for; defaults to the configured default provider
        #[arg(short = 'p', long)]
        provider: Option<String>,
        /// List models of every provider that has a stored key
        #[arg(long, conflicts_with = "provider")]
        all: bool,
    },
    /// Store an API key for a provider, read from stdin
    Auth { provider: String },
    /// Remove the stored API key for a provider
    Deauth { provider: String },
    /// List stored API keys, masked
    Keys,
    /// Show the current configuration
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (`default-model` takes a provider and a model)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
        /// Provider, for `default-model`
        value: Option<String>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = Config::load()?;

    match args.command.unwrap_or(Commands::Providers) {
        Commands::Providers => {
            let storage = open_storage(&config)?;
            provider_list::list_providers(&config, storage);
            Ok(())
        }
        Commands::Models { provider, all } => {
            let storage = open_storage(&config)?;
            if all {
                model_list::list_all_models(&config, storage).await
            } else {
                model_list::list_models(&config, storage, provider.as_deref()).await
            }
        }
        Commands::Auth { provider } => {
            let provider = resolve_provider(&config, &provider)?;
            auth::store_key(open_storage(&config)?, &provider)
        }
        Commands::Deauth { provider } => {
            let provider = resolve_provider(&config, &provider)?;
            auth::remove_key(open_storage(&config)?, &provider)
        }
        Commands::Keys => {
            auth::list_keys(&config, open_storage(&config)?);
            Ok(())
        }
        Commands::Config => {
            config.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            match key.as_str() {
                "default-provider" => {
                    let Some(name) = value.first() else {
                        config.print_all();
                        return Ok(());
                    };
                    let provider = resolve_provider(&config, name)?;
                    config.default_provider = Some(provider.name.clone());
                    config.save()?;
                    println!("✅ Set default-provider to: {}", provider.name);
                }
                "default-model" => {
                    if value.len() < 2 {
                        eprintln!("⚠️  To set a default model, specify the provider and model:");
                        eprintln!("Example: palaver set default-model openai gpt-4o");
                        return Ok(());
                    }
                    let provider = resolve_provider(&config, &value[0])?;
                    let model = value[1..].join(" ");
                    config.set_default_model(provider.name.clone(), model.clone());
                    config.save()?;
                    println!(
                        "✅ Set default-model for provider '{}' to: {model}",
                        provider.name
                    );
                }
                _ => return Err(format!("Unknown config key: {key}").into()),
            }
            Ok(())
        }
        Commands::Unset { key, value } => {
            match key.as_str() {
                "default-provider" => {
                    config.default_provider = None;
                    config.save()?;
                    println!("✅ Unset default-provider");
                }
                "default-model" => {
                    let Some(provider) = value else {
                        eprintln!("⚠️  To unset a default model, specify the provider:");
                        eprintln!("Example: palaver unset default-model openai");
                        return Ok(());
                    };
                    config.unset_default_model(&provider);
                    config.save()?;
                    println!("✅ Unset default-model for provider: {provider}");
                }
                _ => return Err(format!("Unknown config key: {key}").into()),
            }
            Ok(())
        }
    }
}

/// Builds the credential backend the config asks for.
pub fn open_storage(config: &Config) -> Result<Arc<dyn CredentialStorage>, Box<dyn Error>> {
    let storage: Arc<dyn CredentialStorage> = match config.credential_backend() {
        CredentialBackendKind::Keyring => Arc::new(KeyringStorage::new()),
        CredentialBackendKind::File => {
            Arc::new(FileStorage::new(Config::config_dir()?.join(CREDENTIALS_FILE)))
        }
        CredentialBackendKind::Memory => Arc::new(MemoryStorage::new()),
    };
    Ok(storage)
}

fn resolve_provider(config: &Config, name: &str) -> Result<Provider, Box<dyn Error>> {
    let providers = load_providers(config);
    find_provider(&providers, name).cloned().ok_or_else(|| {
        format!("Unknown provider '{name}'. Run 'palaver providers' to see the configured ones.")
            .into()
    })
}
