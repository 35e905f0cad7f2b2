use crate::core::config::data::{Config, CredentialBackendKind};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.default_provider {
            Some(provider) => println!("  default-provider: {provider}"),
            None => println!("  default-provider: (unset)"),
        }
        let backend = match self.credential_backend() {
            CredentialBackendKind::Keyring => "keyring",
            CredentialBackendKind::File => "file",
            CredentialBackendKind::Memory => "memory",
        };
        println!("  credential-backend: {backend}");
        if self.default_models.is_empty() {
            println!("  default-models: (none set)");
        } else {
            println!("  default-models:");
            for (provider, model) in &self.default_models {
                println!("    {provider}: {model}");
            }
        }
        let limits = self.display_limit_policy();
        if limits.is_unlimited() {
            println!("  display-limits: (none)");
        } else {
            println!("  display-limits:");
            for (provider, max) in limits.entries() {
                println!("    {provider}: {max}");
            }
        }
    }
}
