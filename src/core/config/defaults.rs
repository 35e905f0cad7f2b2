use crate::core::config::data::{
    Config, CredentialBackendKind, DEFAULT_DISPLAY_LIMITS, DEFAULT_EXAMPLE_PROMPTS,
};
use crate::core::selection::DisplayLimitPolicy;

impl Config {
    pub fn get_default_model(&self, provider: &str) -> Option<&String> {
        let normalized = provider.to_lowercase();
        self.default_models
            .get(&normalized)
            .or_else(|| self.default_models.get(provider))
    }

    pub fn set_default_model(&mut self, provider: String, model: String) {
        let normalized = provider.to_lowercase();
        self.default_models.insert(normalized.clone(), model);
        if normalized != provider {
            self.default_models.remove(&provider);
        }
    }

    pub fn unset_default_model(&mut self, provider: &str) {
        let normalized = provider.to_lowercase();
        self.default_models.remove(&normalized);
        if normalized != provider {
            self.default_models.remove(provider);
        }
    }

    /// Display limits from the config, or the shipped defaults when the
    /// config does not mention any. An explicit empty table disables every
    /// limit.
    pub fn display_limit_policy(&self) -> DisplayLimitPolicy {
        match &self.display_limits {
            Some(limits) => limits
                .iter()
                .fold(DisplayLimitPolicy::unlimited(), |policy, (provider, max)| {
                    policy.with_limit(provider, *max)
                }),
            None => DEFAULT_DISPLAY_LIMITS
                .iter()
                .fold(DisplayLimitPolicy::unlimited(), |policy, (provider, max)| {
                    policy.with_limit(provider, *max)
                }),
        }
    }

    pub fn credential_backend(&self) -> CredentialBackendKind {
        self.credential_backend.unwrap_or_default()
    }

    pub fn example_prompts(&self) -> Vec<String> {
        match &self.example_prompts {
            Some(prompts) => prompts.clone(),
            None => DEFAULT_EXAMPLE_PROMPTS
                .iter()
                .map(|prompt| prompt.to_string())
                .collect(),
        }
    }
}
