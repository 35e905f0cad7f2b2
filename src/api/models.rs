use crate::api::{ModelInfo, ModelsResponse};
use crate::core::catalog::{CatalogError, ModelEntry};

/// `{base_url}/models` without a doubled slash when the base ends in `/`.
fn models_url(base_url: &str) -> String {
    format!("{}/models", base_url.trim_end_matches('/'))
}

pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    anthropic_mode: bool,
) -> Result<ModelsResponse, CatalogError> {
    let mut request = client
        .get(models_url(base_url))
        .header("Content-Type", "application/json");

    if anthropic_mode {
        request = request
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01");
    } else if !api_key.is_empty() {
        request = request.header("Authorization", format!("Bearer {api_key}"));
    }

    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json::<ModelsResponse>().await?)
}

pub fn sort_models(models: &mut [ModelInfo]) {
    // Newest first; OpenAI-style `created` wins over Anthropic-style `created_at`,
    // and undated models sort after dated ones by descending id.
    models.sort_by(|a, b| {
        match (&a.created, &b.created, &a.created_at, &b.created_at) {
            (Some(a_created), Some(b_created), _, _) => b_created.cmp(a_created),
            (Some(_), None, _, _) => std::cmp::Ordering::Less,
            (None, Some(_), _, _) => std::cmp::Ordering::Greater,
            (None, None, Some(a_created_at), Some(b_created_at)) => {
                b_created_at.cmp(a_created_at)
            }
            (None, None, Some(_), None) => std::cmp::Ordering::Less,
            (None, None, None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None, None, None) => b.id.cmp(&a.id),
        }
    });
}

/// Maps a sorted models response onto catalog entries owned by `provider`.
pub fn into_catalog_entries(provider: &str, response: ModelsResponse) -> Vec<ModelEntry> {
    let mut models = response.data;
    sort_models(&mut models);
    models
        .into_iter()
        .map(|info| ModelEntry {
            label: info.display_name.unwrap_or_default(),
            name: info.id,
            provider: provider.to_string(),
        })
        .collect()
}
