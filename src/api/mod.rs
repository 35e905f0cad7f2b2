use serde::Deserialize;

/// One entry of an OpenAI-compatible `GET /models` response.
#[derive(Deserialize, Debug, Clone)]
pub struct ModelInfo {
    pub id: String,
    pub created: Option<u64>,
    pub created_at: Option<String>,
    pub owned_by: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ModelsResponse {
    pub data: Vec<ModelInfo>,
}

pub mod models;
