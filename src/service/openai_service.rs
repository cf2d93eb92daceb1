use async_trait::async_trait;

use crate::clients::openai_client;
use crate::models::message::ChatMessage;

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, ClientError>;
}

pub struct OpenAIService {
    api_key: String,
    model: String,
}

impl OpenAIService {
    pub fn new(api_key: String, model: String) -> Self {
        Self { api_key, model }
    }
}

#[async_trait]
impl ChatClient for OpenAIService {
    async fn complete(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<String, ClientError> {
        openai_client::chat_completion(system_prompt, history, &self.model, &self.api_key).await
    }
}
