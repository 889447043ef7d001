//! VLM interaction: build the vision message and call the provider.
//!
//! The batch logic in [`crate::convert::images`] only sees the
//! [`Transcriber`] trait, so it can be driven by a fake in tests.
//! [`VisionTranscriber`] is the real implementation on top of `edgequake-llm`.
//!
//! There is deliberately no retry here: a failed call propagates and aborts
//! the batch at that image.

use crate::config::{MarkdownConfig, DEFAULT_PROVIDER};
use crate::error::DocToolsError;
use crate::prompts::{MARKDOWN_SYSTEM_PROMPT, MARKDOWN_USER_INSTRUCTION};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// Markdown produced for one image, with token accounting when available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcription {
    pub markdown: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl Transcription {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            ..Default::default()
        }
    }
}

/// Turns one encoded image into Markdown.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, image: ImageData) -> Result<Transcription, DocToolsError>;
}

/// [`Transcriber`] backed by a hosted multimodal model.
pub struct VisionTranscriber {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    temperature: f32,
    max_tokens: usize,
}

impl VisionTranscriber {
    /// Wrap an existing provider using the prompt and sampling settings of `config`.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &MarkdownConfig) -> Self {
        Self {
            provider,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| MARKDOWN_SYSTEM_PROMPT.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Resolve the provider described by `config` and wrap it.
    pub fn from_config(config: &MarkdownConfig) -> Result<Self, DocToolsError> {
        let provider = resolve_provider(config)?;
        Ok(Self::new(provider, config))
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }
}

#[async_trait]
impl Transcriber for VisionTranscriber {
    async fn transcribe(&self, image: ImageData) -> Result<Transcription, DocToolsError> {
        let messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user_with_images(MARKDOWN_USER_INSTRUCTION, vec![image]),
        ];

        let response = self
            .provider
            .chat(&messages, Some(&self.options()))
            .await
            .map_err(|e| DocToolsError::LlmApiError {
                message: e.to_string(),
            })?;

        debug!(
            "{} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        Ok(Transcription {
            markdown: response.content,
            input_tokens: response.prompt_tokens as usize,
            output_tokens: response.completion_tokens as usize,
        })
    }
}

/// Pick the provider name to use when no pre-built provider is configured.
///
/// Explicit config wins, then `EDGEQUAKE_LLM_PROVIDER`, then [`DEFAULT_PROVIDER`].
pub fn provider_name_for(config: &MarkdownConfig, env_provider: Option<String>) -> String {
    config
        .provider_name
        .clone()
        .filter(|p| !p.is_empty())
        .or(env_provider.filter(|p| !p.is_empty()))
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string())
}

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) is used as-is.
/// 2. **Named provider** (`config.provider_name`, else `EDGEQUAKE_LLM_PROVIDER`,
///    else `gemini`) is created through [`ProviderFactory::create_llm_provider`]
///    with `config.model`; the factory reads the matching API key
///    (`GEMINI_API_KEY`, `OPENAI_API_KEY`, …) from the environment.
pub fn resolve_provider(config: &MarkdownConfig) -> Result<Arc<dyn LLMProvider>, DocToolsError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let name = provider_name_for(config, std::env::var("EDGEQUAKE_LLM_PROVIDER").ok());
    debug!("Creating provider '{}' with model '{}'", name, config.model);

    ProviderFactory::create_llm_provider(&name, &config.model).map_err(|e| {
        DocToolsError::ProviderNotConfigured {
            provider: name.clone(),
            hint: format!(
                "{e}\nSet the provider's API key (e.g. GEMINI_API_KEY) in the environment or a .env file."
            ),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name_precedence() {
        let mut config = MarkdownConfig::default();
        assert_eq!(provider_name_for(&config, None), "gemini");
        assert_eq!(provider_name_for(&config, Some("openai".into())), "openai");
        assert_eq!(provider_name_for(&config, Some(String::new())), "gemini");

        config.provider_name = Some("anthropic".into());
        assert_eq!(provider_name_for(&config, Some("openai".into())), "anthropic");
    }

    #[test]
    fn transcription_new_has_zero_tokens() {
        let t = Transcription::new("# Title");
        assert_eq!(t.markdown, "# Title");
        assert_eq!((t.input_tokens, t.output_tokens), (0, 0));
    }
}
