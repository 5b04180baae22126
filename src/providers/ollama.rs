use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::BackendConfig;
use crate::errors::BackendError;
use crate::language_utils::language_name;
use crate::providers::TranslationBackend;
use crate::translation::protocol::{parse_batch_response, wrap_segments, BatchParse};

/// Normalize an endpoint string into a scheme-qualified base URL.
///
/// Bare host[:port] forms get an http scheme; a malformed endpoint falls back
/// to the local default rather than failing construction.
fn parse_endpoint(endpoint: &str) -> String {
    let candidate = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    match url::Url::parse(&candidate) {
        Ok(parsed) if parsed.host_str().is_some() => {
            candidate.trim_end_matches('/').to_string()
        }
        _ => {
            warn!("Malformed endpoint '{}', using http://localhost:11434", endpoint);
            "http://localhost:11434".to_string()
        }
    }
}

/// Ollama client for interacting with a local Ollama API server
#[derive(Debug)]
pub struct OllamaClient {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model name to request
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Number of attempts per request
    attempts: u32,
    /// Base backoff in seconds, multiplied by the attempt number
    backoff_base_secs: f64,
    /// Fraction of markers that must be recovered to accept a batch response
    partial_accept_ratio: f64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    /// Model name to use for generation
    model: &'a str,
    /// Prompt to generate from
    prompt: String,
    /// Whether to stream the response
    stream: bool,
    /// How long to keep the model loaded, when unloading
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    /// Generated text
    #[serde(default)]
    response: String,
}

/// Model listing response from /api/tags
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from the backend configuration.
    pub fn new(config: &BackendConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .unwrap_or_default();

        Self {
            base_url: parse_endpoint(&config.endpoint),
            model: config.model.clone(),
            client,
            attempts: config.attempts.max(1),
            backoff_base_secs: config.backoff_base_secs,
            partial_accept_ratio: 0.8,
        }
    }

    /// Override the partial-acceptance threshold for batch responses.
    pub fn with_partial_accept_ratio(mut self, ratio: f64) -> Self {
        self.partial_accept_ratio = ratio;
        self
    }

    fn gen_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn display_name(lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("English");
        language_name(lang).unwrap_or_else(|_| lang.to_string())
    }

    /// Prompt for the translategemma model family, which expects an explicit
    /// translator persona with language names and codes.
    fn build_translategemma_prompt(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> String {
        let src_name = Self::display_name(source_lang);
        let tgt_name = Self::display_name(Some(target_lang));
        let src_code = crate::language_utils::lang_code(source_lang.unwrap_or("English"));
        let tgt_code = crate::language_utils::lang_code(target_lang);
        format!(
            "You are a professional {src_name} ({src_code}) to {tgt_name} ({tgt_code}) translator. \
             Your goal is to accurately convey the meaning and nuances of the original {src_name} text \
             while adhering to {tgt_name} grammar, vocabulary, and cultural sensitivities. \
             Produce only the {tgt_name} translation, without any additional explanations or commentary. \
             Please translate the following {src_name} text into {tgt_name}:\n\n{text}"
        )
    }

    /// Rule-based prompt for generic instruction-following models.
    fn build_generic_prompt(&self, text: &str, target_lang: &str, source_lang: Option<&str>) -> String {
        let source = Self::display_name(source_lang);
        format!(
            "Task: Translate ONLY into {target_lang} from {source}.\n\
             Rules:\n\
             1) Output translation text ONLY (no source text, no notes, no questions, no language-detection remarks).\n\
             2) Preserve original line breaks.\n\
             3) Do NOT wrap in quotes or code blocks.\n\n\
             {text}"
        )
    }

    fn build_prompt(&self, text: &str, target_lang: &str, source_lang: Option<&str>) -> String {
        if self.model.to_lowercase().contains("translategemma") {
            self.build_translategemma_prompt(text, target_lang, source_lang)
        } else {
            self.build_generic_prompt(text, target_lang, source_lang)
        }
    }

    /// Batched prompt wrapping every unit in a numbered segment marker.
    fn build_batch_prompt(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> String {
        let combined = wrap_segments(texts);
        let source = Self::display_name(source_lang);
        format!(
            "Translate the following text from {source} to {target_lang}.\n\n\
             Rules:\n\
             1) Output translation text ONLY (no source text, no notes, no questions).\n\
             2) Preserve original line breaks within each segment.\n\
             3) Do NOT wrap in quotes or code blocks.\n\
             4) IMPORTANT: Keep the <<<SEG_N>>> markers in your output.\n\n\
             {combined}\n\n\
             Output format (keep all markers):\n\
             <<<SEG_0>>>\n[translation]\n<<<SEG_1>>>\n[translation]..."
        )
    }

    /// Send a generate request with the configured attempt/backoff loop.
    ///
    /// Server errors and transport failures retry; client errors fail fast.
    async fn generate(&self, prompt: String) -> Result<String, BackendError> {
        let url = self.gen_url("/api/generate");
        let request = GenerationRequest {
            model: &self.model,
            prompt,
            stream: false,
            keep_alive: None,
        };

        let mut last_error: Option<BackendError> = None;

        for attempt in 1..=self.attempts {
            match self.client.post(&url).json(&request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            BackendError::Transport(format!("Failed to read response body: {}", e))
                        })?;
                        match serde_json::from_str::<GenerationResponse>(&body) {
                            Ok(parsed) => return Ok(parsed.response.trim().to_string()),
                            Err(e) => {
                                error!(
                                    "Failed to parse Ollama response: {}. First 200 chars: {}",
                                    e,
                                    body.chars().take(200).collect::<String>()
                                );
                                last_error = Some(BackendError::Parse(e.to_string()));
                            }
                        }
                    } else if status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        let truncated: String = body.chars().take(180).collect();
                        warn!(
                            "Ollama API error ({}): {} - attempt {}/{}",
                            status, truncated, attempt, self.attempts
                        );
                        last_error = Some(BackendError::Api {
                            status: status.as_u16(),
                            message: truncated,
                        });
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        let truncated: String = body.chars().take(180).collect();
                        error!("Ollama API error ({}): {}", status, truncated);
                        return Err(BackendError::Api {
                            status: status.as_u16(),
                            message: truncated,
                        });
                    }
                }
                Err(e) => {
                    warn!(
                        "Ollama network error: {} - attempt {}/{}",
                        e, attempt, self.attempts
                    );
                    last_error = Some(BackendError::Transport(e.to_string()));
                }
            }

            if attempt < self.attempts {
                let backoff = Duration::from_secs_f64(self.backoff_base_secs * attempt as f64);
                tokio::time::sleep(backoff).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BackendError::Transport(format!("Request failed after {} attempts", self.attempts))
        }))
    }

    /// List model names available on the server.
    pub async fn list_models(&self) -> Result<Vec<String>, BackendError> {
        let url = self.gen_url("/api/tags");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: body.chars().take(180).collect(),
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Ask the server to release the model from memory.
    pub async fn unload_model(&self) -> Result<(), BackendError> {
        let url = self.gen_url("/api/generate");
        let request = GenerationRequest {
            model: &self.model,
            prompt: String::new(),
            stream: false,
            keep_alive: Some(0),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            debug!("Model {} unloaded", self.model);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::Api {
                status: status.as_u16(),
                message: body.chars().take(180).collect(),
            })
        }
    }
}

#[async_trait]
impl TranslationBackend for OllamaClient {
    async fn translate_once(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<String, BackendError> {
        let prompt = self.build_prompt(text, target_lang, source_lang);
        self.generate(prompt).await
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<Vec<String>, BackendError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.len() == 1 {
            let result = self.translate_once(&texts[0], target_lang, source_lang).await?;
            return Ok(vec![result]);
        }

        let prompt = self.build_batch_prompt(texts, target_lang, source_lang);
        let mut last_error: Option<BackendError> = None;

        for attempt in 1..=self.attempts {
            match self.generate(prompt.clone()).await {
                Ok(response) => {
                    match parse_batch_response(&response, texts.len(), self.partial_accept_ratio) {
                        BatchParse::Complete(results) => return Ok(results),
                        BatchParse::Partial(results) => {
                            let recovered = results.iter().filter(|r| !r.is_empty()).count();
                            warn!(
                                "Partial batch response accepted: {}/{} segments",
                                recovered,
                                texts.len()
                            );
                            return Ok(results);
                        }
                        BatchParse::Rejected => {
                            warn!(
                                "Batch response parse failed: expected {} segments. Attempt {}/{}",
                                texts.len(),
                                attempt,
                                self.attempts
                            );
                            last_error = Some(BackendError::Parse(format!(
                                "Batch parse failed: expected {} segments",
                                texts.len()
                            )));
                        }
                    }
                }
                Err(e) => last_error = Some(e),
            }

            if attempt < self.attempts {
                let backoff = Duration::from_secs_f64(self.backoff_base_secs * attempt as f64);
                tokio::time::sleep(backoff).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BackendError::Transport(format!("Batch request failed after {} attempts", self.attempts))
        }))
    }

    async fn health_check(&self) -> Result<String, BackendError> {
        let models = self.list_models().await?;
        let preview: Vec<&str> = models.iter().take(6).map(|s| s.as_str()).collect();
        let suffix = if models.len() > 6 { "..." } else { "" };
        Ok(format!("OK; models={}{}", preview.join(", "), suffix))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
