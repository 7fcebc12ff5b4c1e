use reason_ox_common::{AuthMethod, ChatRequest, ChatResponse, Message, RequestBuilder, RequestConfig};
use reqwest::header::HeaderMap;

use crate::{ClientConfig, GenerationOptions, ReasonOxError, prompts};

/// Client for the three reasoning calls against an OpenAI-compatible
/// chat-completion endpoint.
///
/// Every public call goes through the configured [`reason_ox_common::RetryPolicy`].
#[derive(Debug, Clone)]
pub struct ReasoningClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ReasoningClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client`, e.g. one with a timeout or proxy.
    pub fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Build a client from `LLM_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, ReasonOxError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request_builder(&self) -> RequestBuilder {
        let mut config = RequestConfig::new(self.config.endpoint().as_str())
            .with_auth(AuthMethod::Bearer(self.config.api_key().to_string()));

        if let Some(site_url) = self.config.site_url() {
            config = config.with_header("HTTP-Referer", site_url);
        }
        if let Some(site_name) = self.config.site_name() {
            config = config.with_header("X-Title", site_name);
        }

        RequestBuilder::new(self.client.clone(), config)
    }

    /// Headers sent with every request.
    ///
    /// # Errors
    ///
    /// [`ReasonOxError::InvalidHeader`] when the key or site settings contain
    /// characters not allowed in HTTP headers.
    pub fn build_headers(&self) -> Result<HeaderMap, ReasonOxError> {
        Ok(self.request_builder().headers()?)
    }

    pub fn build_payload(
        model: impl Into<String>,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> ChatRequest {
        ChatRequest::builder()
            .model(model)
            .messages(messages)
            .temperature(temperature)
            .max_tokens(max_tokens)
            .build()
    }

    /// Single POST without retries. Returns the trimmed content of the first choice.
    ///
    /// # Errors
    ///
    /// Transport and status errors as mapped from the request layer;
    /// [`ReasonOxError::EmptyResult`] when the first choice has no content.
    pub async fn send_once(&self, request: &ChatRequest) -> Result<String, ReasonOxError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion"
        );

        let response: ChatResponse = self.request_builder().post_json(request).await?;

        response
            .first_content()
            .map(|content| content.trim().to_string())
            .ok_or(ReasonOxError::EmptyResult)
    }

    /// [`Self::send_once`] under the configured retry policy.
    ///
    /// # Errors
    ///
    /// [`ReasonOxError::RetriesExhausted`] when every attempt failed with a
    /// retryable error, otherwise the first non-retryable error.
    pub async fn send(&self, request: &ChatRequest) -> Result<String, ReasonOxError> {
        self.config
            .retry()
            .retry(|| self.send_once(request))
            .await
            .map_err(ReasonOxError::from)
    }

    /// Rewrite a raw question into an optimized prompt.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn improve_question(&self, question: &str) -> Result<String, ReasonOxError> {
        self.improve_question_with(question, self.config.defaults()).await
    }

    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn improve_question_with(
        &self,
        question: &str,
        options: &GenerationOptions,
    ) -> Result<String, ReasonOxError> {
        let messages = vec![
            Message::system(prompts::IMPROVE_QUESTION),
            Message::user(question),
        ];
        self.complete(messages, options).await
    }

    /// Produce a reasoning trace for an (improved) question.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn generate_reasoning(&self, question: &str) -> Result<String, ReasonOxError> {
        self.generate_reasoning_with(question, self.config.defaults()).await
    }

    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn generate_reasoning_with(
        &self,
        question: &str,
        options: &GenerationOptions,
    ) -> Result<String, ReasonOxError> {
        let messages = vec![
            Message::system(prompts::GENERATE_REASONING),
            Message::user(question),
        ];
        self.complete(messages, options).await
    }

    /// Answer `question` using a previously generated reasoning trace.
    ///
    /// The reasoning is sent as a prior assistant turn ahead of the question.
    ///
    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn generate_final_answer(
        &self,
        question: &str,
        reasoning: &str,
    ) -> Result<String, ReasonOxError> {
        self.generate_final_answer_with(question, reasoning, self.config.defaults())
            .await
    }

    /// # Errors
    ///
    /// See [`Self::send`].
    pub async fn generate_final_answer_with(
        &self,
        question: &str,
        reasoning: &str,
        options: &GenerationOptions,
    ) -> Result<String, ReasonOxError> {
        let messages = vec![
            Message::system(prompts::FINAL_ANSWER),
            Message::assistant(reasoning),
            Message::user(question),
        ];
        self.complete(messages, options).await
    }

    async fn complete(
        &self,
        messages: Vec<Message>,
        options: &GenerationOptions,
    ) -> Result<String, ReasonOxError> {
        let request = Self::build_payload(
            options.model.clone(),
            messages,
            options.temperature,
            options.max_tokens,
        );
        self.send(&request).await
    }
}
