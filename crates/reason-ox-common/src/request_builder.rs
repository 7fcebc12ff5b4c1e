use crate::error::{self, CommonRequestError};
use reqwest::{
    Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

/// Authentication method for API requests
#[derive(Clone)]
pub enum AuthMethod {
    /// Bearer token authentication (Authorization: Bearer <token>)
    Bearer(String),
    /// API key header (e.g., api-key: <key>)
    ApiKey { header_name: String, key: String },
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"[REDACTED]").finish(),
            Self::ApiKey { header_name, .. } => f
                .debug_struct("ApiKey")
                .field("header_name", header_name)
                .field("key", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Configuration for request building
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Full URL requests are posted to
    pub endpoint: String,
    pub auth: Option<AuthMethod>,
    /// Extra headers sent with every request, in insertion order
    pub default_headers: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth: None,
            default_headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }
}

/// Posts JSON bodies to a single endpoint and decodes JSON responses
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    config: RequestConfig,
}

impl RequestBuilder {
    pub fn new(client: reqwest::Client, config: RequestConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Headers sent with every request: authentication, default headers and
    /// `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns [`CommonRequestError::InvalidHeader`] when a configured name or
    /// value is not valid HTTP.
    pub fn headers(&self) -> Result<HeaderMap, CommonRequestError> {
        let mut headers = HeaderMap::new();

        if let Some(ref auth) = self.config.auth {
            match auth {
                AuthMethod::Bearer(token) => {
                    insert_header(&mut headers, AUTHORIZATION.as_str(), &format!("Bearer {token}"), true)?;
                }
                AuthMethod::ApiKey { header_name, key } => {
                    insert_header(&mut headers, header_name, key, true)?;
                }
            }
        }

        for (key, value) in &self.config.default_headers {
            insert_header(&mut headers, key, value, false)?;
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// POST `body` as JSON and decode the successful response as `T`
    ///
    /// # Errors
    ///
    /// Transport failures map to [`CommonRequestError::Http`], non-2xx statuses
    /// to [`CommonRequestError::HttpStatus`] and undecodable 2xx bodies to
    /// [`CommonRequestError::UnexpectedResponse`].
    pub async fn post_json<T, B>(&self, body: &B) -> Result<T, CommonRequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let headers = self.headers()?;
        let payload = serde_json::to_vec(body)?;

        tracing::trace!(
            endpoint = %self.config.endpoint,
            payload = %String::from_utf8_lossy(&payload),
            "POST"
        );

        let res = self
            .client
            .post(&self.config.endpoint)
            .headers(headers)
            .body(payload)
            .send()
            .await?;

        Self::handle_response(res).await
    }

    /// Handle response and parse errors
    async fn handle_response<T: DeserializeOwned>(res: Response) -> Result<T, CommonRequestError> {
        let status = res.status();
        let bytes = res.bytes().await?;

        if status.is_success() {
            match serde_json::from_slice::<T>(&bytes) {
                Ok(val) => Ok(val),
                Err(e) => {
                    let body_str = String::from_utf8_lossy(&bytes);
                    Err(CommonRequestError::UnexpectedResponse(format!(
                        "HTTP {} but failed to decode JSON: {}; body: {}",
                        status.as_u16(),
                        e,
                        body_str
                    )))
                }
            }
        } else {
            tracing::debug!(status = status.as_u16(), "request rejected by server");
            Err(error::parse_error_response(status, &bytes))
        }
    }
}

/// Validate and insert one header, marking credentials as sensitive
fn insert_header(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    sensitive: bool,
) -> Result<(), CommonRequestError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| CommonRequestError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    let mut header_value =
        HeaderValue::from_str(value).map_err(|e| CommonRequestError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    header_value.set_sensitive(sensitive);
    headers.insert(header_name, header_value);
    Ok(())
}
