//! Azure OpenAI chat-completions adapter implementing both ports.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, warn};

use stockcast_core::{Category, Forecast, SalesHistory};

use crate::config::AiConfig;
use crate::error::ServiceError;
use crate::port::{ClassificationPort, RecommendationPort};
use crate::prompt::{ChatRequest, classification_request, recommendation_request};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the trimmed text of the first choice.
///
/// A missing `content` field reads as empty text; a body without any choice
/// is malformed.
pub fn parse_completion(body: &str) -> Result<String, ServiceError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::MalformedResponse(format!("invalid completion body: {e}")))?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::MalformedResponse("completion has no choices".to_string()))?;
    Ok(choice.message.content.unwrap_or_default().trim().to_string())
}

/// One client per batch run; cheap to clone (shared connection pool).
#[derive(Clone, Debug)]
pub struct AzureOpenAiClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl AzureOpenAiClient {
    pub fn new(config: AiConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ServiceError> {
        debug!(
            deployment = %self.config.deployment,
            max_tokens = request.max_tokens,
            "sending chat completion request"
        );

        let response = self
            .http
            .post(self.config.chat_completions_url())
            .header("api-key", self.config.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(
                deployment = %self.config.deployment,
                status = status.as_u16(),
                "chat completion request rejected"
            );
            return Err(ServiceError::from_status(status.as_u16(), body));
        }

        parse_completion(&body)
    }

    fn transport_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout(self.config.timeout)
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ClassificationPort for AzureOpenAiClient {
    async fn classify(&self, history: &SalesHistory) -> Result<String, ServiceError> {
        // A blank label is passed through; routing treats it as seasonal.
        self.complete(&classification_request(history)).await
    }
}

#[async_trait]
impl RecommendationPort for AzureOpenAiClient {
    async fn recommend(
        &self,
        forecast: &Forecast,
        category: &Category,
    ) -> Result<String, ServiceError> {
        let text = self.complete(&recommendation_request(forecast, category)).await?;
        if text.is_empty() {
            return Err(ServiceError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    #[test]
    fn parses_first_choice_and_trims() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Fast-Moving\n"}},{"message":{"content":"x"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Fast-Moving");
    }

    #[test]
    fn missing_content_reads_as_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "");
    }

    #[test]
    fn no_choices_is_malformed() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(ServiceError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_completion("<html>gateway</html>"),
            Err(ServiceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn client_builds_from_config() {
        let config = AiConfig::new("https://inv.openai.azure.com", "dep", "key", "2024-06-01").unwrap();
        let client = AzureOpenAiClient::new(config).unwrap();
        assert_eq!(client.config().deployment, "dep");
    }

    /// Serve one canned HTTP response on a local port; yields the raw request.
    async fn stub_server(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            let header_end = loop {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
            let content_length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .map(|v| v.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            while raw.len() < header_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        });
        (endpoint, handle)
    }

    fn client_for(endpoint: &str) -> AzureOpenAiClient {
        let config = AiConfig::new(endpoint, "dep", "key", "2024-06-01").unwrap();
        AzureOpenAiClient::new(config).unwrap()
    }

    fn sample_history() -> SalesHistory {
        [10u32, 12, 11, 13, 12, 14].into_iter().collect()
    }

    #[tokio::test]
    async fn classify_posts_to_deployment_with_api_key() {
        let (endpoint, server) =
            stub_server("200 OK", r#"{"choices":[{"message":{"content":" Fast-Moving "}}]}"#).await;
        let label = client_for(&endpoint).classify(&sample_history()).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(label, "Fast-Moving");
        let request_line = request.lines().next().unwrap();
        assert!(
            request_line.starts_with(
                "POST /openai/deployments/dep/chat/completions?api-version=2024-06-01 "
            ),
            "unexpected request line: {request_line}"
        );
        assert!(request.to_ascii_lowercase().contains("api-key: key"));
        assert!(request.contains(r#""max_tokens":5"#));
    }

    #[tokio::test]
    async fn rate_limited_call_maps_to_quota() {
        let (endpoint, server) = stub_server("429 Too Many Requests", r#"{"error":"slow down"}"#).await;
        let err = client_for(&endpoint).classify(&sample_history()).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ServiceError::Quota(ref body) if body.contains("slow down")));
    }

    #[tokio::test]
    async fn rejected_key_maps_to_auth() {
        let (endpoint, server) = stub_server("401 Unauthorized", r#"{"error":"bad key"}"#).await;
        let err = client_for(&endpoint)
            .recommend(&Forecast::flat(5), &Category::new("Slow-Moving"))
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, ServiceError::Auth(_)));
    }

    #[tokio::test]
    async fn blank_recommendation_is_empty_response() {
        let (endpoint, server) =
            stub_server("200 OK", r#"{"choices":[{"message":{"content":"   "}}]}"#).await;
        let err = client_for(&endpoint)
            .recommend(&Forecast::flat(5), &Category::new("Fast-Moving"))
            .await
            .unwrap_err();
        let request = server.await.unwrap();

        assert_eq!(err, ServiceError::EmptyResponse);
        assert!(request.contains(r#""max_tokens":10"#));
    }
}
