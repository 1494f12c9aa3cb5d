use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Completion model used unless overridden on the command line.
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";

const COMPLETIONS_ENDPOINT: &str = "https://api.together.xyz/v1/chat/completions";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 2048;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Non-200 response from the completion endpoint. The Display form is
    /// the exact user-facing message for API failures.
    #[error("Error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Could not reach the completion endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed completion response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Completion response contained no choices")]
    EmptyChoices,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Client for the Together AI chat-completion endpoint. The credential is
/// passed in explicitly at construction; nothing reads ambient configuration
/// mid-call.
pub struct CompletionClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl CompletionClient {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            model,
            endpoint: COMPLETIONS_ENDPOINT.to_string(),
        }
    }

    /// Points the client at a stub endpoint instead of the hosted service.
    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Sends one blocking analysis request and returns the completion text.
    ///
    /// On HTTP 200 the first choice's message content is returned with every
    /// literal `<br>` marker replaced by a space and the result trimmed. Any
    /// other status becomes [`AnalysisError::Http`] carrying the raw body.
    pub async fn analyze(&self, prompt: &str) -> Result<String, AnalysisError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(
            "Sending completion request to {} ({} byte prompt, model {})",
            self.endpoint,
            prompt.len(),
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            error!("Completion endpoint returned status {}", status);
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(AnalysisError::EmptyChoices)?;

        Ok(clean_completion(&choice.message.content))
    }
}

/// Strips the `<br>` markers the model occasionally emits despite the prompt
/// guidelines, then trims surrounding whitespace.
fn clean_completion(content: &str) -> String {
    content.replace("<br>", " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accepts one connection, reads the full request (headers plus
    /// Content-Length body), writes the canned response, and closes.
    async fn serve_once(listener: TcpListener, status: u16, reason: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );

        let (mut socket, _) = listener.accept().await.expect("accept failed");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 16 * 1024];
        loop {
            let n = socket.read(&mut chunk).await.expect("read failed");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]);
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + content_length {
                    break;
                }
            }
        }

        socket
            .write_all(response.as_bytes())
            .await
            .expect("write failed");
        socket.shutdown().await.ok();
    }

    async fn stub_client(status: u16, reason: &'static str, body: &'static str) -> (CompletionClient, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub listener");
        let addr = listener.local_addr().expect("no local addr");
        let server = tokio::spawn(serve_once(listener, status, reason, body));

        let client = CompletionClient::new("test-key".to_string(), DEFAULT_MODEL.to_string())
            .with_endpoint(format!("http://{}/v1/chat/completions", addr));
        (client, server)
    }

    #[tokio::test]
    async fn success_returns_first_choice_content_with_markers_stripped() {
        let body =
            r#"{"choices":[{"message":{"role":"assistant","content":"| a |<br>| b |"}}]}"#;
        let (client, server) = stub_client(200, "OK", body).await;

        let content = client
            .analyze("Page1 content\nPage2 content")
            .await
            .expect("analyze failed");

        assert_eq!(content, "| a | | b |");
        server.await.expect("stub server panicked");
    }

    #[tokio::test]
    async fn non_200_response_surfaces_as_exact_error_string() {
        let (client, server) = stub_client(500, "Internal Server Error", "upstream exploded").await;

        let err = client
            .analyze("prompt")
            .await
            .expect_err("expected an HTTP failure");

        assert_eq!(err.to_string(), "Error 500: upstream exploded");
        assert!(matches!(err, AnalysisError::Http { status: 500, .. }));
        server.await.expect("stub server panicked");
    }

    #[test]
    fn http_error_display_embeds_status_and_body() {
        let err = AnalysisError::Http {
            status: 429,
            body: "{\"error\":\"rate limited\"}".to_string(),
        };
        assert_eq!(err.to_string(), "Error 429: {\"error\":\"rate limited\"}");
    }

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "| a | b |"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).expect("parse failed");
        assert_eq!(parsed.choices[0].message.content, "| a | b |");
    }

    #[test]
    fn empty_choices_is_distinct_from_malformed_json() {
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": []}"#).expect("parse failed");
        assert!(parsed.choices.is_empty());
        assert!(serde_json::from_str::<ChatCompletionResponse>("not json").is_err());
    }

    #[test]
    fn clean_completion_strips_br_markers_and_trims() {
        assert_eq!(
            clean_completion("  | a |<br>| b |  \n"),
            "| a | | b |"
        );
        assert_eq!(clean_completion("no markers"), "no markers");
    }

    #[test]
    fn request_serializes_fixed_parameters() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "prompt",
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let value = serde_json::to_value(&request).expect("serialize failed");
        assert_eq!(value["model"], "mistralai/Mixtral-8x7B-Instruct-v0.1");
        assert_eq!(value["temperature"], 0.3);
        assert_eq!(value["max_tokens"], 2048);
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
