use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::{EnrichConfig, TRANSLATOR_PERSONA};

/// Failure classes for one remote call. Progress is checkpointed per item,
/// so most classes stop the run and rely on re-invocation to resume; only
/// a gateway timeout earns a retry, and exactly one.
#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("rate limited (HTTP 429)")]
    RateLimited,
    #[error("service unavailable (HTTP 503)")]
    Unavailable,
    #[error("gateway timeout (HTTP 504)")]
    Timeout,
    #[error("api error (HTTP {status}): {body}")]
    Api { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub(crate) fn classify_status(status: u16, body: String) -> ClientError {
    match status {
        429 => ClientError::RateLimited,
        503 => ClientError::Unavailable,
        504 => ClientError::Timeout,
        _ => ClientError::Api { status, body },
    }
}

/// Seam for the translation request shape, so drivers run against mocks.
pub(crate) trait TranslationBackend {
    fn translate(&self, text: &str) -> Result<String, ClientError>;
}

/// Seam for the embedding request shape.
pub(crate) trait EmbeddingBackend {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError>;
}

/// Minimum pause between successive remote calls.
pub(crate) struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub(crate) fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub(crate) fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// Stateless adapter for the two enrichment endpoints. One blocking agent,
/// bearer auth, JSON in and out.
pub(crate) struct ApiClient {
    agent: ureq::Agent,
    cfg: EnrichConfig,
}

impl ApiClient {
    pub(crate) fn new(cfg: &EnrichConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(cfg.request_timeout)
            .timeout_read(cfg.request_timeout)
            .timeout_write(cfg.request_timeout)
            .build();
        Self {
            agent,
            cfg: cfg.clone(),
        }
    }

    fn post(
        &self,
        endpoint: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/{endpoint}", self.cfg.api_base.trim_end_matches('/'));
        let mut retried = false;
        loop {
            let response = self
                .agent
                .post(&url)
                .set("content-type", "application/json")
                .set("authorization", &format!("Bearer {}", self.cfg.api_token))
                .send_json(payload);
            match response {
                Ok(resp) => {
                    let body = resp
                        .into_string()
                        .map_err(|e| ClientError::Transport(e.to_string()))?;
                    return serde_json::from_str(&body)
                        .map_err(|e| ClientError::Malformed(e.to_string()));
                }
                Err(ureq::Error::Status(code, resp)) => {
                    if code == 504 && !retried {
                        retried = true;
                        eprintln!(
                            "[client] gateway timeout, retrying once in {}s",
                            self.cfg.timeout_cooldown.as_secs()
                        );
                        thread::sleep(self.cfg.timeout_cooldown);
                        continue;
                    }
                    let body = resp.into_string().unwrap_or_default();
                    return Err(classify_status(code, body));
                }
                Err(ureq::Error::Transport(err)) => {
                    return Err(ClientError::Transport(err.to_string()));
                }
            }
        }
    }
}

impl TranslationBackend for ApiClient {
    fn translate(&self, text: &str) -> Result<String, ClientError> {
        let payload = serde_json::json!({
            "model": self.cfg.chat_model,
            "messages": [
                {"role": "system", "content": TRANSLATOR_PERSONA},
                {"role": "user", "content": text}
            ],
            "stream": false,
            "max_tokens": self.cfg.max_tokens,
            "temperature": self.cfg.temperature,
            "top_p": self.cfg.top_p,
            "frequency_penalty": self.cfg.frequency_penalty,
            "presence_penalty": self.cfg.presence_penalty,
            "response_format": {"type": "text"}
        });
        let body = self.post("chat/completions", &payload)?;
        let content = body
            .get("choices")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                ClientError::Malformed("missing choices[0].message.content".to_string())
            })?;
        Ok(content.to_string())
    }
}

impl EmbeddingBackend for ApiClient {
    fn embed(&self, text: &str) -> Result<Vec<f32>, ClientError> {
        let payload = serde_json::json!({
            "model": self.cfg.embed_model,
            "input": text,
            "encoding_format": "float"
        });
        let body = self.post("embeddings", &payload)?;
        let values = body
            .get("data")
            .and_then(|v| v.as_array())
            .and_then(|a| a.first())
            .and_then(|d| d.get("embedding"))
            .and_then(|v| v.as_array())
            .ok_or_else(|| ClientError::Malformed("missing data[0].embedding".to_string()))?;
        values
            .iter()
            .map(|v| {
                v.as_f64().map(|f| f as f32).ok_or_else(|| {
                    ClientError::Malformed("non-numeric embedding component".to_string())
                })
            })
            .collect()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;

    fn test_config(api_base: &str) -> EnrichConfig {
        EnrichConfig {
            api_base: api_base.to_string(),
            api_token: "test-token".to_string(),
            request_timeout: Duration::from_secs(5),
            timeout_cooldown: Duration::ZERO,
            ..EnrichConfig::default()
        }
    }

    fn request_complete(seen: &[u8]) -> bool {
        let Some(split) = seen.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&seen[..split]);
        let content_length = headers
            .lines()
            .filter_map(|l| l.split_once(':'))
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        seen.len() >= split + 4 + content_length
    }

    /// Serves one canned HTTP response per entry on a local port, closing
    /// each connection, and signals once per request served.
    fn spawn_server(responses: Vec<(u16, &'static str, String)>) -> (String, mpsc::Receiver<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let api_base = format!("http://{}/v1", listener.local_addr().unwrap());
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for (status, reason, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut seen = Vec::new();
                let mut buf = [0_u8; 4096];
                loop {
                    match stream.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            seen.extend_from_slice(&buf[..n]);
                            if request_complete(&seen) {
                                break;
                            }
                        }
                        Err(_) => break,
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len(),
                );
                stream.write_all(response.as_bytes()).unwrap();
                let _ = tx.send(());
            }
        });
        (api_base, rx)
    }

    fn chat_ok(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(429, String::new()),
            ClientError::RateLimited
        ));
        assert!(matches!(
            classify_status(503, String::new()),
            ClientError::Unavailable
        ));
        assert!(matches!(
            classify_status(504, String::new()),
            ClientError::Timeout
        ));
        assert!(matches!(
            classify_status(500, "boom".to_string()),
            ClientError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_timeout_then_success_retries_once() {
        let (api_base, rx) = spawn_server(vec![
            (504, "Gateway Timeout", String::new()),
            (200, "OK", chat_ok("翻译结果")),
        ]);
        let client = ApiClient::new(&test_config(&api_base));
        let out = client.translate("some definition").unwrap();
        assert_eq!(out, "翻译结果");
        // Exactly two requests: the original and the single retry.
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_second_timeout_is_fatal() {
        let (api_base, rx) = spawn_server(vec![
            (504, "Gateway Timeout", String::new()),
            (504, "Gateway Timeout", String::new()),
        ]);
        let client = ApiClient::new(&test_config(&api_base));
        let err = client.translate("some definition").unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_rate_limit_is_fatal_without_retry() {
        let (api_base, rx) = spawn_server(vec![(429, "Too Many Requests", String::new())]);
        let client = ApiClient::new(&test_config(&api_base));
        let err = client.translate("text").unwrap_err();
        assert!(matches!(err, ClientError::RateLimited));
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_ok());
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_embed_parses_vector() {
        let body = serde_json::json!({
            "data": [{"embedding": [0.25, -1.5, 3.0]}]
        })
        .to_string();
        let (api_base, _rx) = spawn_server(vec![(200, "OK", body)]);
        let client = ApiClient::new(&test_config(&api_base));
        let vector = client.embed("text").unwrap();
        assert_eq!(vector, vec![0.25_f32, -1.5, 3.0]);
    }

    #[test]
    fn test_malformed_response_is_classified() {
        let (api_base, _rx) = spawn_server(vec![(200, "OK", r#"{"unexpected": true}"#.to_string())]);
        let client = ApiClient::new(&test_config(&api_base));
        let err = client.translate("text").unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }
}
