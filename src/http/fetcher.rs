//! Resilient fetcher: GET with a fixed retry budget and fixed-delay backoff.
//!
//! Any transport failure, any non-2xx status and any undecodable 2xx body
//! counts as a failed attempt. 4xx responses are retried like 5xx ones.
//! Each call starts with a fresh budget; nothing is remembered between calls.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use super::transport::{HttpTransport, TransportError};
use crate::utilities::errors::{FetchResult, ToolError};

/// Retry policy applied to every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Timeout applied to each attempt.
    pub timeout: Duration,
    /// Fixed delay slept between attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(5),
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Upper bound on how long one fetch can block.
    pub fn worst_case(&self) -> Duration {
        let attempts = self.max_attempts.max(1);
        self.timeout * attempts + self.retry_delay * (attempts - 1)
    }
}

/// Issues GETs through an [`HttpTransport`] under a [`RetryPolicy`].
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetch `url` with `query`, retrying per the policy.
    ///
    /// `resource` names what is being fetched and only feeds the exhaustion
    /// message. The query string is never logged since it may hold a key.
    pub async fn fetch(&self, resource: &str, url: &str, query: &[(String, String)]) -> FetchResult {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            log::debug!("Fetching {} from {} (attempt {})", resource, url, attempt);

            match self.attempt(url, query).await {
                Ok(payload) => return Ok(payload),
                Err(e) => {
                    log::error!("GET request failed (Attempt {}): {}", attempt, e);
                    last_error = Some(e);
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }

        Err(ToolError::Exhausted {
            resource: resource.to_string(),
            attempts: max_attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    async fn attempt(&self, url: &str, query: &[(String, String)]) -> Result<Value, TransportError> {
        let response = self
            .transport
            .get(url, query, self.policy.timeout)
            .await?;

        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: truncate(&response.body, 200),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays a fixed script of responses and records each call.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        calls: Mutex<Vec<(String, Vec<(String, String)>, Duration, Instant)>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|c| c.3).collect()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(
            &self,
            url: &str,
            query: &[(String, String)],
            timeout: Duration,
        ) -> Result<HttpResponse, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), query.to_vec(), timeout, Instant::now()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connect("script exhausted".into())))
        }
    }

    /// The paused clock advances in whole timer ticks.
    fn assert_close(actual: Duration, expected: Duration) {
        assert!(
            actual >= expected && actual < expected + Duration::from_millis(10),
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    fn ok(body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(200, body))
    }

    fn status(code: u16) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse::new(code, "upstream says no"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![ok(r#"{"iss_position":{"latitude":"1.0"}}"#)]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default());

        let payload = fetcher
            .fetch("ISS location", "http://stub/iss-now.json", &[])
            .await
            .unwrap();

        assert_eq!(payload, json!({"iss_position": {"latitude": "1.0"}}));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fails_twice_then_succeeds() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Timeout(Duration::from_secs(5))),
            status(503),
            ok(r#"{"number": 7}"#),
        ]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default());

        let started = Instant::now();
        let payload = fetcher
            .fetch("Astros", "http://stub/astros.json", &[])
            .await
            .unwrap();

        assert_eq!(payload, json!({"number": 7}));
        assert_eq!(transport.call_count(), 3);

        let times = transport.call_times();
        assert_close(times[1] - times[0], Duration::from_secs(2));
        assert_close(times[2] - times[1], Duration::from_secs(2));
        assert_close(started.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_exhausts_exactly_max_attempts() {
        let transport = ScriptedTransport::new(vec![status(500), status(502), status(503), ok("{}")]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default());

        let err = fetcher
            .fetch("weather", "http://stub/current.json", &[])
            .await
            .unwrap_err();

        assert_eq!(transport.call_count(), 3);
        match err {
            ToolError::Exhausted {
                resource,
                attempts,
                last_error,
            } => {
                assert_eq!(resource, "weather");
                assert_eq!(attempts, 3);
                assert!(last_error.contains("503"));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_errors_are_retried_too() {
        let transport = ScriptedTransport::new(vec![status(400), status(400), status(400)]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default());

        let err = fetcher.fetch("weather history", "http://stub/history.json", &[]).await.unwrap_err();

        assert_eq!(transport.call_count(), 3);
        assert_eq!(err.to_string(), "Failed to fetch weather history after multiple attempts.");
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_2xx_counts_as_success() {
        let transport = ScriptedTransport::new(vec![
            status(301),
            status(199),
            Ok(HttpResponse::new(204, "{}")),
        ]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default());

        let payload = fetcher.fetch("timezone", "http://stub/timezone.json", &[]).await.unwrap();

        assert_eq!(payload, json!({}));
        assert_eq!(transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_undecodable_body_is_retried() {
        let transport = ScriptedTransport::new(vec![ok("<html>oops</html>"), ok(r#"{"ok":true}"#)]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default());

        let payload = fetcher.fetch("Astros", "http://stub/astros.json", &[]).await.unwrap();
        assert_eq!(payload, json!({"ok": true}));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sleep_after_final_attempt() {
        let transport = ScriptedTransport::new(vec![status(500), status(500)]);
        let policy = RetryPolicy {
            max_attempts: 2,
            timeout: Duration::from_secs(5),
            retry_delay: Duration::from_secs(2),
        };
        let fetcher = Fetcher::new(transport.clone(), policy);

        let started = Instant::now();
        let _ = fetcher.fetch("Astros", "http://stub/astros.json", &[]).await;
        assert_close(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_still_tries_once() {
        let transport = ScriptedTransport::new(vec![ok("{}")]);
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };
        let fetcher = Fetcher::new(transport.clone(), policy);

        assert!(fetcher.fetch("Astros", "http://stub/astros.json", &[]).await.is_ok());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_passes_query_and_timeout_through() {
        let transport = ScriptedTransport::new(vec![ok("{}")]);
        let fetcher = Fetcher::new(transport.clone(), RetryPolicy::default());
        let query = vec![("q".to_string(), "23.5,-45.3".to_string())];

        fetcher.fetch("weather", "http://stub/current.json", &query).await.unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].0, "http://stub/current.json");
        assert_eq!(calls[0].1, query);
        assert_eq!(calls[0].2, Duration::from_secs(5));
    }

    #[test]
    fn test_worst_case_duration() {
        assert_eq!(RetryPolicy::default().worst_case(), Duration::from_secs(19));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
