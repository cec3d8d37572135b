use std::future::Future;
use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use tracing::{debug, warn};
use verdant_domain::{ProviderConfig, ProviderError};

use crate::errors::InfraError;

/// Bounded retry with exponential backoff.
///
/// `max_attempts` counts the first try. The delay before retry `n` (1-based)
/// is `base_backoff * 2^(n-1)`, capped at 256x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff: Duration::from_millis(200) }
    }
}

impl RetryPolicy {
    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    fn delay_before(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(8);
        self.base_backoff.saturating_mul(1 << exponent)
    }
}

/// What one attempt produced
enum Attempt {
    Finished(Response),
    Retryable { reason: String, last: Result<Response, ProviderError> },
    Failed(ProviderError),
}

/// Outbound HTTP with a per-request timeout and bounded retry.
///
/// Only transport failures and 5xx responses are retried. Every other
/// response, 4xx and 429 included, goes straight back to the caller. When
/// retries run out the last response or error is returned unchanged.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Builder with a 30s timeout and the default retry policy.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client configured from the provider settings.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .retry(RetryPolicy {
                max_attempts: config.max_attempts,
                base_backoff: Duration::from_millis(config.retry_backoff_ms),
            })
            .user_agent(concat!("verdant/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    /// Retry policy applied by [`send`](Self::send).
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Start a request; send it with [`send`](Self::send).
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder`, retrying per the client's [`RetryPolicy`].
    ///
    /// The body must be buffered (JSON bodies are) so the request can be
    /// rebuilt for each attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ProviderError> {
        self.send_paced(builder, || async {}).await
    }

    /// Like [`send`](Self::send), awaiting `before_attempt` ahead of every
    /// attempt, retries included. Callers put their rate limiting there.
    pub async fn send_paced<F, Fut>(
        &self,
        builder: RequestBuilder,
        mut before_attempt: F,
    ) -> Result<Response, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let attempts = self.retry.attempts();
        let mut attempt = 1;

        loop {
            let request = rebuild(&builder)?;
            before_attempt().await;
            match self.attempt(request, attempt).await {
                Attempt::Finished(response) => return Ok(response),
                Attempt::Failed(err) => return Err(err),
                Attempt::Retryable { last, .. } if attempt >= attempts => return last,
                Attempt::Retryable { reason, .. } => {
                    let delay = self.retry.delay_before(attempt);
                    warn!(attempt, max_attempts = attempts, delay_ms = delay.as_millis() as u64, %reason, "retrying request");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, request: Request, attempt: u32) -> Attempt {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(attempt, %method, %path, "sending request");

        match self.client.execute(request).await {
            Ok(response) if response.status().is_server_error() => {
                let status = response.status();
                debug!(attempt, %method, %path, %status, "server error");
                Attempt::Retryable { reason: format!("status {status}"), last: Ok(response) }
            }
            Ok(response) => {
                debug!(attempt, %method, %path, status = %response.status(), "response received");
                Attempt::Finished(response)
            }
            Err(err) if is_transient(&err) => {
                debug!(attempt, %method, %path, error = %err, "transport failure");
                let reason = err.to_string();
                Attempt::Retryable { reason, last: Err(InfraError::from(err).into()) }
            }
            Err(err) => Attempt::Failed(InfraError::from(err).into()),
        }
    }
}

fn rebuild(builder: &RequestBuilder) -> Result<Request, ProviderError> {
    builder
        .try_clone()
        .ok_or_else(|| ProviderError::Config("streaming request bodies cannot be retried".into()))?
        .build()
        .map_err(|err| InfraError::from(err).into())
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), retry: RetryPolicy::default(), user_agent: None }
    }
}

impl HttpClientBuilder {
    /// Whole-request timeout, connection included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// `User-Agent` header sent with every request.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// `ProviderError::Config` when the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, ProviderError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder
            .build()
            .map_err(|err| ProviderError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client, retry: self.retry })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(max_attempts: u32) -> HttpClient {
        HttpClient::builder()
            .retry(RetryPolicy { max_attempts, base_backoff: Duration::from_millis(1) })
            .build()
            .expect("http client")
    }

    async fn hits(server: &MockServer) -> usize {
        server.received_requests().await.map(|r| r.len()).unwrap_or(0)
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy { max_attempts: 5, base_backoff: Duration::from_millis(100) };

        assert_eq!(policy.delay_before(1), Duration::from_millis(100));
        assert_eq!(policy.delay_before(2), Duration::from_millis(200));
        assert_eq!(policy.delay_before(3), Duration::from_millis(400));
        assert_eq!(policy.delay_before(20), Duration::from_millis(25_600));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let policy = RetryPolicy { max_attempts: 0, base_backoff: Duration::ZERO };
        assert_eq!(policy.attempts(), 1);
    }

    #[tokio::test]
    async fn success_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client(3);
        let response = client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hits(&server).await, 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_one_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;

        let client = client(3);
        let url = format!("{}/contacts", server.uri());
        let request = client.request(Method::POST, url).json(&serde_json::json!({"email": "a@b.co"}));
        let response = client.send(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(hits(&server).await, 3);
    }

    #[tokio::test]
    async fn pacing_hook_runs_before_every_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client(3);
        let mut paced = 0;
        let response = client
            .send_paced(client.request(Method::GET, server.uri()), || {
                paced += 1;
                async {}
            })
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(paced, 3);
        assert_eq!(hits(&server).await, 3);
    }

    #[tokio::test]
    async fn last_server_error_is_returned_when_attempts_run_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = client(3);
        let response = client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(hits(&server).await, 3);
    }

    #[tokio::test]
    async fn client_errors_and_throttling_are_not_retried() {
        for status in [400, 404, 429] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let client = client(3);
            let response = client.send(client.request(Method::GET, server.uri())).await.expect("response");

            assert_eq!(response.status().as_u16(), status);
            assert_eq!(hits(&server).await, 1, "status {status}");
        }
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("free port");

        let client = client(2);
        let err = client
            .send(client.request(Method::GET, format!("http://{addr}")))
            .await
            .unwrap_err();

        match err {
            ProviderError::Transport { message, timed_out } => {
                assert!(!timed_out);
                assert!(message.to_lowercase().contains("connection"), "{message}");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeout_is_retried_then_surfaces_as_timed_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .timeout(Duration::from_millis(50))
            .retry(RetryPolicy { max_attempts: 2, base_backoff: Duration::from_millis(1) })
            .build()
            .expect("http client");

        let err = client.send(client.request(Method::GET, server.uri())).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(hits(&server).await, 2);
    }

    #[test]
    fn from_config_takes_retry_settings() {
        let config = ProviderConfig {
            api_key: "k".into(),
            base_url: "https://api.brevo.com/v3".into(),
            timeout_secs: 5,
            max_attempts: 4,
            retry_backoff_ms: 50,
        };

        let client = HttpClient::from_config(&config).expect("client");

        assert_eq!(
            client.retry_policy(),
            RetryPolicy { max_attempts: 4, base_backoff: Duration::from_millis(50) }
        );
    }
}
