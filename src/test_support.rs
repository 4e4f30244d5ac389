//! Shared helpers for tests that talk to a local stub server.

use std::time::Duration;

use axum::Router;

use crate::http::{ReqwestTransport, RetryPolicy};

/// Serve `app` on an ephemeral localhost port and return its base URL.
pub(crate) async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A reqwest transport that ignores proxy settings from the environment.
pub(crate) fn stub_transport() -> ReqwestTransport {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    ReqwestTransport::with_client(client)
}

/// Default attempt budget with a short delay so tests stay fast.
pub(crate) fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        timeout: Duration::from_secs(2),
        retry_delay: Duration::from_millis(10),
    }
}
