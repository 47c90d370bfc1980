//! Request execution and outcome classification.

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{Error, HttpClient, Request, Result, StatusCode};

/// Sends built requests and classifies the outcome.
///
/// | Outcome | Result |
/// |---------|--------|
/// | 2xx | raw body |
/// | 4xx, 5xx and any other non-2xx | [`Error::Http`] with status and body |
/// | transport failure | [`Error::Connection`], [`Error::Tls`], [`Error::Timeout`] |
/// | token cancelled first | [`Error::Cancelled`] |
///
/// The executor never retries; retry is a transport layer concern.
#[derive(Debug, Clone)]
pub struct Executor<C> {
    client: C,
}

impl<C: HttpClient> Executor<C> {
    /// Executor over a transport.
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Underlying transport.
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Send one request.
    ///
    /// Cancellation is cooperative: an already-cancelled token fails before
    /// anything is sent; a token cancelled in flight drops the pending call,
    /// which leaves the server-side effect of a write undetermined.
    ///
    /// # Errors
    ///
    /// See the table on [`Executor`].
    pub async fn execute(&self, request: Request<Bytes>, cancel: &CancellationToken) -> Result<Bytes> {
        if cancel.is_cancelled() {
            debug!(url = %request.url(), "cancelled before send");
            return Err(Error::Cancelled);
        }

        let method = request.method();
        let url = request.url().clone();

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(%method, %url, "cancelled in flight");
                return Err(Error::Cancelled);
            }
            response = self.client.execute(request) => response,
        };

        let response = response.inspect_err(|err| {
            warn!(%method, %url, error = %err, "transport failure");
        })?;

        let status = response.status();
        if response.is_success() {
            debug!(%method, %url, status, "success");
            return Ok(response.into_body());
        }

        let reason = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status");
        if response.is_server_error() {
            warn!(%method, %url, status, "server error");
        } else {
            debug!(%method, %url, status, "client error");
        }
        Err(Error::http_with_body(status, reason, response.into_body()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use assert2::{check, let_assert};
    use querent_core::Method;

    use super::*;
    use crate::Response;

    struct Canned {
        status: u16,
        body: &'static str,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl HttpClient for Canned {
        async fn execute(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.status == 0 {
                return Err(Error::connection("connection refused"));
            }
            Ok(Response::new(
                self.status,
                HashMap::new(),
                Bytes::from_static(self.body.as_bytes()),
            ))
        }
    }

    fn request() -> Request<Bytes> {
        let url = url::Url::parse("https://api.example.com/2/tweets/compliance/jobs/1").expect("url");
        Request::builder(Method::Get, url).build()
    }

    #[tokio::test]
    async fn success_returns_body() {
        let executor = Executor::new(Canned::new(200, r#"{"data":{}}"#));
        let body = executor
            .execute(request(), &CancellationToken::new())
            .await
            .expect("body");
        check!(body.as_ref() == br#"{"data":{}}"#);
    }

    #[tokio::test]
    async fn client_error_keeps_status_and_body() {
        let executor = Executor::new(Canned::new(404, r#"{"title":"Not Found Error"}"#));
        let_assert!(
            Err(Error::Http { status, message, body }) =
                executor.execute(request(), &CancellationToken::new()).await
        );
        check!(status == 404);
        check!(message == "Not Found");
        check!(body.as_deref() == Some(br#"{"title":"Not Found Error"}"#.as_slice()));
    }

    #[tokio::test]
    async fn server_error_is_http_error() {
        let executor = Executor::new(Canned::new(503, ""));
        let_assert!(Err(err) = executor.execute(request(), &CancellationToken::new()).await);
        check!(err.is_server_error());
    }

    #[tokio::test]
    async fn transport_error_passes_through() {
        let executor = Executor::new(Canned::new(0, ""));
        let_assert!(Err(err) = executor.execute(request(), &CancellationToken::new()).await);
        check!(err.is_transport());
    }

    #[tokio::test]
    async fn cancelled_token_sends_nothing() {
        let executor = Executor::new(Canned::new(200, ""));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let_assert!(Err(Error::Cancelled) = executor.execute(request(), &cancel).await);
        check!(executor.client().calls.load(Ordering::SeqCst) == 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_in_flight_wins() {
        let mut canned = Canned::new(200, "");
        canned.delay = Duration::from_secs(60);
        let executor = Executor::new(canned);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let_assert!(Err(err) = executor.execute(request(), &cancel).await);
        check!(err.is_cancelled());
        check!(!err.is_transport());
    }
}
