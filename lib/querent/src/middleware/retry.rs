//! Retry policy for [`tower::retry::RetryLayer`].

use std::future;

use bytes::Bytes;
use tower::retry::Policy;

use crate::{Error, Request, Response};

/// Bounded retry policy.
///
/// Retries:
/// - 429 Too Many Requests, for every method (the request was refused),
/// - 5xx server errors, connection errors and timeouts, for read-only
///   methods only; a write may already have been applied.
///
/// Retries happen outside the authentication layer, so every attempt is
/// signed again with a fresh nonce.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    remaining: u32,
}

impl RetryPolicy {
    /// Policy allowing up to `max_retries` extra attempts.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            remaining: max_retries,
        }
    }

    fn should_retry_response(request: &Request<Bytes>, response: &Response<Bytes>) -> bool {
        match response.status() {
            429 => true,
            status if status >= 500 => request.method().is_safe(),
            _ => false,
        }
    }

    fn should_retry_error(request: &Request<Bytes>, error: &Error) -> bool {
        request.method().is_safe() && (error.is_connection() || error.is_timeout())
    }
}

impl Policy<Request<Bytes>, Response<Bytes>, Error> for RetryPolicy {
    type Future = future::Ready<()>;

    fn retry(
        &mut self,
        req: &mut Request<Bytes>,
        result: &mut Result<Response<Bytes>, Error>,
    ) -> Option<Self::Future> {
        if self.remaining == 0 {
            return None;
        }

        let should_retry = match result {
            Ok(response) => Self::should_retry_response(req, response),
            Err(error) => Self::should_retry_error(req, error),
        };

        if should_retry {
            self.remaining -= 1;
            tracing::debug!(remaining = self.remaining, url = %req.url(), "retrying request");
            Some(future::ready(()))
        } else {
            None
        }
    }

    fn clone_request(&mut self, req: &Request<Bytes>) -> Option<Request<Bytes>> {
        Some(req.clone())
    }
}
