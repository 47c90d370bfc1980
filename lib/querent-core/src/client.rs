//! The transport seam.
//!
//! [`HttpClient`] is the only thing the query pipeline needs from the
//! network: send one fully-built request, return the raw response.
//! Implement it directly for mocks or for custom transports.

use std::{future::Future, sync::Arc};

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Transport failures only:
    /// - [`crate::Error::Connection`]
    /// - [`crate::Error::Tls`]
    /// - [`crate::Error::Timeout`]
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}

impl<C: HttpClient> HttpClient for &C {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert2::check;

    use super::*;
    use crate::Method;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl HttpClient for Recorder {
        async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
            self.seen
                .lock()
                .expect("lock")
                .push(request.url().to_string());
            Ok(Response::new(204, std::collections::HashMap::new(), Bytes::new()))
        }
    }

    fn request() -> Request<Bytes> {
        Request::builder(
            Method::Get,
            url::Url::parse("https://api.example.com/jobs").expect("url"),
        )
        .build()
    }

    #[tokio::test]
    async fn shared_clients_forward() {
        let client = Arc::new(Recorder::default());

        let response = client.execute(request()).await.expect("response");
        check!(response.status() == 204);

        let borrowed = &*client;
        borrowed.execute(request()).await.expect("response");

        check!(client.seen.lock().expect("lock").len() == 2);
    }
}
