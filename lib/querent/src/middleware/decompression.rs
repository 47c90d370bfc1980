//! Response decompression.
//!
//! Bodies encoded with gzip, deflate, br (brotli) or zstd are decoded before
//! they reach the executor, so response mapping always sees plain JSON.

use std::future::Future;
use std::io::Read;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tower::{Layer, Service};

use crate::{DEFAULT_ACCEPT_ENCODING, Error, Request, Response, Result};

/// Layer that decompresses response bodies.
///
/// Requests without an `Accept-Encoding` header get the default hint.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompressionLayer {
    _private: (),
}

impl DecompressionLayer {
    /// Create a new decompression layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> Layer<S> for DecompressionLayer {
    type Service = Decompression<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Decompression { inner }
    }
}

/// Service that decompresses response bodies.
#[derive(Debug, Clone)]
pub struct Decompression<S> {
    inner: S,
}

fn read_all(encoding: &str, mut reader: impl Read) -> Result<Bytes> {
    let mut decoded = Vec::new();
    reader
        .read_to_end(&mut decoded)
        .map_err(|e| Error::connection(format!("corrupt {encoding} body: {e}")))?;
    Ok(Bytes::from(decoded))
}

/// Decode a body; unknown encodings pass through untouched.
fn decompress(encoding: &str, body: Bytes) -> Result<Bytes> {
    match encoding.trim().to_ascii_lowercase().as_str() {
        "gzip" | "x-gzip" => read_all(encoding, flate2::read::GzDecoder::new(body.as_ref())),
        "deflate" => read_all(encoding, flate2::read::ZlibDecoder::new(body.as_ref())),
        "br" => read_all(
            encoding,
            brotli::Decompressor::new(body.as_ref(), 4096),
        ),
        "zstd" => zstd::decode_all(body.as_ref())
            .map(Bytes::from)
            .map_err(|e| Error::connection(format!("corrupt {encoding} body: {e}"))),
        _ => Ok(body),
    }
}

impl<S> Service<Request<Bytes>> for Decompression<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Bytes>) -> Self::Future {
        request.set_header_if_absent("accept-encoding", DEFAULT_ACCEPT_ENCODING);

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(request).await?;

            let Some(encoding) = response.header("content-encoding").map(str::to_string) else {
                return Ok(response);
            };

            let (status, mut headers, body) = response.into_parts();
            let decoded = decompress(&encoding, body)?;
            headers.remove("content-encoding");
            headers.insert("content-length".to_string(), decoded.len().to_string());

            Ok(Response::new(status, headers, decoded))
        })
    }
}
