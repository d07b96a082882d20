use thiserror::Error;

pub mod http;
pub mod mock;

/// Raw outcome of one request. Whether a status counts as success is the
/// caller's call, never the endpoint's.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub url: String,
}

/// Connection-level failure (DNS, refused connection, timeout). Distinct
/// from a non-200 status, which still produces an [`HttpResponse`].
#[derive(Debug, Error)]
#[error("transport failure for {url}: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: &str, err: impl std::fmt::Display) -> Self {
        Self {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Blocking HTTP verbs against the elliptics endpoints.
pub trait Endpoint {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    fn head(&self, url: &str) -> Result<HttpResponse, TransportError>;

    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, TransportError>;
}
