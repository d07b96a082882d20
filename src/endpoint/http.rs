use tracing::trace;

use crate::endpoint::{Endpoint, HttpResponse, TransportError};

/// [`Endpoint`] backed by a blocking `reqwest` client. The client reuses
/// connections across requests for the lifetime of the adapter.
pub struct HttpEndpoint {
    client: reqwest::blocking::Client,
}

impl HttpEndpoint {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    fn envelope(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|err| TransportError::new(url, err))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
            url: url.to_string(),
        })
    }
}

impl Default for HttpEndpoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Endpoint for HttpEndpoint {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        trace!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| TransportError::new(url, err))?;

        Self::envelope(url, response)
    }

    fn head(&self, url: &str) -> Result<HttpResponse, TransportError> {
        trace!(url, "HEAD");

        let response = self
            .client
            .head(url)
            .send()
            .map_err(|err| TransportError::new(url, err))?;

        Ok(HttpResponse {
            status: response.status().as_u16(),
            body: Vec::new(),
            url: url.to_string(),
        })
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, TransportError> {
        trace!(url, bytes = body.len(), "POST");

        let response = self
            .client
            .post(url)
            .body(body)
            .send()
            .map_err(|err| TransportError::new(url, err))?;

        Self::envelope(url, response)
    }
}
