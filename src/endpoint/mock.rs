use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::endpoint::{Endpoint, HttpResponse, TransportError};

#[derive(Default)]
struct MockState {
    objects: HashMap<String, Vec<u8>>,
    requests: Vec<(String, String)>,
    forced_status: Option<u16>,
    refuse_connections: bool,
}

/// In-memory stand-in for the elliptics HTTP API, dispatching on the
/// `get`/`upload`/`delete` routes. Keeps a log of every request so tests can
/// assert on traffic, and can be forced into failure modes.
#[derive(Clone, Default)]
pub struct MockEndpoint {
    state: Arc<Mutex<MockState>>,
}

impl MockEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a stored object.
    pub fn with_object(self, name: &str, body: &[u8]) -> Self {
        self.lock().objects.insert(name.to_string(), body.to_vec());
        self
    }

    /// Every subsequent request answers with `status` and an empty body.
    pub fn force_status(&self, status: u16) {
        self.lock().forced_status = Some(status);
    }

    /// Every subsequent request fails at the transport level.
    pub fn refuse_connections(&self) {
        self.lock().refuse_connections = true;
    }

    /// `(method, url)` pairs in request order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.lock().requests.clone()
    }

    pub fn object(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(name).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state
            .lock()
            .expect("failed to acquire mock state guard")
    }

    fn dispatch(
        &self,
        method: &str,
        url: &str,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, TransportError> {
        let mut state = self.lock();

        if state.refuse_connections {
            return Err(TransportError::new(url, "connection refused"));
        }

        state.requests.push((method.to_string(), url.to_string()));

        if let Some(status) = state.forced_status {
            return Ok(HttpResponse {
                status,
                body: Vec::new(),
                url: url.to_string(),
            });
        }

        let parsed = url::Url::parse(url).map_err(|err| TransportError::new(url, err))?;
        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| TransportError::new(url, "url has no path"))?;
        let route = segments.next().unwrap_or("").to_string();
        let name = segments.collect::<Vec<_>>().join("/");
        let append = parsed
            .query_pairs()
            .any(|(key, value)| key == "ioflags" && value == "2");

        let (status, response_body) = match (method, route.as_str()) {
            ("GET", "get") => match state.objects.get(&name) {
                Some(body) => (200, body.clone()),
                None => (404, Vec::new()),
            },
            ("HEAD", "get") => match state.objects.get(&name) {
                Some(_) => (200, Vec::new()),
                None => (404, Vec::new()),
            },
            ("POST", "upload") => {
                let content = body.unwrap_or_default();
                if append {
                    state.objects.entry(name).or_default().extend(content);
                } else {
                    state.objects.insert(name, content);
                }
                (200, Vec::new())
            }
            ("GET", "delete") => {
                state.objects.remove(&name);
                (200, Vec::new())
            }
            _ => (404, Vec::new()),
        };

        Ok(HttpResponse {
            status,
            body: response_body,
            url: url.to_string(),
        })
    }
}

impl Endpoint for MockEndpoint {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.dispatch("GET", url, None)
    }

    fn head(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.dispatch("HEAD", url, None)
    }

    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, TransportError> {
        self.dispatch("POST", url, Some(body))
    }
}
