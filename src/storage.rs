use tracing::debug;
use url::form_urlencoded;

use crate::{
    endpoint::{http::HttpEndpoint, Endpoint},
    error::{Error, Result},
    file::EllipticsFile,
    settings::Settings,
};

// DNET_IO_FLAGS_APPEND = (1 << 1), passed to the store verbatim.
const IOFLAGS_APPEND: &str = "2";

/// Adapter over the two elliptics HTTP endpoints. Translates the five
/// primitive operations into single requests; owns the resolved settings.
pub struct EllipticsStorage {
    settings: Settings,
    client: Box<dyn Endpoint>,
}

impl EllipticsStorage {
    pub fn new(settings: Settings) -> Self {
        Self::with_client(settings, Box::new(HttpEndpoint::new()))
    }

    /// Injects the transport, used to run against a fake backend.
    pub fn with_client(settings: Settings, client: Box<dyn Endpoint>) -> Self {
        Self { settings, client }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Opens a single-use file handle for `name`. Fails when `mode` names no
    /// access mode or requests combined read/write access.
    pub fn open<'a>(&'a self, name: &str, mode: &str) -> Result<EllipticsFile<'a>> {
        EllipticsFile::new(name, self, mode)
    }

    /// Best-effort removal. The response status is never inspected and
    /// transport failures are swallowed, so this cannot fail observably.
    pub fn delete(&self, name: &str) {
        let url = self.private_url(&["delete", name], &[]);

        if let Err(err) = self.client.get(&url) {
            debug!(url = %url, error_message = %err, "delete request failed");
        }
    }

    /// True iff the private endpoint answers a HEAD with status 200. Any
    /// other status or a transport failure yields false, never an error.
    pub fn exists(&self, name: &str) -> bool {
        let url = self.private_url(&["get", name], &[]);

        match self.client.head(&url) {
            Ok(response) => response.status == 200,
            Err(_) => false,
        }
    }

    /// Public download URL for `name`. No request is made.
    pub fn url(&self, name: &str) -> String {
        make_url(&self.settings.public_url, &["get", name], &[])
    }

    /// Uploads `content` as the whole object body, appending instead of
    /// overwriting when `append` is set. Returns the name the object was
    /// stored under, which is `name` unchanged.
    pub fn save(&self, name: &str, content: &[u8], append: bool) -> Result<String> {
        let mut args: Vec<(&str, &str)> = Vec::new();
        if append {
            args.push(("ioflags", IOFLAGS_APPEND));
        }

        let url = self.private_url(&["upload", name], &args);
        debug!(url = %url, bytes = content.len(), append, "uploading");

        let response = self.client.post(&url, content.to_vec())?;
        if response.status != 200 {
            return Err(Error::Save {
                status: response.status,
                url,
            });
        }

        Ok(name.to_string())
    }

    /// Downloads the whole object body from the private endpoint.
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.private_url(&["get", name], &[]);

        let response = self.client.get(&url)?;
        if response.status != 200 {
            return Err(Error::Read {
                status: response.status,
                url,
            });
        }

        debug!(url = %url, bytes = response.body.len(), "fetched");

        Ok(response.body)
    }

    fn private_url(&self, parts: &[&str], args: &[(&str, &str)]) -> String {
        make_url(&self.settings.private_url, parts, args)
    }
}

/// Joins the base and path parts with single slashes, trimming slashes off
/// every part first, then appends the url-encoded query args in order.
fn make_url(base: &str, parts: &[&str], args: &[(&str, &str)]) -> String {
    let mut url = std::iter::once(base)
        .chain(parts.iter().copied())
        .map(|part| part.trim_matches('/'))
        .collect::<Vec<_>>()
        .join("/");

    if !args.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(args)
            .finish();
        url.push('?');
        url.push_str(&query);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::mock::MockEndpoint;

    fn mock_storage() -> (EllipticsStorage, MockEndpoint) {
        let mock = MockEndpoint::new();
        let storage =
            EllipticsStorage::with_client(Settings::default(), Box::new(mock.clone()));

        (storage, mock)
    }

    #[test]
    fn test_make_url_strips_slashes() {
        let cases = vec![
            ("http://pub/", "http://pub/get/foo.txt"),
            ("http://pub", "http://pub/get/foo.txt"),
            ("http://pub//", "http://pub/get/foo.txt"),
        ];

        for (base, expected) in cases {
            let result = make_url(base, &["get", "foo.txt"], &[]);
            assert_eq!(result, expected, "failed for case: {}", base);
        }
    }

    #[test]
    fn test_make_url_query_args() {
        let result = make_url(
            "http://priv/",
            &["upload", "foo.txt"],
            &[("ioflags", "2"), ("key", "a b")],
        );

        assert_eq!(result, "http://priv/upload/foo.txt?ioflags=2&key=a+b");
    }

    #[test]
    fn test_url_is_pure() {
        let (storage, mock) = mock_storage();

        let result = storage.url("foo.txt");

        assert_eq!(result, "http://localhost:8080/get/foo.txt");
        assert_eq!(mock.requests().len(), 0);
    }

    #[test]
    fn test_exists() {
        let cases = vec![
            ("present", Some(200u16), true),
            ("missing", None, false),
            ("error", Some(500), false),
        ];

        for (case, forced_status, expected) in cases {
            let mock = MockEndpoint::new().with_object("foo.txt", b"data");
            if let Some(status) = forced_status {
                mock.force_status(status);
            }
            let storage =
                EllipticsStorage::with_client(Settings::default(), Box::new(mock.clone()));

            let name = if case == "missing" { "bar.txt" } else { "foo.txt" };
            let result = storage.exists(name);

            assert_eq!(result, expected, "failed for case: {}", case);
            assert_eq!(
                mock.requests(),
                vec![(
                    "HEAD".to_string(),
                    format!("http://localhost:9000/get/{}", name)
                )],
                "failed request log for case: {}",
                case
            );
        }
    }

    #[test]
    fn test_exists_swallows_transport_failures() {
        let (storage, mock) = mock_storage();
        mock.refuse_connections();

        assert!(!storage.exists("foo.txt"));
    }

    #[test]
    fn test_delete_ignores_outcome() {
        let cases = vec![("ok", None), ("error", Some(500u16)), ("refused", None)];

        for (case, forced_status) in cases {
            let (storage, mock) = mock_storage();
            if let Some(status) = forced_status {
                mock.force_status(status);
            }
            if case == "refused" {
                mock.refuse_connections();
            }

            storage.delete("foo.txt");

            if case != "refused" {
                assert_eq!(
                    mock.requests(),
                    vec![(
                        "GET".to_string(),
                        "http://localhost:9000/delete/foo.txt".to_string()
                    )],
                    "failed for case: {}",
                    case
                );
            }
        }
    }

    #[test]
    fn test_delete_removes_object() {
        let mock = MockEndpoint::new().with_object("foo.txt", b"data");
        let storage =
            EllipticsStorage::with_client(Settings::default(), Box::new(mock.clone()));

        storage.delete("foo.txt");

        assert_eq!(mock.object("foo.txt"), None);
    }

    #[test]
    fn test_save_and_fetch_round_trip() {
        let (storage, mock) = mock_storage();

        let name = storage.save("foo.txt", b"payload", false).unwrap();
        assert_eq!(name, "foo.txt");

        let body = storage.fetch("foo.txt").unwrap();
        assert_eq!(body, b"payload");
        assert_eq!(mock.object("foo.txt").unwrap(), b"payload");
    }

    #[test]
    fn test_save_append_flag() {
        let (storage, mock) = mock_storage();

        storage.save("foo.txt", b"one", false).unwrap();
        storage.save("foo.txt", b"two", true).unwrap();

        assert_eq!(
            mock.requests(),
            vec![
                (
                    "POST".to_string(),
                    "http://localhost:9000/upload/foo.txt".to_string()
                ),
                (
                    "POST".to_string(),
                    "http://localhost:9000/upload/foo.txt?ioflags=2".to_string()
                ),
            ]
        );
        assert_eq!(mock.object("foo.txt").unwrap(), b"onetwo");
    }

    #[test]
    fn test_save_error_carries_status_and_url() {
        let (storage, mock) = mock_storage();
        mock.force_status(507);

        let err = storage.save("foo.txt", b"payload", false).unwrap_err();

        assert!(matches!(err, Error::Save { status: 507, .. }));
        assert_eq!(
            err.to_string(),
            "got status code 507 while sending to http://localhost:9000/upload/foo.txt"
        );
    }

    #[test]
    fn test_fetch_error_carries_status_and_url() {
        let (storage, _mock) = mock_storage();

        let err = storage.fetch("foo.txt").unwrap_err();

        assert!(matches!(err, Error::Read { status: 404, .. }));
        assert_eq!(
            err.to_string(),
            "got status code 404 while reading http://localhost:9000/get/foo.txt"
        );
    }

    #[test]
    fn test_save_transport_failure_passes_through() {
        let (storage, mock) = mock_storage();
        mock.refuse_connections();

        let err = storage.save("foo.txt", b"payload", false).unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }
}
