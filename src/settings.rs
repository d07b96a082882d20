use std::env;

pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080/";
pub const DEFAULT_PRIVATE_URL: &str = "http://localhost:9000/";

const PUBLIC_URL_VAR: &str = "ELLIPTICS_PUBLIC_URL";
const PRIVATE_URL_VAR: &str = "ELLIPTICS_PRIVATE_URL";

/// Base URLs of the two cluster endpoints. Immutable once resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Endpoint serving stored objects to clients.
    pub public_url: String,
    /// Endpoint accepting modification requests.
    pub private_url: String,
}

/// Caller-supplied partial configuration; unset fields fall back to the
/// environment and then to the built-in defaults.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    pub public_url: Option<String>,
    pub private_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            private_url: DEFAULT_PRIVATE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Resolves each URL once: override, then `ELLIPTICS_PUBLIC_URL` /
    /// `ELLIPTICS_PRIVATE_URL` from the environment, then the default.
    pub fn resolve(overrides: SettingsOverrides) -> Self {
        Self {
            public_url: resolve_url(overrides.public_url, PUBLIC_URL_VAR, DEFAULT_PUBLIC_URL),
            private_url: resolve_url(overrides.private_url, PRIVATE_URL_VAR, DEFAULT_PRIVATE_URL),
        }
    }
}

fn resolve_url(override_value: Option<String>, var: &str, default: &str) -> String {
    override_value
        .or_else(|| env::var(var).ok())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.public_url, "http://localhost:8080/");
        assert_eq!(settings.private_url, "http://localhost:9000/");
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::resolve(SettingsOverrides {
            public_url: Some("http://pub.example:80/".to_string()),
            private_url: Some("http://priv.example:90/".to_string()),
        });

        assert_eq!(settings.public_url, "http://pub.example:80/");
        assert_eq!(settings.private_url, "http://priv.example:90/");
    }

    #[test]
    fn test_partial_override_keeps_default() {
        let settings = Settings::resolve(SettingsOverrides {
            public_url: Some("http://pub.example/".to_string()),
            private_url: None,
        });

        assert_eq!(settings.public_url, "http://pub.example/");
        assert_eq!(settings.private_url, DEFAULT_PRIVATE_URL);
    }
}
