//! Server endpoint URLs.

use serde::Serialize;

use super::effective::{ClientSettings, ConfigError};

/// HTTP and WebSocket GraphQL endpoints derived from the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformUrl {
    secure: bool,
    host: String,
    port: Option<u16>,
    /// Base path, always ending in '/'.
    path: String,
}

impl PlatformUrl {
    /// `dev_port` replaces the base URL's port and `https` forces a secure
    /// scheme.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::ValidationError(format!("invalid base url: {}", settings.base_url));

        let (scheme, rest) = settings.base_url.split_once("://").ok_or_else(invalid)?;
        let secure = match scheme {
            "http" => settings.https,
            "https" => true,
            _ => return Err(invalid()),
        };

        let (authority, path) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, "/"),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port.parse::<u16>().map_err(|_| invalid())?)),
            None => (authority, None),
        };
        if host.is_empty() {
            return Err(invalid());
        }

        let mut path = path.to_string();
        if !path.ends_with('/') {
            path.push('/');
        }

        Ok(Self {
            secure,
            host: host.to_string(),
            port: settings.dev_port.or(port),
            path,
        })
    }

    fn endpoint(&self, scheme: &str) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}{}graphql", scheme, self.host, port, self.path),
            None => format!("{}://{}{}graphql", scheme, self.host, self.path),
        }
    }

    /// Endpoint for queries and mutations.
    pub fn http_endpoint(&self) -> String {
        self.endpoint(if self.secure { "https" } else { "http" })
    }

    /// Endpoint for subscriptions.
    pub fn ws_endpoint(&self) -> String {
        self.endpoint(if self.secure { "wss" } else { "ws" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> ClientSettings {
        ClientSettings {
            base_url: base_url.to_string(),
            ..ClientSettings::default()
        }
    }

    #[test]
    fn test_default_endpoints() {
        let url = PlatformUrl::from_settings(&ClientSettings::default()).unwrap();
        assert_eq!(url.http_endpoint(), "http://localhost:9999/graphql");
        assert_eq!(url.ws_endpoint(), "ws://localhost:9999/graphql");
    }

    #[test]
    fn test_base_path_and_secure_scheme() {
        let url = PlatformUrl::from_settings(&settings("https://stash.lan/app/")).unwrap();
        assert_eq!(url.http_endpoint(), "https://stash.lan/app/graphql");
        assert_eq!(url.ws_endpoint(), "wss://stash.lan/app/graphql");
    }

    #[test]
    fn test_dev_port_and_https_override() {
        let mut s = settings("http://localhost:3000/");
        s.dev_port = Some(9999);
        s.https = true;
        let url = PlatformUrl::from_settings(&s).unwrap();
        assert_eq!(url.http_endpoint(), "https://localhost:9999/graphql");
        assert_eq!(url.ws_endpoint(), "wss://localhost:9999/graphql");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(PlatformUrl::from_settings(&settings("ftp://host/")).is_err());
        assert!(PlatformUrl::from_settings(&settings("http://host:port/")).is_err());
        assert!(PlatformUrl::from_settings(&settings("http:///")).is_err());
    }
}
