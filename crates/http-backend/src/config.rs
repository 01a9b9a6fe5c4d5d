/// Builder for [`HttpBackendConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpBackendConfigBuilder {
    base_url: String,
    chat_path: Option<String>,
    health_path: Option<String>,
}

impl HttpBackendConfigBuilder {
    /// Creates a builder with the given base URL, e.g.
    /// `https://miniapp.example.com`.
    #[inline]
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: None,
            health_path: None,
        }
    }

    /// Sets a custom path for the chat endpoint.
    #[inline]
    pub fn with_chat_path<S: Into<String>>(mut self, path: S) -> Self {
        self.chat_path = Some(path.into());
        self
    }

    /// Sets a custom path for the health endpoint.
    #[inline]
    pub fn with_health_path<S: Into<String>>(mut self, path: S) -> Self {
        self.health_path = Some(path.into());
        self
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> HttpBackendConfig {
        HttpBackendConfig {
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            chat_path: self.chat_path.unwrap_or_else(|| "/api/chat".to_owned()),
            health_path: self
                .health_path
                .unwrap_or_else(|| "/health".to_owned()),
        }
    }
}

/// Configuration for the HTTP chat backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HttpBackendConfig {
    pub(crate) base_url: String,
    pub(crate) chat_path: String,
    pub(crate) health_path: String,
}

impl HttpBackendConfig {
    #[inline]
    pub(crate) fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, self.chat_path)
    }

    #[inline]
    pub(crate) fn health_url(&self) -> String {
        format!("{}{}", self.base_url, self.health_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config =
            HttpBackendConfigBuilder::with_base_url("http://localhost:5000/")
                .build();
        assert_eq!(config.chat_url(), "http://localhost:5000/api/chat");
        assert_eq!(config.health_url(), "http://localhost:5000/health");
    }

    #[test]
    fn test_custom_paths() {
        let config = HttpBackendConfigBuilder::with_base_url("https://a.b")
            .with_chat_path("/v2/chat")
            .with_health_path("/ping")
            .build();
        assert_eq!(config.chat_url(), "https://a.b/v2/chat");
        assert_eq!(config.health_url(), "https://a.b/ping");
    }
}
