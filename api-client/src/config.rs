//! Client configuration.

use std::time::Duration;

/// Configuration for [`crate::ApiClient`].
///
/// Provides production defaults; the base URL falls back to the
/// `DASHBOARD_API_URL` environment variable when set.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the dashboard API
    pub base_url: String,
    /// Path of the session refresh endpoint (default: `/auth/refresh`)
    pub refresh_path: String,
    /// Deadline for one transport attempt (default: 10s)
    pub attempt_deadline: Duration,
    /// Connection timeout (default: 10s)
    pub connect_timeout: Duration,
    /// Pool idle timeout (default: 90s)
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host (default: 10)
    pub pool_max_idle_per_host: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("DASHBOARD_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            refresh_path: "/auth/refresh".to_string(),
            attempt_deadline: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: "dashboard-client/0.1".to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the session refresh endpoint path.
    #[must_use]
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set the per-attempt deadline.
    #[must_use]
    pub const fn with_attempt_deadline(mut self, deadline: Duration) -> Self {
        self.attempt_deadline = deadline;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set connection pool parameters.
    #[must_use]
    pub const fn with_pool_config(mut self, idle_timeout: Duration, max_idle: usize) -> Self {
        self.pool_idle_timeout = idle_timeout;
        self.pool_max_idle_per_host = max_idle;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.refresh_path, "/auth/refresh");
        assert_eq!(config.attempt_deadline, Duration::from_secs(10));
        assert_eq!(config.pool_max_idle_per_host, 10);
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("https://api.example.test")
            .with_attempt_deadline(Duration::from_secs(3))
            .with_refresh_path("/session/refresh")
            .with_user_agent("test-agent");

        assert_eq!(config.base_url, "https://api.example.test");
        assert_eq!(config.attempt_deadline, Duration::from_secs(3));
        assert_eq!(config.refresh_path, "/session/refresh");
        assert_eq!(config.user_agent, "test-agent");
    }
}
