//! Session configuration.

use std::time::Duration;

use wreq_util::Emulation;

/// Default User-Agent: current Chrome on macOS.
pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Default `sec-ch-ua` browser signature.
pub(crate) const DEFAULT_SEC_CH_UA: &str =
    r#""Not;A=Brand";v="99", "Google Chrome";v="139", "Chromium";v="139""#;

/// Default `sec-ch-ua-platform` browser signature.
pub(crate) const DEFAULT_SEC_CH_UA_PLATFORM: &str = r#""macOS""#;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Default User-Agent, substituted for blank or sentinel values.
    pub user_agent: String,
    /// Default `sec-ch-ua`, substituted for blank or sentinel values.
    pub sec_ch_ua: String,
    /// Default `sec-ch-ua-platform`, substituted for blank or sentinel
    /// values.
    pub sec_ch_ua_platform: String,
    /// Per-request transport timeout.
    pub timeout: Duration,
    /// Browser fingerprint profile presented by the transport.
    pub profile: Emulation,
    /// Retry budget for request execution.
    pub max_retries: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sec_ch_ua: DEFAULT_SEC_CH_UA.to_string(),
            sec_ch_ua_platform: DEFAULT_SEC_CH_UA_PLATFORM.to_string(),
            timeout: Duration::from_secs(60),
            profile: Emulation::Chrome133,
            max_retries: 3,
        }
    }
}

impl SessionConfig {
    /// Create a configuration builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Override the default User-Agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Override the default `sec-ch-ua` signature.
    pub fn sec_ch_ua(mut self, sec_ch_ua: impl Into<String>) -> Self {
        self.config.sec_ch_ua = sec_ch_ua.into();
        self
    }

    /// Override the default `sec-ch-ua-platform` signature.
    pub fn sec_ch_ua_platform(mut self, platform: impl Into<String>) -> Self {
        self.config.sec_ch_ua_platform = platform.into();
        self
    }

    /// Set the per-request transport timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the browser fingerprint profile.
    pub fn profile(mut self, profile: Emulation) -> Self {
        self.config.profile = profile;
        self
    }

    /// Set the retry budget.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.max_retries, 3);
        assert!(config.user_agent.contains("Chrome"));
        assert!(config.sec_ch_ua.contains("Chromium"));
        assert_eq!(config.sec_ch_ua_platform, r#""macOS""#);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SessionConfig::builder()
            .user_agent("custom/1.0")
            .sec_ch_ua("brand")
            .sec_ch_ua_platform(r#""Linux""#)
            .timeout(Duration::from_secs(10))
            .profile(Emulation::Chrome133)
            .max_retries(7)
            .build();

        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.sec_ch_ua, "brand");
        assert_eq!(config.sec_ch_ua_platform, r#""Linux""#);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 7);
    }
}
