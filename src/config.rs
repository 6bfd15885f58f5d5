use std::sync::Arc;

use crate::cookie::{HelloCookieManager, HmacCookieManager};
use crate::types::CipherSuite;
use crate::Error;

/// Engine configuration.
///
/// Carries the extension availability policy: an extension disabled here
/// is silently skipped by its producers and consumers, never an error.
#[derive(Clone, Debug)]
pub struct Config {
    cipher_suites: Vec<CipherSuite>,
    cookie_enabled: bool,
    cookie_manager: Arc<dyn HelloCookieManager>,
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            cipher_suites: CipherSuite::all().to_vec(),
            cookie_enabled: true,
            cookie_manager: None,
        }
    }

    /// Cipher suites in preference order.
    #[inline(always)]
    pub fn cipher_suites(&self) -> &[CipherSuite] {
        &self.cipher_suites
    }

    /// Whether the HelloRetryRequest cookie extension is available.
    #[inline(always)]
    pub fn cookie_enabled(&self) -> bool {
        self.cookie_enabled
    }

    /// Manager that mints and validates stateless retry cookies.
    #[inline(always)]
    pub fn cookie_manager(&self) -> &Arc<dyn HelloCookieManager> {
        &self.cookie_manager
    }
}

/// Builder for engine configuration.
pub struct ConfigBuilder {
    cipher_suites: Vec<CipherSuite>,
    cookie_enabled: bool,
    cookie_manager: Option<Arc<dyn HelloCookieManager>>,
}

impl ConfigBuilder {
    /// Restrict the cipher suites offered/accepted.
    ///
    /// Defaults to all supported suites.
    pub fn cipher_suites(mut self, suites: Vec<CipherSuite>) -> Self {
        self.cipher_suites = suites;
        self
    }

    /// Enable or disable the cookie extension.
    ///
    /// Defaults to enabled.
    pub fn cookie_enabled(mut self, enabled: bool) -> Self {
        self.cookie_enabled = enabled;
        self
    }

    /// Replace the cookie manager.
    ///
    /// Defaults to an HMAC-SHA256 manager with a random per-process secret.
    pub fn cookie_manager(mut self, manager: Arc<dyn HelloCookieManager>) -> Self {
        self.cookie_manager = Some(manager);
        self
    }

    pub fn build(self) -> Result<Config, Error> {
        if self.cipher_suites.is_empty() {
            return Err(Error::ConfigError("no cipher suites configured"));
        }
        if self
            .cipher_suites
            .iter()
            .any(|s| matches!(s, CipherSuite::Unknown(_)))
        {
            return Err(Error::ConfigError("unknown cipher suite configured"));
        }

        let cookie_manager = self
            .cookie_manager
            .unwrap_or_else(|| Arc::new(HmacCookieManager::new()));

        Ok(Config {
            cipher_suites: self.cipher_suites,
            cookie_enabled: self.cookie_enabled,
            cookie_manager,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::builder()
            .build()
            .expect("Default config should always validate")
    }
}
