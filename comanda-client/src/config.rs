//! Client configuration

use std::fmt;
use std::str::FromStr;

use tracing::warn;

/// Deployment target; decides the default backend address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Browser build, backend on the same host
    #[default]
    Web,
    /// Android emulator, host reachable through the emulator loopback alias
    Android,
    Ios,
    Desktop,
}

impl Platform {
    /// Default backend URL for this target
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Android => "http://10.0.2.2:3000",
            Self::Web | Self::Ios | Self::Desktop => "http://localhost:3000",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Web => "web",
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Desktop => "desktop",
        })
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "desktop" => Ok(Self::Desktop),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Client configuration for connecting to the restaurant backend
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | COMANDA_PLATFORM | web | Deployment target |
/// | COMANDA_API_URL | per platform | Backend base URL |
/// | COMANDA_TIMEOUT_SECS | unset | Request timeout, none when unset |
/// | COMANDA_FETCH_CLOSED_TABS | false | Also load closed tabs on refresh (`1/true/yes/on`) |
///
/// Values that do not parse are logged and replaced by the default.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    pub platform: Platform,

    /// Request timeout in seconds; no timeout when `None`
    pub timeout_secs: Option<u64>,

    /// Load `GET /comandas/fechadas` on every refresh (feeds the sales report)
    pub fetch_closed_tabs: bool,
}

impl ClientConfig {
    /// Configuration for a platform, pointing at its default address
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            base_url: platform.default_base_url().to_string(),
            platform,
            timeout_secs: None,
            fetch_closed_tabs: false,
        }
    }

    /// Configuration with an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::from_env`] with variables read from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let platform = match var("COMANDA_PLATFORM").map(|p| p.parse::<Platform>()) {
            Some(Ok(platform)) => platform,
            Some(Err(e)) => {
                warn!(error = %e, "Ignoring COMANDA_PLATFORM");
                Platform::default()
            }
            None => Platform::default(),
        };

        let mut config = Self::for_platform(platform);
        if let Some(url) = var("COMANDA_API_URL") {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = var("COMANDA_TIMEOUT_SECS") {
            match raw.trim().parse() {
                Ok(secs) => config.timeout_secs = Some(secs),
                Err(_) => warn!(value = %raw, "Ignoring COMANDA_TIMEOUT_SECS"),
            }
        }
        if let Some(raw) = var("COMANDA_FETCH_CLOSED_TABS") {
            match parse_flag(&raw) {
                Some(enabled) => config.fetch_closed_tabs = enabled,
                None => warn!(value = %raw, "Ignoring COMANDA_FETCH_CLOSED_TABS"),
            }
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Switch platform. A base URL still at the old platform's default
    /// follows the switch; an explicit one is kept.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        if self.base_url == self.platform.default_base_url() {
            self.base_url = platform.default_base_url().to_string();
        }
        self.platform = platform;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = Some(seconds);
        self
    }

    pub fn with_closed_tabs(mut self, enabled: bool) -> Self {
        self.fetch_closed_tabs = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_platform(Platform::default())
    }
}
