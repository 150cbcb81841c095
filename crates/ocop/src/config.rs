//! Client configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ocop_media::{DEFAULT_BASE_URL, DEFAULT_PLACEHOLDER_URL, ResolverConfig};
use ocop_protocol::Role;
use serde::{Deserialize, Serialize};

use crate::OcopError;

/// Where the web admin keeps its credential when no path is configured.
pub const DEFAULT_CREDENTIAL_FILE: &str = ".ocop/credential";

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// Which client application is running.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Browser admin. The credential must survive restarts.
    #[default]
    WebAdmin,

    /// Native mobile admin. Keeping the credential is best-effort.
    MobileAdmin,

    /// Customer-facing shop.
    Storefront,
}

impl Surface {
    /// The role a principal needs to use this surface's protected screens.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Self::WebAdmin | Self::MobileAdmin => Some(Role::Admin),
            Self::Storefront => None,
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebAdmin => write!(f, "web_admin"),
            Self::MobileAdmin => write!(f, "mobile_admin"),
            Self::Storefront => write!(f, "storefront"),
        }
    }
}

impl FromStr for Surface {
    type Err = OcopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "web_admin" | "web" => Ok(Self::WebAdmin),
            "mobile_admin" | "mobile" => Ok(Self::MobileAdmin),
            "storefront" | "store" => Ok(Self::Storefront),
            other => Err(OcopError::Config(format!("unknown surface {other:?}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Everything a client surface needs to wire up its session and resolver.
///
/// Missing fields take their defaults, so a JSON file only needs the
/// values that differ:
///
/// ```json
/// { "api_base_url": "https://shop.ocop.vn/api", "surface": "storefront" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the backend API. Also the base for image references.
    pub api_base_url: String,

    /// Image shown for missing references.
    pub placeholder_url: String,

    /// Which client this is.
    pub surface: Surface,

    /// File for the persisted credential. When unset, the web admin uses
    /// [`DEFAULT_CREDENTIAL_FILE`] and the other surfaces keep it in memory.
    pub credential_path: Option<PathBuf>,

    /// Per-request timeout for auth calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            surface: Surface::default(),
            credential_path: None,
            request_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `OCOP_*` environment variables.
    ///
    /// # Errors
    /// [`OcopError::Config`] if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, OcopError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through
    /// `lookup`.
    ///
    /// # Errors
    /// [`OcopError::Config`] if a variable is set to an unparsable value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, OcopError> {
        let mut config = Self::default();
        if let Some(url) = lookup("OCOP_API_URL") {
            config.api_base_url = url;
        }
        if let Some(url) = lookup("OCOP_PLACEHOLDER_URL") {
            config.placeholder_url = url;
        }
        if let Some(surface) = lookup("OCOP_SURFACE") {
            config.surface = surface.parse()?;
        }
        if let Some(path) = lookup("OCOP_CREDENTIAL_PATH") {
            config.credential_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("OCOP_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = secs.trim().parse().map_err(|_| {
                OcopError::Config(format!(
                    "OCOP_REQUEST_TIMEOUT_SECS must be a whole number, got {secs:?}"
                ))
            })?;
        }
        Ok(config)
    }

    /// Parses a JSON config file's contents.
    ///
    /// # Errors
    /// [`OcopError::Config`] if the JSON is malformed.
    pub fn from_json(bytes: &[u8]) -> Result<Self, OcopError> {
        serde_json::from_slice(bytes)
            .map_err(|e| OcopError::Config(format!("config file: {e}")))
    }

    /// Checks the values that can't be checked by the type system.
    ///
    /// # Errors
    /// - [`OcopError::Transport`] — the base URL is not a usable `http(s)` URL
    /// - [`OcopError::Config`] — the timeout is zero
    pub fn validate(&self) -> Result<(), OcopError> {
        ocop_transport::normalize_base_url(&self.api_base_url)?;
        if self.request_timeout_secs == 0 {
            return Err(OcopError::Config(
                "request timeout must be at least one second".into(),
            ));
        }
        Ok(())
    }

    /// The request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Where the credential is persisted, or `None` for in-memory.
    pub fn effective_credential_path(&self) -> Option<PathBuf> {
        match (&self.credential_path, self.surface) {
            (Some(path), _) => Some(path.clone()),
            (None, Surface::WebAdmin) => Some(PathBuf::from(DEFAULT_CREDENTIAL_FILE)),
            (None, Surface::MobileAdmin | Surface::Storefront) => None,
        }
    }

    /// The resolver settings derived from this config.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            base_url: self.api_base_url.clone(),
            placeholder_url: self.placeholder_url.clone(),
        }
    }
}
