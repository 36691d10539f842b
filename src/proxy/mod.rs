//! Media proxy and download relay.
//!
//! Both handlers fetch an upstream byte resource on the client's behalf to
//! get around browser CORS and Range restrictions. They are stateless: each
//! request opens one upstream connection and streams the body back without
//! buffering it.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `/media?src=` | Seekable stream: forwards `Range`, passes streaming headers through |
//! | `/download?src=&filename=` | One-shot relay with `content-disposition: attachment` |

pub mod download;
pub mod media;

use std::time::Duration;

use reqwest::Url;

use crate::config::ProxyConfig;
use crate::server::ApiError;

pub use download::sanitize_filename;

/// Route of the media proxy; normalized audio URLs point here.
pub const MEDIA_ROUTE: &str = "/media";

/// Route of the download relay.
pub const DOWNLOAD_ROUTE: &str = "/download";

/// Desktop browser UA; several CDNs refuse unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Runtime settings for the media proxy.
#[derive(Debug, Clone)]
pub struct ProxySettings {
    /// Deadline for the upstream response head
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&ProxyConfig> for ProxySettings {
    fn from(config: &ProxyConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Parse and validate an upstream target: absolute http(s) only.
pub fn parse_target(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|_| ApiError::input("Invalid src"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ApiError::input("Unsupported protocol")),
    }
}
