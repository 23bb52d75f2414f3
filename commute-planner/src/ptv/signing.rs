//! Request signing for the PTV Timetable API.
//!
//! Every request carries the developer id as `devid` and a `signature`
//! parameter: the HMAC-SHA1 of the path and query (including `devid`),
//! keyed by the API key, hex-encoded.

use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::error::PtvError;

type HmacSha1 = Hmac<Sha1>;

/// Signs request paths with a developer id and key.
#[derive(Clone)]
pub struct RequestSigner {
    dev_id: String,
    api_key: String,
}

impl RequestSigner {
    pub fn new(dev_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            dev_id: dev_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Append `devid` to a path, using `&` if it already has a query.
    pub fn with_dev_id(&self, path: &str) -> String {
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{path}{separator}devid={}", self.dev_id)
    }

    /// Signature for a path. The path must not yet contain `devid`.
    pub fn signature(&self, path: &str) -> Result<String, PtvError> {
        hmac_sha1_hex(&self.api_key, &self.with_dev_id(path))
    }

    /// Full request URL: base, path with `devid`, then `signature`.
    pub fn signed_url(&self, base_url: &str, path: &str) -> Result<String, PtvError> {
        let signature = self.signature(path)?;
        Ok(format!(
            "{base_url}{}&signature={signature}",
            self.with_dev_id(path)
        ))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("dev_id", &self.dev_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn hmac_sha1_hex(key: &str, message: &str) -> Result<String, PtvError> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| PtvError::NotConfigured(format!("invalid signing key: {e}")))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
