//! Field deserializers that treat blank values as absent
//!
//! Secrets are usually injected with `{{ env.VAR | default("") }}`, so an
//! unset variable arrives as an empty string rather than a missing key.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

/// Deserialize an optional secret, mapping blank strings to `None`
pub fn optional_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from))
}

/// Deserialize an optional http(s) URL, mapping blank strings to `None`
pub fn optional_url<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_http_url(raw).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Deserialize a required http(s) URL
pub fn http_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_http_url(raw.trim()).map_err(serde::de::Error::custom)
}

fn parse_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL `{raw}`: {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("URL `{raw}` must use http or https"));
    }

    Ok(url)
}
