use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{ArtStyle, ImageSize};

/// Image generation request submitted by a client
///
/// Required fields default to empty so that presence checks happen in the
/// validator and surface as a regular request error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Text description of the desired image
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
    /// Style tag, e.g. `watercolor`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub style: String,
    /// Output size as `WxH`, e.g. `1024x1024`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub size: String,
    /// Things the image should avoid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Provider sampling seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl GenerationRequest {
    /// Build a request from one of the offered style and size presets
    pub fn new(prompt: impl Into<String>, style: ArtStyle, size: ImageSize) -> Self {
        Self {
            prompt: prompt.into(),
            style: style.as_str().to_owned(),
            size: size.as_str().to_owned(),
            negative_prompt: None,
            seed: None,
        }
    }

    /// Attach a negative prompt
    #[must_use]
    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    /// Attach a sampling seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Metadata record of a completed generation, as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedImage {
    /// Store-assigned identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Public location of the stored image
    pub url: String,
    pub prompt: String,
    pub style: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Insert time assigned by the store
    pub created_at: Timestamp,
}

impl GeneratedImage {
    /// Style as a known preset, if it is one
    pub fn art_style(&self) -> Option<ArtStyle> {
        self.style.parse().ok()
    }
}

/// Treat an explicit `null` like an absent field
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept identifiers stored either as text (uuid) or as integers (bigserial)
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de;

    struct IdVisitor;

    impl de::Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or integer identifier")
        }

        fn visit_str<E>(self, v: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(v.to_owned())
        }

        fn visit_u64<E>(self, v: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
