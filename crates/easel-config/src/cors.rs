use std::time::Duration;

use serde::Deserialize;

/// CORS configuration
///
/// The defaults allow browsers on any origin to call the generation and
/// gallery endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (wildcard "*" or explicit list)
    #[serde(default)]
    pub origins: AnyOrArray,
    /// Allowed HTTP methods
    #[serde(default = "default_methods")]
    pub methods: AnyOrArray,
    /// Allowed request headers
    #[serde(default = "default_headers")]
    pub headers: AnyOrArray,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: AnyOrArray::Any,
            methods: default_methods(),
            headers: default_headers(),
            max_age: None,
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

fn default_methods() -> AnyOrArray {
    AnyOrArray::List(vec!["GET".to_owned(), "POST".to_owned(), "OPTIONS".to_owned()])
}

fn default_headers() -> AnyOrArray {
    AnyOrArray::List(vec!["content-type".to_owned(), "authorization".to_owned()])
}

/// Either a wildcard "*" or explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnyOrArray {
    /// Match any value
    #[default]
    Any,
    /// Explicit list
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AnyOrArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;

        struct AnyOrArrayVisitor;

        impl<'de> de::Visitor<'de> for AnyOrArrayVisitor {
            type Value = AnyOrArray;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("\"*\" or array of strings")
            }

            fn visit_str<E>(self, v: &str) -> Result<AnyOrArray, E>
            where
                E: de::Error,
            {
                Ok(if v == "*" {
                    AnyOrArray::Any
                } else {
                    AnyOrArray::List(vec![v.to_owned()])
                })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<AnyOrArray, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                let mut any = false;
                while let Some(value) = seq.next_element::<String>()? {
                    any |= value == "*";
                    values.push(value);
                }
                Ok(if any { AnyOrArray::Any } else { AnyOrArray::List(values) })
            }
        }

        deserializer.deserialize_any(AnyOrArrayVisitor)
    }
}
