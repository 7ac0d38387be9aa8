use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Artistic style tags offered to users
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ArtStyle {
    Photorealistic,
    #[default]
    DigitalArt,
    Abstract,
    Watercolor,
    OilPainting,
    Sketch,
    PixelArt,
    Vaporwave,
}

impl ArtStyle {
    /// Wire tag, e.g. `oil-painting`
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Human-readable label, e.g. `Oil painting`
    pub fn label(self) -> String {
        let spaced = self.as_str().replace('-', " ");
        let mut chars = spaced.chars();
        chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default()
    }

    /// One-line description shown next to the style picker
    pub const fn description(self) -> &'static str {
        match self {
            Self::Photorealistic => "Ultra-detailed images that appear like photographs",
            Self::DigitalArt => "Clean, polished digital artwork with vivid colors",
            Self::Abstract => "Non-representational art using shapes, colors, and forms",
            Self::Watercolor => "Soft, translucent appearance with gentle color blending",
            Self::OilPainting => "Rich textures and depth similar to traditional oil painting",
            Self::Sketch => "Hand-drawn appearance with line work and shading",
            Self::PixelArt => "Retro-styled imagery with visible pixel structure",
            Self::Vaporwave => "Nostalgic 80s/90s aesthetic with neon colors and glitch effects",
        }
    }
}

/// Output size presets offered to users
///
/// The server accepts any `WxH` string; these are the dimensions the
/// default SDXL engine supports and the form exposes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum ImageSize {
    #[serde(rename = "1024x1024")]
    #[strum(serialize = "1024x1024")]
    #[default]
    Square,
    #[serde(rename = "1152x896")]
    #[strum(serialize = "1152x896")]
    Landscape,
    #[serde(rename = "896x1152")]
    #[strum(serialize = "896x1152")]
    Portrait,
}

impl ImageSize {
    /// Wire form, e.g. `1152x896`
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Width and height in pixels
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Square => (1024, 1024),
            Self::Landscape => (1152, 896),
            Self::Portrait => (896, 1152),
        }
    }
}
