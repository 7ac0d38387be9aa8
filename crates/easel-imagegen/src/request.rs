use easel_core::GenerationRequest;
use serde::Serialize;

use crate::error::{ImageGenError, Result};

/// Classifier-free guidance scale sent with every request
pub const CFG_SCALE: u32 = 7;

/// Diffusion steps sent with every request
pub const STEPS: u32 = 30;

/// Images requested per call
pub const SAMPLES: u32 = 1;

/// Weighted text prompt; positive weights steer toward, negative away
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPrompt {
    pub text: String,
    pub weight: f32,
}

/// Text-to-image request body in the provider's wire format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderPayload {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: u32,
    pub height: u32,
    pub width: u32,
    pub steps: u32,
    pub samples: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Check a client request and shape it into a provider payload
///
/// Prompt, style and size must be non-blank and the size must be `WxH`
/// with positive integer sides. Style is not restricted to the presets.
pub fn validate(request: &GenerationRequest) -> Result<ProviderPayload> {
    let missing: Vec<&str> = [
        ("prompt", &request.prompt),
        ("style", &request.style),
        ("size", &request.size),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if !missing.is_empty() {
        return Err(ImageGenError::InvalidRequest(format!(
            "Missing required parameters: prompt, style, and size are required (missing: {})",
            missing.join(", ")
        )));
    }

    let (width, height) = parse_size(&request.size)?;

    Ok(ProviderPayload {
        text_prompts: text_prompts(&request.prompt, &request.style, negative_prompt(request)),
        cfg_scale: CFG_SCALE,
        height,
        width,
        steps: STEPS,
        samples: SAMPLES,
        seed: request.seed,
    })
}

/// Parse `WxH` into `(width, height)`
pub fn parse_size(size: &str) -> Result<(u32, u32)> {
    let invalid = || {
        ImageGenError::InvalidRequest(format!(
            "Invalid size '{size}': expected WIDTHxHEIGHT, e.g. 1024x1024"
        ))
    };

    let (width, height) = size.trim().split_once('x').ok_or_else(invalid)?;
    let width: u32 = width.parse().map_err(|_| invalid())?;
    let height: u32 = height.parse().map_err(|_| invalid())?;

    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}

/// Negative prompt, if one was given with any content
pub(crate) fn negative_prompt(request: &GenerationRequest) -> Option<&str> {
    request
        .negative_prompt
        .as_deref()
        .filter(|text| !text.trim().is_empty())
}

fn text_prompts(prompt: &str, style: &str, negative: Option<&str>) -> Vec<TextPrompt> {
    let mut prompts = vec![TextPrompt {
        text: format!("{prompt} in style: {}", style.replace('-', " ")),
        weight: 1.0,
    }];

    if let Some(text) = negative {
        prompts.push(TextPrompt {
            text: text.to_owned(),
            weight: -1.0,
        });
    }

    prompts
}
