use easel_core::{ArtStyle, GeneratedImage, GenerationRequest};

use crate::client::EaselClient;

/// Banner text when the initial listing fails
pub const GALLERY_LOAD_FAILED: &str = "Failed to load your gallery. Please try refreshing the page.";

/// Client-side view of generated images
///
/// Holds the list newest first, the most recently generated image, and the
/// current error banner. Rebuilt from the server with [`Gallery::rehydrate`].
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    images: Vec<GeneratedImage>,
    current: Option<GeneratedImage>,
    error: Option<String>,
    generating: bool,
}

impl Gallery {
    /// Empty gallery
    pub fn new() -> Self {
        Self::default()
    }

    /// Images, newest first
    pub fn images(&self) -> &[GeneratedImage] {
        &self.images
    }

    /// Last image generated in this session, until closed
    pub const fn current(&self) -> Option<&GeneratedImage> {
        self.current.as_ref()
    }

    /// Error banner text, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn is_generating(&self) -> bool {
        self.generating
    }

    /// Replace local state with the server's listing
    ///
    /// On failure the existing images are kept and the banner is set.
    pub async fn rehydrate(&mut self, client: &EaselClient) {
        match client.fetch_generated_images().await {
            Ok(images) => {
                self.images = images;
                self.error = None;
            }
            Err(_) => self.error = Some(GALLERY_LOAD_FAILED.to_owned()),
        }
    }

    /// Generate one image and prepend it on success
    ///
    /// A blank prompt is ignored without contacting the server.
    pub async fn generate(&mut self, client: &EaselClient, request: &GenerationRequest) {
        if request.prompt.trim().is_empty() {
            return;
        }

        self.generating = true;
        self.current = None;
        self.error = None;

        match client.generate_image(request).await {
            Ok(image) => {
                self.images.insert(0, image.clone());
                self.current = Some(image);
            }
            Err(e) => self.error = Some(e.user_message()),
        }

        self.generating = false;
    }

    /// Dismiss the current image; it stays in the list
    pub fn close_current(&mut self) {
        self.current = None;
    }

    /// Images with the given style, or all of them for `None`
    pub fn filter_by_style(&self, style: Option<ArtStyle>) -> Vec<&GeneratedImage> {
        self.images
            .iter()
            .filter(|image| style.is_none_or(|style| image.style == style.as_str()))
            .collect()
    }

    /// Distinct style tags present, in first-seen order
    pub fn styles(&self) -> Vec<&str> {
        let mut styles: Vec<&str> = Vec::new();
        for image in &self.images {
            if !styles.contains(&image.style.as_str()) {
                styles.push(&image.style);
            }
        }
        styles
    }
}
