//! Domain types shared by the Easel server, storage layer and client

#![allow(clippy::must_use_candidate)]

mod error;
mod style;
mod types;

pub use error::HttpError;
pub use style::{ArtStyle, ImageSize};
pub use types::{GeneratedImage, GenerationRequest};
