#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the Easel server
//!
//! Wraps the generation and listing endpoints, translates failures into
//! messages fit for end users, and provides [`Gallery`], the state a UI
//! keeps between requests.

mod client;
pub mod error;
mod gallery;

pub use client::EaselClient;
pub use easel_core::{ArtStyle, GeneratedImage, GenerationRequest, ImageSize};
pub use error::{EaselClientError, Result};
pub use gallery::Gallery;
