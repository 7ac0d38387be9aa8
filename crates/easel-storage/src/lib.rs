//! Persistence for generated images
//!
//! Two seams: an [`ObjectStore`] for the image bytes and a
//! [`MetadataStore`] for the gallery rows. [`SupabaseStorage`] implements
//! both against a Supabase-compatible REST API.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod key;
mod metadata;
mod object;
mod supabase;

pub use error::{Result, StorageError};
pub use key::object_key;
pub use metadata::{MetadataStore, NewImageRecord};
pub use object::{ObjectStore, StoredObject};
pub use supabase::SupabaseStorage;
