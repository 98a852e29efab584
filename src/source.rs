//! Data-source collaborator: page descriptors and texture loading.
//!
//! The page list arrives as ordered `{id, url}` descriptors. Every image must
//! be resolved to a texture, in descriptor order, before the first layout.

#[cfg(test)]
#[path = "source_test.rs"]
mod source_test;

use std::future::Future;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::scene::TextureHandle;
use crate::viewport::Size;

/// Error returned while loading the page set.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The descriptor list is not valid JSON of the expected shape.
    #[error("invalid page descriptors: {0}")]
    Descriptors(#[from] serde_json::Error),
    /// A page image could not be fetched or decoded.
    #[error("failed to load page {id} from {url}: {reason}")]
    Texture { id: u64, url: String, reason: String },
}

impl ErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Descriptors(_) => "E_PAGE_DESCRIPTORS",
            Self::Texture { .. } => "E_PAGE_TEXTURE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Texture { .. })
    }
}

/// One page as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub id: u64,
    pub url: String,
}

/// A texture resolved by a [`TextureLoader`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedTexture {
    pub texture: TextureHandle,
    /// Natural size of the source image.
    pub size: Size,
}

/// A descriptor together with its resolved texture, ready for layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadedPage {
    pub descriptor_id: u64,
    pub texture: TextureHandle,
    pub size: Size,
}

/// Resolves an image URL into a texture.
pub trait TextureLoader {
    /// Load one image. The error string is wrapped into [`LoadError::Texture`].
    fn load(&self, url: &str) -> impl Future<Output = Result<LoadedTexture, String>>;
}

/// Parse a JSON array of page descriptors.
///
/// # Errors
///
/// Returns [`LoadError::Descriptors`] when the JSON does not match.
pub fn parse_descriptors(json: &str) -> Result<Vec<PageDescriptor>, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Load every descriptor's texture concurrently, keeping descriptor order.
///
/// # Errors
///
/// Fails with the first [`LoadError::Texture`]; no partial page set is returned.
pub async fn load_textures<L: TextureLoader>(
    loader: &L,
    descriptors: &[PageDescriptor],
) -> Result<Vec<LoadedPage>, LoadError> {
    try_join_all(descriptors.iter().map(|d| async move {
        let loaded = loader.load(&d.url).await.map_err(|reason| LoadError::Texture {
            id: d.id,
            url: d.url.clone(),
            reason,
        })?;
        Ok::<_, LoadError>(LoadedPage { descriptor_id: d.id, texture: loaded.texture, size: loaded.size })
    }))
    .await
}
