use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Storage key of the raw bytes behind a [`PendingImage`].
///
/// The same key serves the preview, so releasing the stored bytes also
/// releases the display handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn for_image(image_id: Uuid) -> Self {
        Self(image_id.simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-supplied image held by a kitchen session.
///
/// Not `Clone`: [`release_image`](super::services::release_image) consumes
/// the value, so the stored bytes are released at most once.
#[derive(Debug, PartialEq)]
pub struct PendingImage {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub checksum_sha256: String,
    pub created_at: DateTime<Utc>,
    handle: ImageHandle,
}

impl PendingImage {
    pub fn new(
        id: Uuid,
        handle: ImageHandle,
        file_name: String,
        content_type: String,
        size_bytes: u64,
        checksum_sha256: String,
    ) -> Self {
        Self {
            id,
            file_name,
            content_type,
            size_bytes,
            checksum_sha256,
            created_at: Utc::now(),
            handle,
        }
    }

    pub fn handle(&self) -> &ImageHandle {
        &self.handle
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            id: self.id,
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size_bytes: self.size_bytes,
            checksum_sha256: self.checksum_sha256.clone(),
            created_at: self.created_at,
        }
    }

    pub fn source(&self) -> ImageSource {
        ImageSource {
            image_id: self.id,
            handle: self.handle.clone(),
            content_type: self.content_type.clone(),
        }
    }
}

/// Read-only view of a [`PendingImage`] handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageSummary {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub checksum_sha256: String,
    pub created_at: DateTime<Utc>,
}

/// What an in-flight submission needs to encode one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    pub image_id: Uuid,
    pub handle: ImageHandle,
    pub content_type: String,
}
