use bytes::Bytes;

use crate::domain::{
    common::{ImageStorageConfig, entities::app_errors::CoreError},
    image::{entities::ImageHandle, ports::ImageStore},
};

pub mod local;
pub mod memory;

pub use local::LocalImageStore;
pub use memory::InMemoryImageStore;

/// Image store selected by configuration.
#[derive(Debug, Clone)]
pub enum ImageStorage {
    Local(LocalImageStore),
    Memory(InMemoryImageStore),
}

impl ImageStorage {
    pub async fn from_config(config: &ImageStorageConfig) -> Result<Self, CoreError> {
        match config {
            ImageStorageConfig::Local { upload_dir } => {
                Ok(Self::Local(LocalImageStore::open(upload_dir.clone()).await?))
            }
            ImageStorageConfig::Memory => Ok(Self::Memory(InMemoryImageStore::default())),
        }
    }
}

impl ImageStore for ImageStorage {
    async fn put(
        &self,
        handle: ImageHandle,
        data: Bytes,
        content_type: String,
    ) -> Result<(), CoreError> {
        match self {
            Self::Local(store) => store.put(handle, data, content_type).await,
            Self::Memory(store) => store.put(handle, data, content_type).await,
        }
    }

    async fn read(&self, handle: &ImageHandle) -> Result<Bytes, CoreError> {
        match self {
            Self::Local(store) => store.read(handle).await,
            Self::Memory(store) => store.read(handle).await,
        }
    }

    async fn delete(&self, handle: &ImageHandle) -> Result<(), CoreError> {
        match self {
            Self::Local(store) => store.delete(handle).await,
            Self::Memory(store) => store.delete(handle).await,
        }
    }
}
