use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use tokio::sync::RwLock;

use crate::domain::{
    common::entities::app_errors::CoreError,
    image::{entities::ImageHandle, ports::ImageStore},
};

#[derive(Debug, Clone, Default)]
pub struct InMemoryImageStore {
    objects: Arc<RwLock<HashMap<ImageHandle, Bytes>>>,
}

impl InMemoryImageStore {
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl ImageStore for InMemoryImageStore {
    async fn put(
        &self,
        handle: ImageHandle,
        data: Bytes,
        _content_type: String,
    ) -> Result<(), CoreError> {
        self.objects.write().await.insert(handle, data);
        Ok(())
    }

    async fn read(&self, handle: &ImageHandle) -> Result<Bytes, CoreError> {
        self.objects
            .read()
            .await
            .get(handle)
            .cloned()
            .ok_or_else(|| CoreError::ReadError(format!("image {} is not stored", handle)))
    }

    async fn delete(&self, handle: &ImageHandle) -> Result<(), CoreError> {
        self.objects.write().await.remove(handle);
        Ok(())
    }
}
