use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bytes::Bytes;
use tracing::{error, info};

use crate::domain::{
    common::entities::app_errors::CoreError,
    image::{entities::ImageHandle, ports::ImageStore},
};

/// Spools uploaded images to files in a local directory.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    upload_dir: PathBuf,
}

impl LocalImageStore {
    pub async fn open(upload_dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let upload_dir = upload_dir.into();

        tokio::fs::create_dir_all(&upload_dir).await.map_err(|e| {
            error!("Failed to create upload directory {}: {}", upload_dir.display(), e);
            CoreError::StorageError(format!(
                "cannot create upload directory {}: {}",
                upload_dir.display(),
                e
            ))
        })?;

        info!(upload_dir = %upload_dir.display(), "local image store ready");

        Ok(Self { upload_dir })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    fn path_for(&self, handle: &ImageHandle) -> Result<PathBuf, CoreError> {
        let key = handle.as_str();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(CoreError::Invalid(format!("invalid image handle: {}", key)));
        }

        Ok(self.upload_dir.join(key))
    }
}

impl ImageStore for LocalImageStore {
    async fn put(
        &self,
        handle: ImageHandle,
        data: Bytes,
        _content_type: String,
    ) -> Result<(), CoreError> {
        let path = self.path_for(&handle)?;

        tokio::fs::write(&path, &data).await.map_err(|e| {
            error!("Failed to write image {}: {}", path.display(), e);
            CoreError::StorageError(format!("failed to write image {}: {}", handle, e))
        })
    }

    async fn read(&self, handle: &ImageHandle) -> Result<Bytes, CoreError> {
        let path = self.path_for(handle)?;

        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|e| CoreError::ReadError(format!("image {}: {}", handle, e)))
    }

    async fn delete(&self, handle: &ImageHandle) -> Result<(), CoreError> {
        let path = self.path_for(handle)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::StorageError(format!(
                "failed to delete image {}: {}",
                handle, e
            ))),
        }
    }
}
