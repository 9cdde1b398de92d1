use std::future::Future;

use bytes::Bytes;

use crate::domain::{common::entities::app_errors::CoreError, image::entities::ImageHandle};

/// Port for the raw bytes of pending images
pub trait ImageStore: Send + Sync + 'static {
    /// Store the bytes under the given handle, replacing anything already there
    fn put(
        &self,
        handle: ImageHandle,
        data: Bytes,
        content_type: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Read the bytes back; fails with `CoreError::ReadError` when they are gone
    fn read(&self, handle: &ImageHandle) -> impl Future<Output = Result<Bytes, CoreError>> + Send;

    /// Delete the bytes. Deleting an unknown handle is not an error.
    fn delete(&self, handle: &ImageHandle) -> impl Future<Output = Result<(), CoreError>> + Send;
}
