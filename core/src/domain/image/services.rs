use base64::{Engine as _, engine::general_purpose};
use futures::future::{join_all, try_join_all};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_uuid_v7},
    image::{
        entities::{ImageHandle, ImageSource, PendingImage},
        ports::ImageStore,
        value_objects::{EncodedImage, ImageFile},
    },
};

/// Store every file and return one [`PendingImage`] per file, in input order.
///
/// If a file cannot be stored, the images already stored for this batch are
/// released before the error is returned.
pub async fn add_images<IS>(store: &IS, files: Vec<ImageFile>) -> Result<Vec<PendingImage>, CoreError>
where
    IS: ImageStore,
{
    let mut images = Vec::with_capacity(files.len());

    for file in files {
        match store_image(store, file).await {
            Ok(image) => images.push(image),
            Err(e) => {
                release_images(store, images).await;
                return Err(e);
            }
        }
    }

    Ok(images)
}

async fn store_image<IS>(store: &IS, file: ImageFile) -> Result<PendingImage, CoreError>
where
    IS: ImageStore,
{
    let id = generate_uuid_v7();
    let handle = ImageHandle::for_image(id);
    let size_bytes = file.data.len() as u64;
    let checksum_sha256 = checksum_sha256(&file.data);

    store
        .put(handle.clone(), file.data, file.content_type.clone())
        .await?;

    debug!(image_id = %id, size_bytes, "stored pending image");

    Ok(PendingImage::new(
        id,
        handle,
        file.file_name,
        file.content_type,
        size_bytes,
        checksum_sha256,
    ))
}

/// Read the raw bytes of one image and encode them as plain base64.
pub async fn encode_image<IS>(store: &IS, source: &ImageSource) -> Result<EncodedImage, CoreError>
where
    IS: ImageStore,
{
    let data = store.read(&source.handle).await?;

    Ok(EncodedImage {
        payload: encode_payload(&data),
        content_type: source.content_type.clone(),
    })
}

/// Encode a batch concurrently. The output keeps the order of `sources`.
pub async fn encode_images<IS>(
    store: &IS,
    sources: &[ImageSource],
) -> Result<Vec<EncodedImage>, CoreError>
where
    IS: ImageStore,
{
    try_join_all(sources.iter().map(|source| encode_image(store, source))).await
}

pub async fn release_image<IS>(store: &IS, image: PendingImage)
where
    IS: ImageStore,
{
    if let Err(e) = store.delete(image.handle()).await {
        warn!(image_id = %image.id, error = %e, "failed to release image");
    }
}

pub async fn release_images<IS>(store: &IS, images: Vec<PendingImage>)
where
    IS: ImageStore,
{
    join_all(images.into_iter().map(|image| release_image(store, image))).await;
}

pub fn encode_payload(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

pub fn checksum_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
