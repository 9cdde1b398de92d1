use bytes::Bytes;

/// A raw file as selected or dropped by the user.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }
}

/// Base64 payload of an image, without any data-URI prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub payload: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub content_type: String,
    pub data: Bytes,
}
