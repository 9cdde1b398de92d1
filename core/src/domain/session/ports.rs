use std::future::Future;

use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    image::{
        entities::ImageSummary,
        value_objects::{ImageFile, ImagePreview},
    },
    session::value_objects::SessionSnapshot,
};

/// UI-facing operations of a kitchen session
pub trait SessionService: Send + Sync {
    fn create_session(&self) -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;

    fn get_session(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;

    /// Drop a session and release all of its images
    fn delete_session(&self, session_id: Uuid)
    -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Store the files and append them to the session; returns the new images
    fn add_images(
        &self,
        session_id: Uuid,
        files: Vec<ImageFile>,
    ) -> impl Future<Output = Result<Vec<ImageSummary>, CoreError>> + Send;

    /// Idempotent: removing an unknown image leaves the session unchanged
    fn remove_image(
        &self,
        session_id: Uuid,
        image_id: Uuid,
    ) -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;

    fn image_preview(
        &self,
        session_id: Uuid,
        image_id: Uuid,
    ) -> impl Future<Output = Result<ImagePreview, CoreError>> + Send;

    /// Encode every image and request recipes. Request failures end up in the
    /// snapshot's `error`, not in the returned `Result`.
    fn analyze(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;

    /// Ask for recipes not already held. A request failure is returned as an
    /// error while the session stays in `success`.
    fn generate_more(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;

    fn reset(&self, session_id: Uuid)
    -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;

    fn edit_images(
        &self,
        session_id: Uuid,
    ) -> impl Future<Output = Result<SessionSnapshot, CoreError>> + Send;
}
