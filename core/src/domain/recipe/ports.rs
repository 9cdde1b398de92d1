use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    image::value_objects::EncodedImage,
    recipe::{entities::AnalysisResult, value_objects::GenerationRequest},
};

/// LLM Client trait for calling multimodal models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync + 'static {
    /// Run one generation and return the raw text of the answer.
    ///
    /// Fails with `CoreError::EmptyResponse` when the model answered without
    /// text and with `CoreError::TransportError` for network, auth or quota
    /// failures.
    fn generate_content(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for turning kitchen photos into recipe suggestions
pub trait RecipeService: Send + Sync {
    fn request_recipes(
        &self,
        images: Vec<EncodedImage>,
        exclude_titles: Vec<String>,
    ) -> impl Future<Output = Result<AnalysisResult, CoreError>> + Send;
}
