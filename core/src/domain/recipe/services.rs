use tracing::{debug, error, instrument};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    image::{ports::ImageStore, value_objects::EncodedImage},
    recipe::{
        entities::AnalysisResult,
        ports::{LLMClient, RecipeService},
        prompt::{CHEF_PERSONA, build_recipe_prompt},
        schema::get_recipe_schema,
        value_objects::{ContentPart, GenerationRequest},
    },
};

/// Images first, in input order, then the single instruction part.
pub fn build_generation_request(
    images: Vec<EncodedImage>,
    exclude_titles: &[String],
) -> GenerationRequest {
    let mut parts: Vec<ContentPart> = images
        .into_iter()
        .map(|image| ContentPart::InlineData {
            mime_type: image.content_type,
            data: image.payload,
        })
        .collect();
    parts.push(ContentPart::Text(build_recipe_prompt(exclude_titles)));

    GenerationRequest {
        parts,
        system_instruction: CHEF_PERSONA.to_string(),
        response_mime_type: "application/json".to_string(),
        response_schema: get_recipe_schema(),
    }
}

/// Parse the model's text as an [`AnalysisResult`]. Every field is required
/// and `difficulty` must be one of the declared values.
pub fn parse_analysis_result(raw_response: &str) -> Result<AnalysisResult, CoreError> {
    if raw_response.trim().is_empty() {
        return Err(CoreError::EmptyResponse);
    }

    serde_json::from_str(raw_response).map_err(|e| {
        error!("Failed to parse LLM response: {}", e);
        CoreError::MalformedResponse(e.to_string())
    })
}

impl<LLM, IS> RecipeService for Service<LLM, IS>
where
    LLM: LLMClient,
    IS: ImageStore,
{
    #[instrument(skip_all, fields(images = images.len(), excluded = exclude_titles.len()))]
    async fn request_recipes(
        &self,
        images: Vec<EncodedImage>,
        exclude_titles: Vec<String>,
    ) -> Result<AnalysisResult, CoreError> {
        let request = build_generation_request(images, &exclude_titles);

        let raw_response = self
            .llm_client
            .generate_content(request)
            .await
            .inspect_err(|e| error!("Recipe generation failed: {}", e))?;

        let result = parse_analysis_result(&raw_response)?;

        debug!(
            ingredients = result.identified_ingredients.len(),
            recipes = result.recipes.len(),
            "recipe suggestions received"
        );

        Ok(result)
    }
}
