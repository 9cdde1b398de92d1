use tracing::info;

use crate::{
    domain::common::{PantryChefConfig, entities::app_errors::CoreError, services::Service},
    infrastructure::{image_store::ImageStorage, llm::GeminiLLMClient},
};

pub type PantryChefService = Service<GeminiLLMClient, ImageStorage>;

pub async fn create_service(config: PantryChefConfig) -> Result<PantryChefService, CoreError> {
    let llm_client = GeminiLLMClient::new(&config.llm)?;
    let image_store = ImageStorage::from_config(&config.image_storage).await?;

    let service = Service::new(llm_client, image_store);
    let _sweeper = service.spawn_session_sweeper(config.session_ttl);

    info!(
        model = %config.llm.gemini_model,
        session_ttl_secs = config.session_ttl.as_secs(),
        "pantry chef service ready"
    );

    Ok(service)
}
