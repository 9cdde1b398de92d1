use std::sync::Arc;

use crate::domain::{
    image::ports::ImageStore, recipe::ports::LLMClient, session::store::SessionStore,
};

/// Shared handle to every port the domain services need.
///
/// Cloning is cheap: adapters are reference counted and the session store is
/// shared between clones.
pub struct Service<LLM, IS>
where
    LLM: LLMClient,
    IS: ImageStore,
{
    pub(crate) llm_client: Arc<LLM>,
    pub(crate) image_store: Arc<IS>,
    pub(crate) sessions: SessionStore,
}

impl<LLM, IS> Service<LLM, IS>
where
    LLM: LLMClient,
    IS: ImageStore,
{
    pub fn new(llm_client: LLM, image_store: IS) -> Self {
        Self {
            llm_client: Arc::new(llm_client),
            image_store: Arc::new(image_store),
            sessions: SessionStore::default(),
        }
    }
}

impl<LLM, IS> Clone for Service<LLM, IS>
where
    LLM: LLMClient,
    IS: ImageStore,
{
    fn clone(&self) -> Self {
        Self {
            llm_client: Arc::clone(&self.llm_client),
            image_store: Arc::clone(&self.image_store),
            sessions: self.sessions.clone(),
        }
    }
}
