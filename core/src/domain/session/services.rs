use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    image::{
        entities::ImageSummary,
        ports::ImageStore,
        services::{add_images, encode_images, release_image, release_images},
        value_objects::{ImageFile, ImagePreview},
    },
    recipe::{
        entities::AnalysisResult,
        ports::{LLMClient, RecipeService},
    },
    session::{
        entities::KitchenSession,
        ports::SessionService,
        value_objects::{RecipeTicket, SessionSnapshot},
    },
};

const MIN_SWEEP_PERIOD: Duration = Duration::from_secs(1);
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

impl<LLM, IS> Service<LLM, IS>
where
    LLM: LLMClient,
    IS: ImageStore,
{
    /// Encode the ticket's images and run one recipe request.
    async fn run_ticket(&self, ticket: &RecipeTicket) -> Result<AnalysisResult, CoreError> {
        let images = encode_images(self.image_store.as_ref(), &ticket.sources).await?;
        self.request_recipes(images, ticket.exclude_titles.clone())
            .await
    }

    /// Delete every session untouched since `cutoff` and release its images.
    /// Returns how many sessions were dropped.
    pub async fn expire_sessions(&self, cutoff: DateTime<Utc>) -> usize {
        let expired = self.sessions.remove_expired(cutoff).await;
        let count = expired.len();

        for handle in expired {
            let images = handle.lock().await.reset();
            release_images(self.image_store.as_ref(), images).await;
        }

        if count > 0 {
            let remaining = self.sessions.len().await;
            info!(
                expired = count,
                remaining = remaining,
                "expired idle sessions"
            );
        }
        count
    }

    /// Periodically expire sessions idle for longer than `ttl`.
    pub fn spawn_session_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let service = self.clone();
        let period = ttl.clamp(MIN_SWEEP_PERIOD, MAX_SWEEP_PERIOD);
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let cutoff = Utc::now()
                    .checked_sub_signed(ttl)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                service.expire_sessions(cutoff).await;
            }
        })
    }
}

impl<LLM, IS> SessionService for Service<LLM, IS>
where
    LLM: LLMClient,
    IS: ImageStore,
{
    async fn create_session(&self) -> Result<SessionSnapshot, CoreError> {
        let handle = self.sessions.insert(KitchenSession::new()).await;
        let session = handle.lock().await;

        info!(session_id = %session.id, "session created");

        Ok(session.snapshot())
    }

    async fn get_session(&self, session_id: Uuid) -> Result<SessionSnapshot, CoreError> {
        let handle = self.sessions.get(session_id).await?;
        let session = handle.lock().await;

        Ok(session.snapshot())
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: Uuid) -> Result<(), CoreError> {
        let handle = self
            .sessions
            .remove(session_id)
            .await
            .ok_or(CoreError::NotFound)?;

        let images = handle.lock().await.reset();
        release_images(self.image_store.as_ref(), images).await;

        info!("session deleted");
        Ok(())
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    async fn add_images(
        &self,
        session_id: Uuid,
        files: Vec<ImageFile>,
    ) -> Result<Vec<ImageSummary>, CoreError> {
        let handle = self.sessions.get(session_id).await?;
        let mut session = handle.lock().await;
        session.ensure_accepts_images()?;

        let images = add_images(self.image_store.as_ref(), files).await?;
        let summaries: Vec<ImageSummary> = images.iter().map(|image| image.summary()).collect();
        session.add_images(images)?;

        info!(total = session.images().len(), "images added");
        Ok(summaries)
    }

    #[instrument(skip(self))]
    async fn remove_image(
        &self,
        session_id: Uuid,
        image_id: Uuid,
    ) -> Result<SessionSnapshot, CoreError> {
        let handle = self.sessions.get(session_id).await?;
        let mut session = handle.lock().await;

        match session.remove_image(image_id)? {
            Some(image) => {
                release_image(self.image_store.as_ref(), image).await;
                debug!("image removed");
            }
            None => debug!("image already absent"),
        }

        Ok(session.snapshot())
    }

    async fn image_preview(
        &self,
        session_id: Uuid,
        image_id: Uuid,
    ) -> Result<ImagePreview, CoreError> {
        let handle = self.sessions.get(session_id).await?;
        let source = {
            let session = handle.lock().await;
            session
                .image(image_id)
                .map(|image| image.source())
                .ok_or(CoreError::NotFound)?
        };

        let data = self.image_store.read(&source.handle).await?;

        Ok(ImagePreview {
            content_type: source.content_type,
            data,
        })
    }

    #[instrument(skip(self))]
    async fn analyze(&self, session_id: Uuid) -> Result<SessionSnapshot, CoreError> {
        let handle = self.sessions.get(session_id).await?;

        let ticket = {
            let mut session = handle.lock().await;
            match session.begin_analysis()? {
                Some(ticket) => ticket,
                None => {
                    debug!("nothing to analyze");
                    return Ok(session.snapshot());
                }
            }
        };

        info!(images = ticket.sources.len(), "analysis started");
        let outcome = self.run_ticket(&ticket).await;

        let mut session = handle.lock().await;
        if session.complete_analysis(ticket.epoch, outcome) {
            info!(status = ?session.status(), "analysis finished");
        } else {
            debug!(epoch = ticket.epoch, "discarded stale analysis outcome");
        }

        Ok(session.snapshot())
    }

    #[instrument(skip(self))]
    async fn generate_more(&self, session_id: Uuid) -> Result<SessionSnapshot, CoreError> {
        let handle = self.sessions.get(session_id).await?;

        let ticket = {
            let mut session = handle.lock().await;
            match session.begin_generate_more()? {
                Some(ticket) => ticket,
                None => {
                    debug!("nothing to generate more recipes from");
                    return Ok(session.snapshot());
                }
            }
        };

        info!(excluded = ticket.exclude_titles.len(), "generating more recipes");
        let outcome = self.run_ticket(&ticket).await;

        let mut session = handle.lock().await;
        match session.complete_generate_more(ticket.epoch, outcome) {
            Ok(true) => info!("more recipes appended"),
            Ok(false) => debug!(epoch = ticket.epoch, "discarded stale generate-more outcome"),
            Err(e) => {
                warn!(error = %e, "generating more recipes failed");
                return Err(e);
            }
        }

        Ok(session.snapshot())
    }

    #[instrument(skip(self))]
    async fn reset(&self, session_id: Uuid) -> Result<SessionSnapshot, CoreError> {
        let handle = self.sessions.get(session_id).await?;
        let mut session = handle.lock().await;

        let images = session.reset();
        release_images(self.image_store.as_ref(), images).await;

        info!("session reset");
        Ok(session.snapshot())
    }

    async fn edit_images(&self, session_id: Uuid) -> Result<SessionSnapshot, CoreError> {
        let handle = self.sessions.get(session_id).await?;
        let mut session = handle.lock().await;

        session.edit_images();

        Ok(session.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin, sync::Arc};

    use base64::{Engine as _, engine::general_purpose};
    use bytes::Bytes;
    use futures::future;
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        domain::{
            recipe::{
                ports::MockLLMClient,
                services::tests::response_json,
                value_objects::{ContentPart, GenerationRequest},
            },
            session::entities::AppStatus,
        },
        infrastructure::image_store::InMemoryImageStore,
    };

    type TestService = Service<MockLLMClient, InMemoryImageStore>;

    fn jpeg(name: &str) -> ImageFile {
        ImageFile::new(name, "image/jpeg", Bytes::from(format!("bytes of {name}")))
    }

    type LLMReply = Pin<Box<dyn Future<Output = Result<String, CoreError>> + Send>>;

    fn ok_response(
        ingredients: &'static [&'static str],
        titles: &'static [&'static str],
    ) -> impl FnMut(GenerationRequest) -> LLMReply + Send + 'static {
        move |_| -> LLMReply { Box::pin(future::ready(Ok(response_json(ingredients, titles)))) }
    }

    fn first_request(request: &GenerationRequest) -> bool {
        !request
            .prompt_text()
            .unwrap_or_default()
            .contains("Do NOT suggest")
    }

    fn excludes_pancakes(request: &GenerationRequest) -> bool {
        request
            .prompt_text()
            .unwrap_or_default()
            .contains("Do NOT suggest the following recipes again: Pancakes")
    }

    async fn session_with_image(service: &TestService) -> Uuid {
        let session = service.create_session().await.unwrap();
        service
            .add_images(session.id, vec![jpeg("fridge.jpg")])
            .await
            .unwrap();
        session.id
    }

    #[tokio::test]
    async fn analyze_without_images_stays_idle() {
        let service = Service::new(MockLLMClient::new(), InMemoryImageStore::default());
        let session = service.create_session().await.unwrap();

        let snapshot = service.analyze(session.id).await.unwrap();

        assert_eq!(snapshot.status, AppStatus::Idle);
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn analyze_then_generate_more_appends_recipes() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_content()
            .withf(first_request)
            .times(1)
            .returning(ok_response(&["egg", "flour"], &["Pancakes"]));
        llm.expect_generate_content()
            .withf(excludes_pancakes)
            .times(1)
            .returning(ok_response(&["milk"], &["Omelette"]));
        let service = Service::new(llm, InMemoryImageStore::default());
        let session_id = session_with_image(&service).await;

        let analyzed = service.analyze(session_id).await.unwrap();
        assert_eq!(analyzed.status, AppStatus::Success);
        assert_eq!(analyzed.result.as_ref().unwrap().recipes.len(), 1);

        let more = service.generate_more(session_id).await.unwrap();

        let result = more.result.unwrap();
        assert_eq!(more.status, AppStatus::Success);
        assert!(!more.generating_more);
        assert_eq!(result.recipes.len(), 2);
        assert_eq!(result.recipes[1].title, "Omelette");
        assert_eq!(result.identified_ingredients, vec!["egg", "flour"]);
    }

    #[tokio::test]
    async fn analyze_sends_every_image_in_order() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_content()
            .withf(|request: &GenerationRequest| {
                let payloads: Vec<Vec<u8>> = request
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        ContentPart::InlineData { data, .. } => {
                            general_purpose::STANDARD.decode(data).ok()
                        }
                        ContentPart::Text(_) => None,
                    })
                    .collect();
                payloads == vec![b"bytes of a.jpg".to_vec(), b"bytes of b.jpg".to_vec()]
            })
            .times(1)
            .returning(ok_response(&["egg"], &["Pancakes"]));
        let service = Service::new(llm, InMemoryImageStore::default());
        let session = service.create_session().await.unwrap();
        service
            .add_images(session.id, vec![jpeg("a.jpg"), jpeg("b.jpg")])
            .await
            .unwrap();

        let snapshot = service.analyze(session.id).await.unwrap();

        assert_eq!(snapshot.status, AppStatus::Success);
    }

    #[tokio::test]
    async fn transport_failure_moves_to_error() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_content().times(1).returning(|_| {
            Box::pin(future::ready(Err(CoreError::TransportError(
                "LLM API error: connection refused".to_string(),
            ))))
        });
        let service = Service::new(llm, InMemoryImageStore::default());
        let session_id = session_with_image(&service).await;

        let snapshot = service.analyze(session_id).await.unwrap();

        assert_eq!(snapshot.status, AppStatus::Error);
        assert_eq!(snapshot.error.as_deref(), Some("LLM API error: connection refused"));
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn malformed_response_moves_to_error() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_content().times(1).returning(|_| {
            Box::pin(future::ready(Ok(
                r#"{"identifiedIngredients":["egg"],"recipes":[{"title":"Pancakes"}]}"#.to_string(),
            )))
        });
        let service = Service::new(llm, InMemoryImageStore::default());
        let session_id = session_with_image(&service).await;

        let snapshot = service.analyze(session_id).await.unwrap();

        assert_eq!(snapshot.status, AppStatus::Error);
        assert!(snapshot.error.unwrap().starts_with("Malformed AI response"));
        assert!(snapshot.result.is_none());
    }

    #[tokio::test]
    async fn generate_more_failure_is_returned_and_keeps_success() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_content()
            .withf(first_request)
            .times(1)
            .returning(ok_response(&["egg"], &["Pancakes"]));
        llm.expect_generate_content()
            .withf(excludes_pancakes)
            .times(1)
            .returning(|_| Box::pin(future::ready(Err(CoreError::EmptyResponse))));
        let service = Service::new(llm, InMemoryImageStore::default());
        let session_id = session_with_image(&service).await;
        service.analyze(session_id).await.unwrap();

        let err = service.generate_more(session_id).await.unwrap_err();
        let snapshot = service.get_session(session_id).await.unwrap();

        assert_eq!(err, CoreError::EmptyResponse);
        assert_eq!(snapshot.status, AppStatus::Success);
        assert!(!snapshot.generating_more);
        assert_eq!(snapshot.result.unwrap().recipes.len(), 1);
    }

    #[tokio::test]
    async fn missing_image_bytes_surface_as_read_error() {
        let store = InMemoryImageStore::default();
        let service = Service::new(MockLLMClient::new(), store.clone());
        let session_id = session_with_image(&service).await;
        let handle = {
            let session = service.sessions.get(session_id).await.unwrap();
            let session = session.lock().await;
            session.images()[0].handle().clone()
        };
        store.delete(&handle).await.unwrap();

        let snapshot = service.analyze(session_id).await.unwrap();

        assert_eq!(snapshot.status, AppStatus::Error);
        assert!(snapshot.error.unwrap().starts_with("Failed to read image bytes"));
    }

    #[tokio::test]
    async fn reset_releases_images_and_clears_state() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_content()
            .times(1)
            .returning(ok_response(&["egg"], &["Pancakes"]));
        let store = InMemoryImageStore::default();
        let service = Service::new(llm, store.clone());
        let session_id = session_with_image(&service).await;
        service.analyze(session_id).await.unwrap();

        let snapshot = service.reset(session_id).await.unwrap();

        assert_eq!(snapshot.status, AppStatus::Idle);
        assert!(snapshot.images.is_empty());
        assert!(snapshot.result.is_none());
        assert!(snapshot.error.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn remove_image_twice_is_a_no_op() {
        let store = InMemoryImageStore::default();
        let service = Service::new(MockLLMClient::new(), store.clone());
        let session = service.create_session().await.unwrap();
        let added = service
            .add_images(session.id, vec![jpeg("a.jpg"), jpeg("b.jpg")])
            .await
            .unwrap();

        service.remove_image(session.id, added[0].id).await.unwrap();
        let snapshot = service.remove_image(session.id, added[0].id).await.unwrap();

        assert_eq!(snapshot.images.len(), 1);
        assert_eq!(snapshot.images[0].id, added[1].id);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn preview_serves_the_stored_bytes() {
        let service = Service::new(MockLLMClient::new(), InMemoryImageStore::default());
        let session = service.create_session().await.unwrap();
        let added = service
            .add_images(session.id, vec![jpeg("a.jpg")])
            .await
            .unwrap();

        let preview = service.image_preview(session.id, added[0].id).await.unwrap();

        assert_eq!(preview.content_type, "image/jpeg");
        assert_eq!(preview.data, Bytes::from("bytes of a.jpg"));
        assert_eq!(
            service.image_preview(session.id, Uuid::new_v4()).await,
            Err(CoreError::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_session_releases_images() {
        let store = InMemoryImageStore::default();
        let service = Service::new(MockLLMClient::new(), store.clone());
        let session_id = session_with_image(&service).await;

        service.delete_session(session_id).await.unwrap();

        assert!(store.is_empty().await);
        assert_eq!(service.get_session(session_id).await, Err(CoreError::NotFound));
    }

    #[tokio::test]
    async fn remove_image_is_refused_while_analysis_runs() {
        let gate = Arc::new(Notify::new());
        let mut llm = MockLLMClient::new();
        let reply_gate = Arc::clone(&gate);
        llm.expect_generate_content()
            .times(1)
            .returning(move |request| -> LLMReply {
                assert_eq!(request.inline_data_count(), 2);
                let gate = Arc::clone(&reply_gate);
                Box::pin(async move {
                    gate.notified().await;
                    Ok(response_json(&["egg"], &["Pancakes"]))
                })
            });
        let store = InMemoryImageStore::default();
        let service = Service::new(llm, store.clone());
        let session = service.create_session().await.unwrap();
        let added = service
            .add_images(session.id, vec![jpeg("a.jpg"), jpeg("b.jpg")])
            .await
            .unwrap();

        let analysis = tokio::spawn({
            let service = service.clone();
            async move { service.analyze(session.id).await }
        });
        while service.get_session(session.id).await.unwrap().status != AppStatus::Analyzing {
            tokio::task::yield_now().await;
        }

        let err = service.remove_image(session.id, added[0].id).await.unwrap_err();
        gate.notify_one();
        let snapshot = analysis.await.unwrap().unwrap();

        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(snapshot.status, AppStatus::Success);
        assert_eq!(snapshot.images.len(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn idle_sessions_expire_and_release_their_images() {
        let store = InMemoryImageStore::default();
        let service = Service::new(MockLLMClient::new(), store.clone());
        let first = session_with_image(&service).await;
        session_with_image(&service).await;

        assert_eq!(service.expire_sessions(Utc::now() - TimeDelta::hours(1)).await, 0);
        assert_eq!(service.sessions.len().await, 2);

        assert_eq!(service.expire_sessions(Utc::now() + TimeDelta::seconds(1)).await, 2);

        assert!(service.sessions.is_empty().await);
        assert!(store.is_empty().await);
        assert_eq!(service.get_session(first).await, Err(CoreError::NotFound));
    }
}
